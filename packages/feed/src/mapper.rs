//! Maps raw `GeoJSON` features onto [`RoadwayRecord`]s.
//!
//! Features are validated at this boundary: a missing or mistyped required
//! property, a non-finite number, or a negative measure rejects the whole
//! feature instead of letting `NaN` leak into the aggregates. The cost
//! relationship between `COST_TRK` and `COST_DLAY` is not checked here;
//! it is a data-quality signal, not a parse failure.

use geojson::{Feature, feature::Id};
use serde_json::Value as JsonValue;
use tx_congestion_roadway_models::{RoadGeometry, RoadwayRecord, properties};

use crate::MappingError;
use crate::progress::{NullProgress, ProgressCallback};

/// Records produced from a feature list, plus how many were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedFeatures {
    /// Valid records in input order.
    pub records: Vec<RoadwayRecord>,
    /// Number of rejected features.
    pub rejected: usize,
}

/// Maps every feature, keeping valid records in order.
#[must_use]
pub fn map_features(features: &[Feature]) -> MappedFeatures {
    map_features_with_progress(features, &NullProgress)
}

/// Same as [`map_features`], advancing `progress` once per feature.
#[must_use]
pub fn map_features_with_progress(
    features: &[Feature],
    progress: &dyn ProgressCallback,
) -> MappedFeatures {
    let mut mapped = MappedFeatures::default();

    for (index, feature) in features.iter().enumerate() {
        match map_feature(feature) {
            Ok(record) => mapped.records.push(record),
            Err(e) => {
                log::warn!("Skipping feature #{index}: {e}");
                mapped.rejected += 1;
            }
        }
        progress.inc(1);
    }

    mapped
}

/// Maps a single feature.
///
/// # Errors
///
/// Returns [`MappingError`] if a required property is missing or invalid,
/// a measure is negative, or the geometry is not a line.
pub fn map_feature(feature: &Feature) -> Result<RoadwayRecord, MappingError> {
    Ok(RoadwayRecord {
        id: feature_id(feature)?,
        name: string_prop(feature, properties::ROAD_NAME)?,
        rank: int_prop(feature, properties::RANK)?,
        truck_rank: int_prop(feature, properties::TRUCK_RANK)?,
        district: string_prop(feature, properties::DISTRICT)?,
        delay_per_mile: measure_prop(feature, properties::DELAY_PER_MILE)?,
        congestion_index: measure_prop(feature, properties::CONGESTION_INDEX)?,
        cost_of_delay: measure_prop(feature, properties::COST_OF_DELAY)?,
        truck_delay: measure_prop(feature, properties::TRUCK_DELAY)?,
        cost_of_truck_delay: measure_prop(feature, properties::COST_OF_TRUCK_DELAY)?,
        year: int_prop(feature, properties::YEAR)?,
        segment_id: optional_int_prop(feature, properties::SEGMENT_ID),
        geometry: road_geometry(feature)?,
    })
}

fn feature_id(feature: &Feature) -> Result<i64, MappingError> {
    match &feature.id {
        Some(Id::Number(n)) => {
            json_integer(&JsonValue::Number(n.clone())).ok_or(MappingError::MissingId)
        }
        Some(Id::String(s)) => s.trim().parse().map_err(|_| MappingError::MissingId),
        None => optional_int_prop(feature, properties::FID).ok_or(MappingError::MissingId),
    }
}

fn required_prop<'a>(
    feature: &'a Feature,
    property: &'static str,
) -> Result<&'a JsonValue, MappingError> {
    feature
        .property(property)
        .filter(|v| !v.is_null())
        .ok_or(MappingError::MissingProperty { property })
}

fn invalid(property: &'static str, value: &JsonValue) -> MappingError {
    MappingError::InvalidProperty {
        property,
        value: value.to_string(),
    }
}

fn string_prop(feature: &Feature, property: &'static str) -> Result<String, MappingError> {
    let value = required_prop(feature, property)?;
    value
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| invalid(property, value))
}

fn int_prop(feature: &Feature, property: &'static str) -> Result<i64, MappingError> {
    let value = required_prop(feature, property)?;
    json_integer(value).ok_or_else(|| invalid(property, value))
}

fn optional_int_prop(feature: &Feature, property: &'static str) -> Option<i64> {
    feature.property(property).and_then(json_integer)
}

fn measure_prop(feature: &Feature, property: &'static str) -> Result<f64, MappingError> {
    let value = required_prop(feature, property)?;
    let number = value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid(property, value))?;
    if number < 0.0 {
        return Err(MappingError::NegativeMeasure {
            property,
            value: number,
        });
    }
    Ok(number)
}

/// Accepts JSON integers and integral floats (`3.0`), which `ArcGIS`
/// occasionally emits for integer columns.
#[allow(clippy::cast_possible_truncation)]
fn json_integer(value: &JsonValue) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15)
            .map(|n| n as i64)
    })
}

fn road_geometry(feature: &Feature) -> Result<RoadGeometry, MappingError> {
    let Some(geometry) = &feature.geometry else {
        return Ok(RoadGeometry::empty());
    };

    match &geometry.value {
        geojson::Value::LineString(line) => Ok(RoadGeometry {
            kind: "LineString".to_string(),
            coordinates: line.iter().filter_map(|p| lon_lat(p)).collect(),
        }),
        // Parts are concatenated in order so every road is one polyline.
        geojson::Value::MultiLineString(lines) => Ok(RoadGeometry {
            kind: "MultiLineString".to_string(),
            coordinates: lines
                .iter()
                .flat_map(|line| line.iter().filter_map(|p| lon_lat(p)))
                .collect(),
        }),
        geojson::Value::Point(_) => Err(MappingError::UnsupportedGeometry { kind: "Point" }),
        geojson::Value::MultiPoint(_) => {
            Err(MappingError::UnsupportedGeometry { kind: "MultiPoint" })
        }
        geojson::Value::Polygon(_) => Err(MappingError::UnsupportedGeometry { kind: "Polygon" }),
        geojson::Value::MultiPolygon(_) => Err(MappingError::UnsupportedGeometry {
            kind: "MultiPolygon",
        }),
        geojson::Value::GeometryCollection(_) => Err(MappingError::UnsupportedGeometry {
            kind: "GeometryCollection",
        }),
    }
}

fn lon_lat(position: &[f64]) -> Option<[f64; 2]> {
    match position {
        [lon, lat, ..] => Some([*lon, *lat]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(json: serde_json::Value) -> Feature {
        serde_json::from_value(json).unwrap()
    }

    fn valid_properties() -> serde_json::Value {
        serde_json::json!({
            "RD_NM": "US 59",
            "RANK": 7,
            "TRK_RANK": 12,
            "DIST_NM": "Houston",
            "DLAY_MILE": 845_123.4,
            "TCI": 1.62,
            "COST_DLAY": 123_456_789.0,
            "TRK_DLY": 40_000,
            "COST_TRK": 23_000_000,
            "YR": 2023,
            "SEG_ID": 5150,
            "FID": 31,
            "Shape_Leng": 0.05,
            "Shape__Length": 9000.1
        })
    }

    #[test]
    fn maps_all_fields() {
        let f = feature(serde_json::json!({
            "type": "Feature",
            "id": 31,
            "geometry": {
                "type": "LineString",
                "coordinates": [[-95.41, 29.74], [-95.40, 29.75, 12.0]]
            },
            "properties": valid_properties()
        }));

        let record = map_feature(&f).unwrap();
        assert_eq!(record.id, 31);
        assert_eq!(record.name, "US 59");
        assert_eq!(record.rank, 7);
        assert_eq!(record.truck_rank, 12);
        assert_eq!(record.district, "Houston");
        assert!((record.delay_per_mile - 845_123.4).abs() < f64::EPSILON);
        assert!((record.congestion_index - 1.62).abs() < f64::EPSILON);
        assert!((record.cost_of_truck_delay - 23_000_000.0).abs() < f64::EPSILON);
        assert_eq!(record.year, 2023);
        assert_eq!(record.segment_id, Some(5150));
        assert_eq!(
            record.geometry.coordinates,
            vec![[-95.41, 29.74], [-95.40, 29.75]]
        );
    }

    #[test]
    fn falls_back_to_fid_when_feature_has_no_id() {
        let f = feature(serde_json::json!({
            "type": "Feature",
            "geometry": null,
            "properties": valid_properties()
        }));
        let record = map_feature(&f).unwrap();
        assert_eq!(record.id, 31);
        assert!(record.geometry.is_empty());
    }

    #[test]
    fn accepts_integral_float_ranks() {
        let mut props = valid_properties();
        props["RANK"] = serde_json::json!(7.0);
        let f = feature(serde_json::json!({
            "type": "Feature", "id": 1, "geometry": null, "properties": props
        }));
        assert_eq!(map_feature(&f).unwrap().rank, 7);
    }

    #[test]
    fn rejects_missing_property() {
        let mut props = valid_properties();
        props.as_object_mut().unwrap().remove("TCI");
        let f = feature(serde_json::json!({
            "type": "Feature", "id": 1, "geometry": null, "properties": props
        }));
        assert_eq!(
            map_feature(&f),
            Err(MappingError::MissingProperty { property: "TCI" })
        );
    }

    #[test]
    fn rejects_null_property() {
        let mut props = valid_properties();
        props["DIST_NM"] = serde_json::Value::Null;
        let f = feature(serde_json::json!({
            "type": "Feature", "id": 1, "geometry": null, "properties": props
        }));
        assert_eq!(
            map_feature(&f),
            Err(MappingError::MissingProperty { property: "DIST_NM" })
        );
    }

    #[test]
    fn rejects_string_measure() {
        let mut props = valid_properties();
        props["DLAY_MILE"] = serde_json::json!("lots");
        let f = feature(serde_json::json!({
            "type": "Feature", "id": 1, "geometry": null, "properties": props
        }));
        assert!(matches!(
            map_feature(&f),
            Err(MappingError::InvalidProperty {
                property: "DLAY_MILE",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_congestion_index() {
        let mut props = valid_properties();
        props["TCI"] = serde_json::json!(-0.5);
        let f = feature(serde_json::json!({
            "type": "Feature", "id": 1, "geometry": null, "properties": props
        }));
        assert_eq!(
            map_feature(&f),
            Err(MappingError::NegativeMeasure {
                property: "TCI",
                value: -0.5
            })
        );
    }

    #[test]
    fn does_not_enforce_truck_cost_invariant() {
        let mut props = valid_properties();
        props["COST_TRK"] = serde_json::json!(999_999_999_999.0);
        let f = feature(serde_json::json!({
            "type": "Feature", "id": 1, "geometry": null, "properties": props
        }));
        let record = map_feature(&f).unwrap();
        assert!(!record.truck_cost_within_total());
    }

    #[test]
    fn rejects_polygons() {
        let f = feature(serde_json::json!({
            "type": "Feature",
            "id": 1,
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
            },
            "properties": valid_properties()
        }));
        assert_eq!(
            map_feature(&f),
            Err(MappingError::UnsupportedGeometry { kind: "Polygon" })
        );
    }

    #[test]
    fn concatenates_multi_line_parts() {
        let f = feature(serde_json::json!({
            "type": "Feature",
            "id": 1,
            "geometry": {
                "type": "MultiLineString",
                "coordinates": [[[0.0, 0.0], [1.0, 1.0]], [[2.0, 2.0], [3.0, 3.0]]]
            },
            "properties": valid_properties()
        }));
        let record = map_feature(&f).unwrap();
        assert_eq!(record.geometry.kind, "MultiLineString");
        assert_eq!(record.geometry.coordinates.len(), 4);
        assert_eq!(record.geometry.coordinates[2], [2.0, 2.0]);
    }

    #[test]
    fn map_features_preserves_order_and_counts_rejects() {
        let make = |id: i64, name: &str| {
            let mut props = valid_properties();
            props["RD_NM"] = serde_json::json!(name);
            feature(serde_json::json!({
                "type": "Feature", "id": id, "geometry": null, "properties": props
            }))
        };
        let broken = feature(serde_json::json!({
            "type": "Feature", "id": 99, "geometry": null, "properties": {}
        }));

        let mapped = map_features(&[make(3, "C"), broken, make(1, "A"), make(2, "B")]);
        assert_eq!(mapped.rejected, 1);
        let names: Vec<&str> = mapped.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }
}
