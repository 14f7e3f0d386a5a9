//! Map filtering and framing.

use geo::{BoundingRect, LineString, MultiLineString};
use tx_congestion_analytics_models::MapView;
use tx_congestion_roadway_models::{BoundingBox, RoadwayFilter, RoadwayRecord};

use crate::AnalyticsError;

/// Center of Texas, `[lat, lon]`.
pub const STATE_CENTER: [f64; 2] = [31.9686, -99.9018];

/// Zoom level showing the whole state.
pub const STATE_ZOOM: u8 = 6;

/// Zoom level used when the map is focused on one district.
pub const DISTRICT_ZOOM: u8 = 9;

/// Checks that both bounds are finite and the range is not inverted.
///
/// # Errors
///
/// Returns [`AnalyticsError::NonFiniteBound`] or
/// [`AnalyticsError::InvertedRange`].
pub fn validate_filter(filter: &RoadwayFilter) -> Result<(), AnalyticsError> {
    if !filter.min_congestion.is_finite() || !filter.max_congestion.is_finite() {
        return Err(AnalyticsError::NonFiniteBound);
    }
    if filter.min_congestion > filter.max_congestion {
        return Err(AnalyticsError::InvertedRange {
            min: filter.min_congestion,
            max: filter.max_congestion,
        });
    }
    Ok(())
}

/// Records passing `filter`, in input order.
#[must_use]
pub fn apply_filter<'a>(records: &'a [RoadwayRecord], filter: &RoadwayFilter) -> Vec<&'a RoadwayRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Mean `[lon, lat]` over every vertex of every record, or `None` when
/// there are no vertices.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn vertex_centroid(records: &[&RoadwayRecord]) -> Option<[f64; 2]> {
    let (count, lon, lat) = records
        .iter()
        .flat_map(|r| &r.geometry.coordinates)
        .fold((0_usize, 0.0, 0.0), |(count, lon, lat), [x, y]| {
            (count + 1, lon + x, lat + y)
        });

    (count > 0).then(|| [lon / count as f64, lat / count as f64])
}

/// Envelope of every record's geometry, or `None` when there are no
/// vertices.
#[must_use]
pub fn bounding_box(records: &[&RoadwayRecord]) -> Option<BoundingBox> {
    let lines = MultiLineString::new(
        records
            .iter()
            .filter(|r| !r.geometry.is_empty())
            .map(|r| {
                LineString::from(
                    r.geometry
                        .coordinates
                        .iter()
                        .map(|[lon, lat]| (*lon, *lat))
                        .collect::<Vec<_>>(),
                )
            })
            .collect(),
    );

    lines.bounding_rect().map(|rect| BoundingBox {
        west: rect.min().x,
        south: rect.min().y,
        east: rect.max().x,
        north: rect.max().y,
    })
}

/// Frames the map for a filtered record set.
///
/// A district filter with at least one vertex centers on the vertex
/// centroid at district zoom; anything else shows the whole state.
#[must_use]
pub fn map_view(filter: &RoadwayFilter, filtered: &[&RoadwayRecord]) -> MapView {
    if filter.district.is_some()
        && let Some([lon, lat]) = vertex_centroid(filtered)
    {
        return MapView {
            center: [lat, lon],
            zoom: DISTRICT_ZOOM,
        };
    }

    MapView {
        center: STATE_CENTER,
        zoom: STATE_ZOOM,
    }
}
