//! Progress reporting for feed loads.
//!
//! [`ProgressCallback`] keeps the loader independent of any rendering
//! backend; the CLI plugs in an `indicatif` spinner, the server and tests
//! use [`NullProgress`].

/// Receives progress updates while a feed is fetched and mapped.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of features to map.
    fn set_total(&self, total: u64);

    /// Advance by `delta` features.
    fn inc(&self, delta: u64);

    /// Update the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Mark the load as complete with a final message.
    fn finish(&self, msg: String);

    /// Mark the load as complete and remove the indicator.
    fn finish_and_clear(&self);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}
