use chrono::{DateTime, Utc};

/// Receiver for the shared request status flags.
///
/// The request gateway reports through this trait so it never needs to know
/// which container owns the flags. All methods are synchronous and must not
/// block: they are called on the request path.
pub trait ApiStatusSink: Send + Sync {
    fn set_api_loading(&self, loading: bool);

    fn set_api_error(&self, error: Option<String>);

    fn set_api_last_updated(&self, at: Option<DateTime<Utc>>);

    fn clear_api_error(&self);
}
