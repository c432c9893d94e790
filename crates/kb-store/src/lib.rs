pub mod expiry;
pub mod poll;
pub mod store;

pub use expiry::{ErrorExpiry, DEFAULT_ERROR_TTL};
pub use poll::{spawn_polling, PollHandle, DEFAULT_POLL_INTERVAL};
pub use store::Store;
