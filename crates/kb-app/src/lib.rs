pub mod config;
pub mod context;
pub mod controllers;
pub mod i18n;

pub use config::Config;
pub use context::AppContext;
