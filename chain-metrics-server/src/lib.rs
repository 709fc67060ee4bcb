mod error;
mod server;
mod services;
mod settings;

pub use error::ApiError;
pub use server::{http_configure, run, AppState};
pub use settings::{Settings, TrendSettings};
