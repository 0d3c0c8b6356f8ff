// Public modules
pub mod models;
pub mod errors;
pub mod registry;
pub mod config;
pub mod market_hours;
pub mod fetchers;
pub mod services;
pub mod server;
pub mod dashboard;

pub use models::bar::{MinuteBar, PriceSeries};
pub use models::gain::{GainRecord, GainerQuery, QueryResult};
pub use services::gainer_service::GainerService;
pub use config::Config;
pub use errors::{Result, GainerError};
