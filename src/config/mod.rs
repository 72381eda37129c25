pub mod app_config;
pub mod model;

pub use app_config::{ConfigError, load_config};
pub use model::{AppConfig, DisplayConfig, ProbeConfig};
