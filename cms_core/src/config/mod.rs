pub mod settings;

pub use settings::{AppConfig, AuthConfig, ServerConfig, SessionConfig, StoreConfig};
