pub mod config;
pub mod error;
pub mod message;
pub mod services;

pub use config::TransportConfig;
pub use error::{ConfigError, TransportError, TransportResult};
pub use services::transport::{ChatTransport, SendOptions};
