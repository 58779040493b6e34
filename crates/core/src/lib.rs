// Qmore Core - Queue Identifier Resolution & Ports
// NO infrastructure dependencies (hexagonal layout)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::QueueResolver;
pub use config::ResolverConfig;
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
