pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;

pub use error::*;
pub use models::*;
