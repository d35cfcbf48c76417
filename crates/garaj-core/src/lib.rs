pub mod audience;
pub mod config;
pub mod error;
pub mod message;
pub mod report;
pub mod store;
pub mod types;

pub use error::{GarajError, Result};
