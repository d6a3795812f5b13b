pub mod config;
pub mod customer;
pub mod error;
pub mod record;
pub mod scoring;

pub use config::Config;
pub use customer::*;
pub use error::*;
pub use record::*;
pub use scoring::*;
