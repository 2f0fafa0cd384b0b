pub mod config;
pub mod error;
pub mod frame;
pub mod persist;
pub mod schema;
pub mod transform;
pub mod validation;
