pub mod error;
pub mod pointing;
