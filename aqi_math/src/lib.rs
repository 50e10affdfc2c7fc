//! # AQI Math
//!
//! Calculations for the air-quality index.
//! This crate converts raw pollutant concentrations into index values and
//! classifies index values into the published health categories.

use thiserror::Error;

pub mod aqi;
pub mod category;

pub use aqi::{pm25_to_aqi, Breakpoint, PM25_BREAKPOINTS};
pub use category::AqiCategory;

/// Errors that can occur in air-quality calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for air-quality math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_names_the_input() {
        let err = MathError::InvalidInput("pm2_5 = -1".to_string());
        assert_eq!(err.to_string(), "Invalid input: pm2_5 = -1");
    }
}
