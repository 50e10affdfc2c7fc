//! PM2.5 to AQI conversion
//!
//! Uses the EPA PM2.5 breakpoint table. Inside a band the index is linearly
//! interpolated between the band's concentration and index bounds.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// One row of a breakpoint table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Lowest concentration in the band (µg/m³)
    pub conc_lo: f64,
    /// Highest concentration in the band (µg/m³)
    pub conc_hi: f64,
    /// Index value at `conc_lo`
    pub aqi_lo: f64,
    /// Index value at `conc_hi`
    pub aqi_hi: f64,
}

impl Breakpoint {
    const fn new(conc_lo: f64, conc_hi: f64, aqi_lo: f64, aqi_hi: f64) -> Self {
        Self {
            conc_lo,
            conc_hi,
            aqi_lo,
            aqi_hi,
        }
    }

    /// Linear interpolation inside the band.
    ///
    /// Concentrations below `conc_lo` (the rounding gap between two bands)
    /// are clamped to the lower bound.
    pub fn interpolate(&self, conc: f64) -> f64 {
        let conc = conc.max(self.conc_lo);
        let fraction = (conc - self.conc_lo) / (self.conc_hi - self.conc_lo);
        self.aqi_lo + fraction * (self.aqi_hi - self.aqi_lo)
    }
}

/// EPA breakpoints for PM2.5
pub const PM25_BREAKPOINTS: [Breakpoint; 7] = [
    Breakpoint::new(0.0, 12.0, 0.0, 50.0),
    Breakpoint::new(12.1, 35.4, 51.0, 100.0),
    Breakpoint::new(35.5, 55.4, 101.0, 150.0),
    Breakpoint::new(55.5, 150.4, 151.0, 200.0),
    Breakpoint::new(150.5, 250.4, 201.0, 300.0),
    Breakpoint::new(250.5, 350.4, 301.0, 400.0),
    Breakpoint::new(350.5, 500.4, 401.0, 500.0),
];

/// Convert a PM2.5 concentration (µg/m³) into an AQI value.
///
/// Concentrations above the last band continue linearly past 500 with a
/// slope of one index point per µg/m³.
///
/// # Examples
///
/// ```
/// use aqi_math::pm25_to_aqi;
///
/// assert_eq!(pm25_to_aqi(12.0).unwrap(), 50.0);
/// assert!((pm25_to_aqi(510.4).unwrap() - 510.0).abs() < 1e-9);
/// ```
pub fn pm25_to_aqi(pm25: f64) -> Result<f64> {
    if !pm25.is_finite() || pm25 < 0.0 {
        return Err(MathError::InvalidInput(format!(
            "PM2.5 concentration must be a non-negative finite number, got {}",
            pm25
        )));
    }

    match PM25_BREAKPOINTS.iter().find(|bp| pm25 <= bp.conc_hi) {
        Some(bp) => Ok(bp.interpolate(pm25)),
        None => {
            let last = &PM25_BREAKPOINTS[PM25_BREAKPOINTS.len() - 1];
            Ok(last.aqi_hi + (pm25 - last.conc_hi))
        }
    }
}
