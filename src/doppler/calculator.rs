use crate::doppler::{DopplerError, Vector3};

/// Speed of light in vacuum, m/s (exact).
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

const M_PER_KM: f64 = 1e3;

/// Magnitude of a relative velocity given as raw components (km/s).
pub fn range_speed(components: &[f64]) -> Result<f64, DopplerError> {
    Vector3::from_slice(components).map(|v| v.magnitude())
}

/// First-order (non-relativistic) Doppler shift of `transmit_mhz` for a
/// relative speed in km/s. Positive speeds raise the frequency.
///
/// Callers that pass the unsigned range speed always get a blue shift,
/// whether the satellite is approaching or receding. That matches the
/// output of other tracking tools and is kept as the default behavior.
pub fn observed_frequency(range_speed_km_s: f64, transmit_mhz: f64) -> Result<f64, DopplerError> {
    if !range_speed_km_s.is_finite() {
        return Err(DopplerError::InvalidInput(format!(
            "range speed must be finite, got {}",
            range_speed_km_s
        )));
    }
    if !transmit_mhz.is_finite() || transmit_mhz <= 0.0 {
        return Err(DopplerError::InvalidInput(format!(
            "transmit frequency must be positive, got {} MHz",
            transmit_mhz
        )));
    }

    Ok((1.0 + range_speed_km_s * M_PER_KM / SPEED_OF_LIGHT_M_S) * transmit_mhz)
}

#[derive(Debug, Clone, Copy)]
pub struct DopplerQuery {
    pub velocity_km_s: Vector3,
    pub transmit_mhz: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DopplerResult {
    pub range_speed_km_s: f64,
    pub observed_mhz: Option<f64>,
}

impl DopplerQuery {
    pub fn compute(&self) -> Result<DopplerResult, DopplerError> {
        let range_speed_km_s = range_speed(&self.velocity_km_s.as_array())?;
        let observed_mhz = self
            .transmit_mhz
            .map(|f| observed_frequency(range_speed_km_s, f))
            .transpose()?;

        Ok(DopplerResult {
            range_speed_km_s,
            observed_mhz,
        })
    }
}
