use crate::doppler::Vector3;
use crate::predict::PredictError;

pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;

// WGS-84
const EARTH_A_KM: f64 = 6378.137;
const EARTH_E2: f64 = 0.00669437999014;

/// Observer on the Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Result<Self, PredictError> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(PredictError::InvalidObserver(format!(
                "latitude {} outside [-90, 90] degrees",
                latitude_deg
            )));
        }
        if !longitude_deg.is_finite() || !(-360.0..=360.0).contains(&longitude_deg) {
            return Err(PredictError::InvalidObserver(format!(
                "longitude {} outside [-360, 360] degrees",
                longitude_deg
            )));
        }
        if !altitude_m.is_finite() {
            return Err(PredictError::InvalidObserver(format!(
                "altitude {} is not finite",
                altitude_m
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        })
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> Vector3 {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = EARTH_A_KM / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        Vector3::new(
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - EARTH_E2) + alt_km) * sin_lat,
        )
    }

    /// Position and velocity in the TEME frame at the given sidereal angle.
    /// The velocity is the Earth rotation carried by the site.
    pub fn state_teme(&self, gmst: f64) -> (Vector3, Vector3) {
        let pos = ecef_to_teme(self.position_ecef_km(), gmst);
        let vel = Vector3::new(
            -EARTH_ROTATION_RAD_S * pos.y,
            EARTH_ROTATION_RAD_S * pos.x,
            0.0,
        );
        (pos, vel)
    }
}

pub fn ecef_to_teme(pos: Vector3, gmst: f64) -> Vector3 {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    Vector3::new(
        pos.x * cos_gmst - pos.y * sin_gmst,
        pos.x * sin_gmst + pos.y * cos_gmst,
        pos.z,
    )
}

pub fn teme_to_ecef(pos: Vector3, gmst: f64) -> Vector3 {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    Vector3::new(
        pos.x * cos_gmst + pos.y * sin_gmst,
        -pos.x * sin_gmst + pos.y * cos_gmst,
        pos.z,
    )
}

/// East, north, up components of an ECEF offset seen from the given site.
pub fn ecef_to_enu(dr: Vector3, lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr.x + cos_lon * dr.y;
    let north = -sin_lat * cos_lon * dr.x - sin_lat * sin_lon * dr.y + cos_lat * dr.z;
    let up = cos_lat * cos_lon * dr.x + cos_lat * sin_lon * dr.y + sin_lat * dr.z;
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Observer::new(91.0, 0.0, 0.0).is_err());
        assert!(Observer::new(-90.5, 0.0, 0.0).is_err());
        assert!(Observer::new(0.0, 400.0, 0.0).is_err());
        assert!(Observer::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(Observer::new(40.0, -100.0, 0.0).is_ok());
    }

    #[test]
    fn equator_prime_meridian_is_on_x_axis() {
        let site = Observer::new(0.0, 0.0, 0.0).unwrap();
        let pos = site.position_ecef_km();
        assert_abs_diff_eq!(pos.x, EARTH_A_KM, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn north_pole_radius() {
        let site = Observer::new(90.0, 0.0, 0.0).unwrap();
        let pos = site.position_ecef_km();
        assert_abs_diff_eq!(pos.z, 6356.752, epsilon = 1e-3);
    }

    #[test]
    fn frame_rotation_round_trip() {
        let pos = Vector3::new(1234.5, -6789.0, 42.0);
        let back = teme_to_ecef(ecef_to_teme(pos, 1.234), 1.234);
        assert_abs_diff_eq!(back.x, pos.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, pos.y, epsilon = 1e-9);
        assert_abs_diff_eq!(back.z, pos.z, epsilon = 1e-9);
    }

    #[test]
    fn site_velocity_is_earth_rotation() {
        let site = Observer::new(0.0, 0.0, 0.0).unwrap();
        let (_, vel) = site.state_teme(0.0);
        // ~0.465 km/s eastward at the equator
        assert_abs_diff_eq!(vel.magnitude(), 0.4651, epsilon = 1e-3);
        assert_abs_diff_eq!(vel.z, 0.0);
    }

    #[test]
    fn zenith_is_up() {
        let (east, north, up) = ecef_to_enu(Vector3::new(0.0, 0.0, 500.0), 90f64.to_radians(), 0.0);
        assert_abs_diff_eq!(east, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(north, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(up, 500.0, epsilon = 1e-9);
    }
}
