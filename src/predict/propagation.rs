use chrono::{DateTime, Utc};

use crate::doppler::Vector3;
use crate::predict::observer::{ecef_to_enu, teme_to_ecef};
use crate::predict::{Observer, PredictError, TleEntry};

/// Satellite-minus-observer state in the TEME frame.
#[derive(Debug, Clone, Copy)]
pub struct RelativeState {
    pub timestamp: DateTime<Utc>,
    pub position_km: Vector3,
    pub velocity_km_s: Vector3,
    pub elevation_deg: f64,
}

impl RelativeState {
    pub fn range_km(&self) -> f64 {
        self.position_km.magnitude()
    }

    /// Signed rate of change of the range, positive when the satellite recedes.
    pub fn range_rate_km_s(&self) -> f64 {
        let range = self.range_km();
        if range > 0.0 {
            self.position_km.dot(&self.velocity_km_s) / range
        } else {
            0.0
        }
    }
}

pub fn relative_state(
    entry: &TleEntry,
    observer: &Observer,
    timestamp: DateTime<Utc>,
) -> Result<RelativeState, PredictError> {
    let naive = timestamp.naive_utc();
    let minutes = entry
        .elements
        .datetime_to_minutes_since_epoch(&naive)
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let prediction = entry
        .constants
        .propagate(minutes)
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let gmst = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&naive));
    let (site_pos, site_vel) = observer.state_teme(gmst);

    let position_km = Vector3::from(prediction.position) - site_pos;
    let velocity_km_s = Vector3::from(prediction.velocity) - site_vel;

    let (_, _, up) = ecef_to_enu(
        teme_to_ecef(position_km, gmst),
        observer.lat_rad(),
        observer.lon_rad(),
    );
    let range_km = position_km.magnitude();
    let elevation_deg = if range_km > 0.0 {
        (up / range_km).asin().to_degrees()
    } else {
        0.0
    };

    Ok(RelativeState {
        timestamp,
        position_km,
        velocity_km_s,
        elevation_deg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::catalog::tests::STATIONS;
    use crate::predict::{Catalog, ElementSource};
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone};

    fn iss() -> TleEntry {
        Catalog::parse(STATIONS).element_set("ISS (ZARYA)").unwrap()
    }

    fn observer() -> Observer {
        Observer::new(40.0, -100.0, 0.0).unwrap()
    }

    #[test]
    fn relative_state_is_physically_plausible() {
        let t = Utc.with_ymd_and_hms(2020, 7, 12, 22, 0, 0).unwrap();
        let state = relative_state(&iss(), &observer(), t).unwrap();

        let speed = state.velocity_km_s.magnitude();
        assert!(speed > 7.0 && speed < 8.2, "speed {}", speed);
        assert!(state.range_km() > 350.0 && state.range_km() < 13_300.0);
        assert!(state.range_rate_km_s().abs() <= speed);
        assert!((-90.0..=90.0).contains(&state.elevation_deg));
        assert_eq!(state.timestamp, t);
    }

    #[test]
    fn range_rate_matches_finite_difference() {
        let t0 = Utc.with_ymd_and_hms(2020, 7, 12, 23, 30, 0).unwrap();
        let t1 = t0 + Duration::seconds(1);
        let entry = iss();
        let s0 = relative_state(&entry, &observer(), t0).unwrap();
        let s1 = relative_state(&entry, &observer(), t1).unwrap();

        let midpoint_rate = (s0.range_rate_km_s() + s1.range_rate_km_s()) / 2.0;
        assert_abs_diff_eq!(s1.range_km() - s0.range_km(), midpoint_rate, epsilon = 0.01);
    }

    #[test]
    fn zero_range_has_zero_rate() {
        let state = RelativeState {
            timestamp: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            position_km: Vector3::new(0.0, 0.0, 0.0),
            velocity_km_s: Vector3::new(1.0, 0.0, 0.0),
            elevation_deg: 0.0,
        };
        assert_eq!(state.range_rate_km_s(), 0.0);
    }
}
