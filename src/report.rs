use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything printed for one observation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub satellite: String,
    pub norad_id: u64,
    pub timestamp: DateTime<Utc>,
    pub range_km: f64,
    pub elevation_deg: f64,
    pub range_speed_km_s: f64,
    /// Only set in radial mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_rate_km_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmit_mhz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_mhz: Option<f64>,
}

impl Report {
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        if let Some(rate) = self.range_rate_km_s {
            lines.push(format!("range rate [km/sec] {:.3}", rate));
        }
        lines.push(format!("range speed [km/sec] {:.3}", self.range_speed_km_s));
        if let Some(observed) = self.observed_mhz {
            lines.push(format!("observed radio frequency [MHz] {:.4}", observed));
        }
        lines.join("\n")
    }

    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
