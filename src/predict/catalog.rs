use sgp4::{Constants, Elements};

use crate::predict::PredictError;

/// Anything that can hand out the element set of a named satellite.
pub trait ElementSource {
    fn element_set(&mut self, satellite: &str) -> Result<TleEntry, PredictError>;
}

pub struct TleEntry {
    pub name: String,
    pub norad_id: u64,
    pub elements: Elements,
    pub constants: Constants,
}

/// Raw TLE record as found in a catalog file.
#[derive(Debug, Clone, PartialEq)]
pub struct TleRecord {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    /// NORAD catalog number from columns 3-7 of line 1.
    pub fn norad_id(&self) -> Option<u64> {
        self.line1.get(2..7)?.trim().parse().ok()
    }

    pub fn display_name(&self) -> String {
        match (&self.name, self.norad_id()) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("NORAD {}", id),
            (None, None) => "unnamed".to_string(),
        }
    }

    pub fn to_entry(&self) -> Result<TleEntry, PredictError> {
        let invalid = |message: String| PredictError::InvalidTle {
            name: self.display_name(),
            message,
        };

        let elements = Elements::from_tle(
            self.name.clone(),
            self.line1.as_bytes(),
            self.line2.as_bytes(),
        )
        .map_err(|e| invalid(e.to_string()))?;
        let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        Ok(TleEntry {
            name: self.display_name(),
            norad_id: elements.norad_id,
            elements,
            constants,
        })
    }
}

/// Parsed, in-memory TLE catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<TleRecord>,
}

impl Catalog {
    pub fn parse(content: &str) -> Self {
        Self {
            records: parse_multi_tle(content),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find by exact name, or by NORAD number when the query is numeric.
    pub fn find(&self, query: &str) -> Result<&TleRecord, PredictError> {
        let query = query.trim();
        let by_name = self
            .records
            .iter()
            .find(|r| r.name.as_deref() == Some(query));
        if let Some(record) = by_name {
            return Ok(record);
        }

        query
            .parse::<u64>()
            .ok()
            .and_then(|id| self.records.iter().find(|r| r.norad_id() == Some(id)))
            .ok_or_else(|| PredictError::NotFound(query.to_string()))
    }
}

impl ElementSource for Catalog {
    fn element_set(&mut self, satellite: &str) -> Result<TleEntry, PredictError> {
        self.find(satellite)?.to_entry()
    }
}

/// Parse multi-satellite TLE content
fn parse_multi_tle(content: &str) -> Vec<TleRecord> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push(TleRecord {
                name: None,
                line1: lines[i].to_string(),
                line2: lines[i + 1].to_string(),
            });
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // Some catalogs prefix the name line with "0 "
            let name = lines[i].strip_prefix("0 ").unwrap_or(lines[i]).trim();
            result.push(TleRecord {
                name: Some(name.to_string()),
                line1: lines[i + 1].to_string(),
                line2: lines[i + 2].to_string(),
            });
            i += 3;
        } else {
            log::debug!("skipping unrecognised catalog line: {}", lines[i]);
            i += 1;
        }
    }

    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const STATIONS: &str = "\
ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
garbage line
0 TESTSAT
1 49044U 21066A   20194.88612269 -.00002218  00000-0 -31515-4 0  9998
2 49044  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236009
";

    #[test]
    fn parses_named_records_and_skips_garbage() {
        let catalog = Catalog::parse(STATIONS);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records[0].name.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(catalog.records[1].name.as_deref(), Some("TESTSAT"));
    }

    #[test]
    fn parses_unnamed_records() {
        let content = "\
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
";
        let catalog = Catalog::parse(content);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records[0].name, None);
        assert_eq!(catalog.records[0].display_name(), "NORAD 25544");
    }

    #[test]
    fn finds_by_name_and_norad_id() {
        let catalog = Catalog::parse(STATIONS);
        assert_eq!(catalog.find("ISS (ZARYA)").unwrap().norad_id(), Some(25544));
        assert_eq!(
            catalog.find("49044").unwrap().name.as_deref(),
            Some("TESTSAT")
        );
    }

    #[test]
    fn missing_satellite_is_not_found() {
        let catalog = Catalog::parse(STATIONS);
        assert!(matches!(
            catalog.find("ISS"),
            Err(PredictError::NotFound(name)) if name == "ISS"
        ));
        assert!(matches!(catalog.find("99999"), Err(PredictError::NotFound(_))));
    }

    #[test]
    fn element_set_builds_sgp4_entry() {
        let mut catalog = Catalog::parse(STATIONS);
        let entry = catalog.element_set("ISS (ZARYA)").unwrap();
        assert_eq!(entry.name, "ISS (ZARYA)");
        assert_eq!(entry.norad_id, 25544);
    }

    #[test]
    fn corrupted_record_is_invalid_tle() {
        let content = "\
BROKEN
1 25544U 98067A   20194.88612269
2 25544  51.6461 221.2784
";
        let mut catalog = Catalog::parse(content);
        assert!(matches!(
            catalog.element_set("BROKEN"),
            Err(PredictError::InvalidTle { .. })
        ));
    }
}
