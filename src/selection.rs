//! Selection State - plain values emitted by the dropdown and range slider

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Wire value of the "all sites" dropdown option
pub const ALL_SITES: &str = "ALL";

#[derive(Error, Debug, PartialEq)]
pub enum SelectionError {
    #[error("Invalid payload range [{min}, {max}]: bounds must be finite, non-negative and ordered")]
    InvalidRange { min: f64, max: f64 },
    #[error("Unknown input control '{0}'")]
    UnknownInput(String),
}

/// Dropdown value: the `ALL` sentinel or one exact (case-sensitive) site name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Whether a record at `launch_site` passes this selection
    pub fn matches(&self, launch_site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(name) => name == launch_site,
        }
    }
}

impl From<&str> for SiteSelection {
    fn from(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }
}

impl From<String> for SiteSelection {
    fn from(value: String) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value)
        }
    }
}

impl From<SiteSelection> for String {
    fn from(selection: SiteSelection) -> Self {
        match selection {
            SiteSelection::All => ALL_SITES.to_string(),
            SiteSelection::Site(name) => name,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => f.write_str(ALL_SITES),
            SiteSelection::Site(name) => f.write_str(name),
        }
    }
}

/// Inclusive payload interval in kg
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    min: f64,
    max: f64,
}

impl PayloadRange {
    pub fn new(min: f64, max: f64) -> Result<Self, SelectionError> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(SelectionError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        payload_mass_kg >= self.min && payload_mass_kg <= self.max
    }
}

impl TryFrom<[f64; 2]> for PayloadRange {
    type Error = SelectionError;

    fn try_from([min, max]: [f64; 2]) -> Result<Self, Self::Error> {
        PayloadRange::new(min, max)
    }
}

/// Current value of every input control
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sentinel() {
        assert_eq!(SiteSelection::from("ALL"), SiteSelection::All);
        assert_eq!(
            SiteSelection::from("all"),
            SiteSelection::Site("all".to_string())
        );
        assert_eq!(String::from(SiteSelection::All), "ALL");
    }

    #[test]
    fn test_site_selection_serde() {
        let site: SiteSelection = serde_json::from_str("\"KSC LC-39A\"").unwrap();
        assert_eq!(site, SiteSelection::Site("KSC LC-39A".to_string()));
        assert!(site.matches("KSC LC-39A"));
        assert!(!site.matches("CCAFS LC-40"));

        let all: SiteSelection = serde_json::from_str("\"ALL\"").unwrap();
        assert!(all.matches("anything"));
        assert_eq!(serde_json::to_string(&all).unwrap(), "\"ALL\"");
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let range = PayloadRange::new(2500.0, 7500.0).unwrap();
        assert!(range.contains(2500.0));
        assert!(range.contains(7500.0));
        assert!(!range.contains(2499.9));
        assert!(!range.contains(7500.1));
    }

    #[test]
    fn test_range_rejects_bad_bounds() {
        assert!(PayloadRange::new(10.0, 5.0).is_err());
        assert!(PayloadRange::new(-1.0, 5.0).is_err());
        assert!(PayloadRange::new(0.0, f64::NAN).is_err());
        assert!(PayloadRange::try_from([0.0, 0.0]).is_ok());
    }
}
