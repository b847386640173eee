//! Application State - the loaded dataset and callback table, shared read-only
//!
//! Built once at startup. Nothing in here is mutated afterwards, so requests
//! share it without locks.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::dataset::Dataset;
use crate::selection::{PayloadRange, Selection, SelectionError, SiteSelection};

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    /// Create new app state from a loaded dataset
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        tracing::debug!(
            "Building app state: {} records, {} sites",
            dataset.len(),
            dataset.sites().len()
        );
        Self {
            dashboard: Arc::new(Dashboard::new(Arc::new(dataset), config)),
        }
    }

    /// Selection from raw control values; missing values fall back to page defaults
    pub fn selection(
        &self,
        site: Option<String>,
        payload: Option<[f64; 2]>,
    ) -> Result<Selection, SelectionError> {
        let mut selection = self.dashboard.default_selection()?;
        if let Some(site) = site {
            selection.site = SiteSelection::from(site);
        }
        if let Some(payload) = payload {
            selection.payload = PayloadRange::try_from(payload)?;
        }
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{LaunchRecord, Outcome};

    fn state() -> AppState {
        let dataset = Dataset::from_records(vec![LaunchRecord::new(
            "KSC LC-39A",
            2490.0,
            Outcome::Success,
            "FT",
        )]);
        AppState::new(dataset, DashboardConfig::default())
    }

    #[test]
    fn test_selection_defaults() {
        let selection = state().selection(None, None).unwrap();
        assert_eq!(selection.site, SiteSelection::All);
        assert_eq!(selection.payload, PayloadRange::new(2500.0, 7500.0).unwrap());
    }

    #[test]
    fn test_selection_rejects_reversed_range() {
        let err = state()
            .selection(Some("KSC LC-39A".into()), Some([7000.0, 1000.0]))
            .unwrap_err();
        assert!(matches!(err, SelectionError::InvalidRange { .. }));
    }
}
