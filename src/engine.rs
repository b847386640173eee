//! Filter/Aggregate Engine - turns a selection into chart-ready tables
//!
//! Both operations are pure: same dataset and selection, same output.
//! - Pie data: success counts per site (ALL) or outcome counts at one site
//! - Scatter data: records inside the payload range, optionally at one site

use serde::Serialize;
use thiserror::Error;

use crate::dataset::{Dataset, Outcome};
use crate::selection::{PayloadRange, SiteSelection};

#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("No launch records at site '{0}'")]
    UnknownSite(String),
    #[error("Dataset has no records")]
    EmptyDataset,
}

/// One pie slice. The shape depends on the selection mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PieRow {
    /// ALL-sites mode: slice value is `successes`
    BySite {
        site: String,
        successes: u32,
        launches: u32,
    },
    /// Single-site mode: slice value is `count`
    ByOutcome { outcome: Outcome, count: u32 },
}

impl PieRow {
    pub fn label(&self) -> String {
        match self {
            PieRow::BySite { site, .. } => site.clone(),
            PieRow::ByOutcome { outcome, .. } => outcome.as_u8().to_string(),
        }
    }

    pub fn value(&self) -> u32 {
        match self {
            PieRow::BySite { successes, .. } => *successes,
            PieRow::ByOutcome { count, .. } => *count,
        }
    }
}

/// Per-record projection plotted as payload vs. outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: String,
}

/// Aggregate the dataset into pie slices for `site`
pub fn compute_pie_data(dataset: &Dataset, site: &SiteSelection) -> Result<Vec<PieRow>, EngineError> {
    match site {
        SiteSelection::All => {
            if dataset.is_empty() {
                return Err(EngineError::EmptyDataset);
            }

            // sites() is first-appearance order, so groups come out in that order
            let rows = dataset
                .sites()
                .iter()
                .map(|name| {
                    let (launches, successes) = dataset
                        .records()
                        .iter()
                        .filter(|r| &r.launch_site == name)
                        .fold((0u32, 0u32), |(n, ok), r| {
                            (n + 1, ok + u32::from(r.outcome.is_success()))
                        });
                    PieRow::BySite {
                        site: name.clone(),
                        successes,
                        launches,
                    }
                })
                .collect();
            Ok(rows)
        }
        SiteSelection::Site(name) => {
            if !dataset.has_site(name) {
                return Err(EngineError::UnknownSite(name.clone()));
            }

            let mut counts = [0u32; 2];
            for record in dataset.records().iter().filter(|r| &r.launch_site == name) {
                counts[record.outcome.as_u8() as usize] += 1;
            }

            // absent outcome classes produce no row
            let rows = [Outcome::Failure, Outcome::Success]
                .into_iter()
                .zip(counts)
                .filter(|&(_, count)| count > 0)
                .map(|(outcome, count)| PieRow::ByOutcome { outcome, count })
                .collect();
            Ok(rows)
        }
    }
}

/// Project the records inside `range` (and at `site`, unless ALL)
pub fn compute_scatter_data(
    dataset: &Dataset,
    site: &SiteSelection,
    range: &PayloadRange,
) -> Vec<ScatterPoint> {
    dataset
        .records()
        .iter()
        .filter(|r| range.contains(r.payload_mass_kg))
        .filter(|r| site.matches(&r.launch_site))
        .map(|r| ScatterPoint {
            payload_mass_kg: r.payload_mass_kg,
            outcome: r.outcome,
            booster_version_category: r.booster_version_category.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LaunchRecord;
    use proptest::prelude::*;

    fn scenario() -> Dataset {
        Dataset::from_records(vec![
            LaunchRecord::new("CCAFS", 500.0, Outcome::Success, "v1.0"),
            LaunchRecord::new("CCAFS", 2000.0, Outcome::Failure, "v1.1"),
            LaunchRecord::new("KSC", 3000.0, Outcome::Success, "v1.0"),
        ])
    }

    fn site(name: &str) -> SiteSelection {
        SiteSelection::from(name)
    }

    #[test]
    fn test_pie_all_sites_counts_successes() {
        let rows = compute_pie_data(&scenario(), &SiteSelection::All).unwrap();
        assert_eq!(
            rows,
            vec![
                PieRow::BySite { site: "CCAFS".into(), successes: 1, launches: 2 },
                PieRow::BySite { site: "KSC".into(), successes: 1, launches: 1 },
            ]
        );
    }

    #[test]
    fn test_pie_single_site_outcome_counts() {
        let rows = compute_pie_data(&scenario(), &site("CCAFS")).unwrap();
        assert_eq!(
            rows,
            vec![
                PieRow::ByOutcome { outcome: Outcome::Failure, count: 1 },
                PieRow::ByOutcome { outcome: Outcome::Success, count: 1 },
            ]
        );
        assert_eq!(rows[0].label(), "0");
        assert_eq!(rows[1].label(), "1");
    }

    #[test]
    fn test_pie_single_outcome_site_has_one_slice() {
        let rows = compute_pie_data(&scenario(), &site("KSC")).unwrap();
        assert_eq!(rows, vec![PieRow::ByOutcome { outcome: Outcome::Success, count: 1 }]);
    }

    #[test]
    fn test_pie_site_without_successes_keeps_row() {
        let dataset = Dataset::from_records(vec![
            LaunchRecord::new("VAFB", 100.0, Outcome::Failure, "v1.1"),
            LaunchRecord::new("KSC", 100.0, Outcome::Success, "FT"),
        ]);
        let rows = compute_pie_data(&dataset, &SiteSelection::All).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value(), 0);
    }

    #[test]
    fn test_pie_unknown_site() {
        let err = compute_pie_data(&scenario(), &site("ccafs")).unwrap_err();
        assert_eq!(err, EngineError::UnknownSite("ccafs".into()));
    }

    #[test]
    fn test_pie_empty_dataset() {
        let dataset = Dataset::from_records(vec![]);
        assert_eq!(
            compute_pie_data(&dataset, &SiteSelection::All),
            Err(EngineError::EmptyDataset)
        );
    }

    #[test]
    fn test_scatter_payload_filter() {
        let range = PayloadRange::new(0.0, 2500.0).unwrap();
        let points = compute_scatter_data(&scenario(), &SiteSelection::All, &range);
        let payloads: Vec<f64> = points.iter().map(|p| p.payload_mass_kg).collect();
        assert_eq!(payloads, vec![500.0, 2000.0]);
    }

    #[test]
    fn test_scatter_site_filter() {
        let range = PayloadRange::new(0.0, 10000.0).unwrap();
        let points = compute_scatter_data(&scenario(), &site("KSC"), &range);
        assert_eq!(
            points,
            vec![ScatterPoint {
                payload_mass_kg: 3000.0,
                outcome: Outcome::Success,
                booster_version_category: "v1.0".into(),
            }]
        );
    }

    #[test]
    fn test_scatter_zero_range() {
        let dataset = Dataset::from_records(vec![
            LaunchRecord::new("CCAFS", 0.0, Outcome::Failure, "v1.0"),
            LaunchRecord::new("CCAFS", 1.0, Outcome::Failure, "v1.0"),
        ]);
        let range = PayloadRange::new(0.0, 0.0).unwrap();
        let points = compute_scatter_data(&dataset, &SiteSelection::All, &range);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].payload_mass_kg, 0.0);

        assert!(compute_scatter_data(&scenario(), &SiteSelection::All, &range).is_empty());
    }

    #[test]
    fn test_scatter_unknown_site_is_empty() {
        let range = PayloadRange::new(0.0, 10000.0).unwrap();
        assert!(compute_scatter_data(&scenario(), &site("Boca Chica"), &range).is_empty());
    }

    const SITES: [&str; 4] = ["CCAFS LC-40", "CCAFS SLC-40", "KSC LC-39A", "VAFB SLC-4E"];

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        prop::collection::vec(
            (0..SITES.len(), 0.0f64..10000.0, any::<bool>(), 0..3usize),
            0..40,
        )
        .prop_map(|rows| {
            let records = rows
                .into_iter()
                .map(|(s, payload, ok, booster)| {
                    let outcome = if ok { Outcome::Success } else { Outcome::Failure };
                    LaunchRecord::new(SITES[s], payload.floor(), outcome, ["v1.0", "v1.1", "FT"][booster])
                })
                .collect();
            Dataset::from_records(records)
        })
    }

    fn arb_selection() -> impl Strategy<Value = SiteSelection> {
        prop_oneof![
            Just(SiteSelection::All),
            (0..SITES.len()).prop_map(|i| SiteSelection::from(SITES[i])),
        ]
    }

    proptest! {
        #[test]
        fn prop_single_site_pie_counts_records(dataset in arb_dataset(), i in 0..SITES.len()) {
            let name = SITES[i];
            let at_site = dataset.records().iter().filter(|r| r.launch_site == name).count() as u32;
            match compute_pie_data(&dataset, &site(name)) {
                Ok(rows) => {
                    prop_assert!(rows.len() <= 2);
                    for row in &rows {
                        prop_assert!(matches!(row, PieRow::ByOutcome { .. }), "expected outcome row, got {:?}", row);
                    }
                    prop_assert_eq!(rows.iter().map(PieRow::value).sum::<u32>(), at_site);
                }
                Err(err) => {
                    prop_assert_eq!(at_site, 0);
                    prop_assert_eq!(err, EngineError::UnknownSite(name.to_string()));
                }
            }
        }

        #[test]
        fn prop_all_sites_pie_one_row_per_site(dataset in arb_dataset()) {
            prop_assume!(!dataset.is_empty());
            let rows = compute_pie_data(&dataset, &SiteSelection::All).unwrap();
            let labels: Vec<String> = rows.iter().map(PieRow::label).collect();
            prop_assert_eq!(labels, dataset.sites().to_vec());
        }

        #[test]
        fn prop_scatter_respects_filters(
            dataset in arb_dataset(),
            selection in arb_selection(),
            a in 0.0f64..10000.0,
            b in 0.0f64..10000.0,
        ) {
            let range = PayloadRange::new(a.min(b), a.max(b)).unwrap();
            let (lo, hi) = (a.min(b), a.max(b));
            let points = compute_scatter_data(&dataset, &selection, &range);
            for point in &points {
                prop_assert!(lo <= point.payload_mass_kg && point.payload_mass_kg <= hi);
            }

            let expected: Vec<ScatterPoint> = dataset
                .records()
                .iter()
                .filter(|r| lo <= r.payload_mass_kg && r.payload_mass_kg <= hi)
                .filter(|r| match &selection {
                    SiteSelection::All => true,
                    SiteSelection::Site(name) => &r.launch_site == name,
                })
                .map(|r| ScatterPoint {
                    payload_mass_kg: r.payload_mass_kg,
                    outcome: r.outcome,
                    booster_version_category: r.booster_version_category.clone(),
                })
                .collect();
            prop_assert_eq!(points, expected);
        }

        #[test]
        fn prop_aggregates_are_idempotent(dataset in arb_dataset(), selection in arb_selection()) {
            let range = PayloadRange::new(2500.0, 7500.0).unwrap();
            prop_assert_eq!(
                compute_pie_data(&dataset, &selection),
                compute_pie_data(&dataset, &selection)
            );
            prop_assert_eq!(
                compute_scatter_data(&dataset, &selection, &range),
                compute_scatter_data(&dataset, &selection, &range)
            );
        }
    }
}
