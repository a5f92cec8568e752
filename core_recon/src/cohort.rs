//! Groups raw reports into per-turn cohorts.

use std::collections::HashMap;

use report_schema::Report;

/// Partition `reports` by `tick / ticks_per_turn`.
///
/// Every produced cohort is non-empty and preserves the input order of its
/// members. No ordering is imposed across cohorts; the timeline driver sorts
/// turns later. Undecodable snapshots must have been filtered out upstream.
pub fn group_into_cohorts(reports: Vec<Report>, ticks_per_turn: u32) -> HashMap<u32, Vec<Report>> {
    let mut cohorts: HashMap<u32, Vec<Report>> = HashMap::new();
    for report in reports {
        cohorts
            .entry(report.turn(ticks_per_turn))
            .or_default()
            .push(report);
    }
    cohorts
}
