//! Orders merged turns and feeds them to the output boundary.

use report_schema::Report;
use thiserror::Error;

use crate::carry_forward::carry_forward;
use crate::cohort::group_into_cohorts;
use crate::config::ReconConfig;
use crate::diagnostics::{Conflict, DiagnosticSink};
use crate::merge::{merge_cohort, MergeError};
use crate::metrics::ReconMetrics;
use crate::world::WorldState;

/// The output boundary: consumes each world state exactly once, in strictly
/// ascending turn order, and must not retain it past the call.
pub trait TurnConsumer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn accept(&mut self, state: &WorldState) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum DriveError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("turn consumer failed on turn {turn}")]
    Consumer {
        turn: u32,
        #[source]
        source: E,
    },
}

/// Reconstruct the full timeline: group, merge every cohort, order ascending
/// by turn, and carry stars forward through the ordered sequence.
///
/// Turn numbers need not be contiguous. Across a gap the carry-forward source
/// is the most recent processed turn, so knowledge is never lost to a missing
/// frame.
pub fn reconstruct(
    reports: Vec<Report>,
    config: &ReconConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<WorldState>, MergeError> {
    let cohorts = group_into_cohorts(reports, config.ticks_per_turn);

    let mut states = Vec::with_capacity(cohorts.len());
    for (turn, cohort) in cohorts {
        states.push(merge_cohort(turn, cohort, config, sink)?);
    }
    states.sort_unstable_by_key(|state| state.turn);

    for current in 1..states.len() {
        let (processed, rest) = states.split_at_mut(current);
        carry_forward(processed.last(), &mut rest[0]);
    }

    Ok(states)
}

/// Run the full pipeline and hand each world state to `consumer`.
///
/// Returns the run counters; consumer failures abort the drive at the turn
/// that rejected its state.
pub fn drive<C: TurnConsumer>(
    reports: Vec<Report>,
    config: &ReconConfig,
    sink: &mut dyn DiagnosticSink,
    consumer: &mut C,
) -> Result<ReconMetrics, DriveError<C::Error>> {
    let report_count = reports.len();

    let mut counting = CountingSink {
        inner: sink,
        tick_mismatches: 0,
        star_mismatches: 0,
    };
    let states = reconstruct(reports, config, &mut counting)?;

    let metrics = ReconMetrics {
        turns: states.len(),
        reports: report_count,
        reports_skipped: counting.tick_mismatches,
        star_conflicts: counting.star_mismatches,
        stars_carried: states
            .iter()
            .map(|state| state.stars.values().filter(|k| !k.is_observed()).count())
            .sum(),
    };

    for state in &states {
        consumer
            .accept(state)
            .map_err(|source| DriveError::Consumer {
                turn: state.turn,
                source,
            })?;
    }

    tracing::info!(
        target: "starveil::timeline",
        turns = metrics.turns,
        reports = metrics.reports,
        reports_skipped = metrics.reports_skipped,
        star_conflicts = metrics.star_conflicts,
        stars_carried = metrics.stars_carried,
        "timeline.complete"
    );

    Ok(metrics)
}

/// Counts conflicts by kind while forwarding them to the caller's sink.
struct CountingSink<'a> {
    inner: &'a mut dyn DiagnosticSink,
    tick_mismatches: usize,
    star_mismatches: usize,
}

impl DiagnosticSink for CountingSink<'_> {
    fn report(&mut self, conflict: Conflict) {
        match &conflict {
            Conflict::TickMismatch { .. } => self.tick_mismatches += 1,
            Conflict::StarMismatch { .. } => self.star_mismatches += 1,
        }
        self.inner.report(conflict);
    }
}
