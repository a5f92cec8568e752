//! Conflict diagnostics and the sink boundary they are delivered through.
//!
//! Conflicts are warnings, never fatal: the merge keeps the first-encountered
//! record, surfaces the disagreement, and continues with the rest of the
//! cohort.

use std::fmt;

use crossbeam_channel::Sender;
use report_schema::{PlayerId, StarId};

/// Star field a cohort disagreed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Name,
    Owner,
    Position,
}

impl fmt::Display for ConflictField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConflictField::Name => "name",
            ConflictField::Owner => "owner",
            ConflictField::Position => "position",
        };
        f.write_str(label)
    }
}

/// A detected disagreement between reports in one cohort.
#[derive(Debug, Clone, PartialEq)]
pub enum Conflict {
    /// A report declares a tick that contradicts the tick adopted for its
    /// turn bucket. The report's entire content is skipped.
    TickMismatch {
        turn: u32,
        expected_tick: u32,
        reported_tick: u32,
        reporter: PlayerId,
    },
    /// Two reports describe the same star differently. The first-encountered
    /// record is retained.
    StarMismatch {
        turn: u32,
        star: StarId,
        name: String,
        field: ConflictField,
        kept: String,
        rejected: String,
    },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::TickMismatch {
                turn,
                expected_tick,
                reported_tick,
                reporter,
            } => write!(
                f,
                "report from player {reporter} declares tick {reported_tick} \
                 but turn {turn} was assigned tick {expected_tick}"
            ),
            Conflict::StarMismatch {
                turn,
                star,
                name,
                field,
                kept,
                rejected,
            } => write!(
                f,
                "conflicting {field} for star {name} (id {star}) on turn {turn}: \
                 kept {kept}, rejected {rejected}"
            ),
        }
    }
}

/// Receives conflict diagnostics as they are detected.
pub trait DiagnosticSink {
    fn report(&mut self, conflict: Conflict);
}

/// Default sink: emits each conflict as a structured tracing warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, conflict: Conflict) {
        match &conflict {
            Conflict::TickMismatch {
                turn,
                expected_tick,
                reported_tick,
                reporter,
            } => {
                tracing::warn!(
                    target: "starveil::merge",
                    turn = *turn,
                    expected_tick = *expected_tick,
                    reported_tick = *reported_tick,
                    reporter = %reporter,
                    "merge.tick_mismatch"
                );
            }
            Conflict::StarMismatch {
                turn,
                star,
                name,
                field,
                kept,
                rejected,
            } => {
                tracing::warn!(
                    target: "starveil::merge",
                    turn = *turn,
                    star = %star,
                    name = %name,
                    field = %field,
                    kept = %kept,
                    rejected = %rejected,
                    "merge.star_conflict"
                );
            }
        }
    }
}

/// Forwards conflicts to an external collector over a channel.
///
/// A disconnected receiver is ignored; diagnostics are best-effort.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<Conflict>,
}

impl ChannelSink {
    pub fn new(sender: Sender<Conflict>) -> Self {
        Self { sender }
    }
}

impl DiagnosticSink for ChannelSink {
    fn report(&mut self, conflict: Conflict) {
        let _ = self.sender.send(conflict);
    }
}

/// Buffers every conflict in memory. Intended for tests and one-shot audits.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub conflicts: Vec<Conflict>,
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }
}
