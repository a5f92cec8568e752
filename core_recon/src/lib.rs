//! Reconstruction engine for the Starveil map pipeline.
//!
//! Collapses independently captured, partially visible per-player snapshot
//! reports into one authoritative world state per turn: reports are grouped
//! into per-turn cohorts, each cohort is merged under union-of-visibility
//! semantics with conflict surfacing, and stars known from earlier turns are
//! carried forward into turns where nobody currently observes them.
//!
//! The engine is a synchronous, in-memory batch transformation: no I/O, no
//! suspension points, no shared state between turns beyond the explicit
//! previous-state handoff inside [`reconstruct`].

mod carry_forward;
mod cohort;
pub mod config;
pub mod diagnostics;
mod merge;
pub mod metrics;
mod timeline;
mod world;

pub use carry_forward::carry_forward;
pub use cohort::group_into_cohorts;
pub use config::{load_recon_config, ConfigError, ReconConfig};
pub use diagnostics::{
    ChannelSink, CollectingSink, Conflict, ConflictField, DiagnosticSink, TracingSink,
};
pub use merge::{merge_cohort, MergeError};
pub use metrics::ReconMetrics;
pub use timeline::{drive, reconstruct, DriveError, TurnConsumer};
pub use world::{StarKnowledge, WorldState};
