//! Collapses one cohort of reports into a single authoritative world state.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use report_schema::{Report, Star};
use thiserror::Error;

use crate::config::ReconConfig;
use crate::diagnostics::{Conflict, ConflictField, DiagnosticSink};
use crate::world::{StarKnowledge, WorldState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("cannot merge an empty cohort")]
    EmptyCohort,
}

/// Merge every report of one turn into a single [`WorldState`].
///
/// Union-of-visibility: an entity appears in the result if any report saw it.
/// A player's own report evicts earlier third-party mentions of that player;
/// fleets and stars are first-writer-wins under the cohort's input order.
/// Disagreements between reports are surfaced through `sink`, never resolved.
///
/// Fails only on an empty cohort, which a correct grouper never produces.
pub fn merge_cohort(
    turn: u32,
    cohort: Vec<Report>,
    config: &ReconConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<WorldState, MergeError> {
    let mut tick: Option<u32> = None;
    let mut stars = HashMap::new();
    let mut players = HashMap::new();
    let mut fleets = HashMap::new();

    for report in cohort {
        match tick {
            None => tick = Some(report.tick),
            Some(expected) if expected != report.tick => {
                sink.report(Conflict::TickMismatch {
                    turn,
                    expected_tick: expected,
                    reported_tick: report.tick,
                    reporter: report.player,
                });
                continue;
            }
            Some(_) => {}
        }

        // A player's own report is authoritative about themselves; evict any
        // earlier mention before the plain insert below.
        let reporter = report.player;
        for (id, player) in report.players {
            if id == reporter {
                players.remove(&id);
            }
            players.entry(id).or_insert(player);
        }

        // Only the owner reports a fleet in detail; no two reports should
        // claim the same fleet.
        for (id, fleet) in report.fleets {
            fleets.entry(id).or_insert(fleet);
        }

        for (id, star) in report.stars {
            match stars.entry(id) {
                Entry::Vacant(slot) => {
                    slot.insert(StarKnowledge::Observed(star));
                }
                Entry::Occupied(slot) => {
                    if let Some((field, kept, rejected)) =
                        star_mismatch(slot.get().star(), &star, config.star_position_tolerance)
                    {
                        sink.report(Conflict::StarMismatch {
                            turn,
                            star: id,
                            name: slot.get().star().name.clone(),
                            field,
                            kept,
                            rejected,
                        });
                    }
                }
            }
        }
    }

    let tick = tick.ok_or(MergeError::EmptyCohort)?;
    Ok(WorldState {
        turn,
        tick,
        stars,
        players,
        fleets,
    })
}

/// First field on which two records of the same star disagree, with both
/// values rendered for the diagnostic.
fn star_mismatch(
    kept: &Star,
    incoming: &Star,
    tolerance: f64,
) -> Option<(ConflictField, String, String)> {
    if kept.name != incoming.name {
        return Some((
            ConflictField::Name,
            kept.name.clone(),
            incoming.name.clone(),
        ));
    }
    if kept.owner != incoming.owner {
        return Some((
            ConflictField::Owner,
            kept.owner.to_string(),
            incoming.owner.to_string(),
        ));
    }
    if (kept.x - incoming.x).abs() > tolerance || (kept.y - incoming.y).abs() > tolerance {
        return Some((
            ConflictField::Position,
            format!("({}, {})", kept.x, kept.y),
            format!("({}, {})", incoming.x, incoming.y),
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use report_schema::{Fleet, FleetId, Player, PlayerId, StarId, Tech};

    use super::*;
    use crate::diagnostics::CollectingSink;

    fn star(name: &str, owner: i32, x: f64, y: f64) -> Star {
        Star {
            name: name.to_string(),
            owner: PlayerId(owner),
            x,
            y,
        }
    }

    fn player(id: i32, alias: &str, scanning: f64) -> Player {
        let mut tech = HashMap::new();
        tech.insert(
            report_schema::SCANNING_TECH.to_string(),
            Tech {
                value: scanning,
                level: 1,
            },
        );
        Player {
            id: PlayerId(id),
            alias: alias.to_string(),
            tech,
        }
    }

    fn fleet(id: i32, owner: i32, ships: i32) -> Fleet {
        Fleet {
            id: FleetId(id),
            name: format!("fleet-{id}"),
            owner: PlayerId(owner),
            x: 0.0,
            y: 0.0,
            lx: 0.0,
            ly: 0.0,
            ships,
            orders: Vec::new(),
        }
    }

    fn report(tick: u32, reporter: i32, stars: Vec<(i32, Star)>) -> Report {
        let mut report = Report {
            tick,
            player: PlayerId(reporter),
            stars: HashMap::new(),
            players: HashMap::new(),
            fleets: HashMap::new(),
        };
        for (id, star) in stars {
            report.stars.insert(StarId(id), star);
        }
        report
            .players
            .insert(PlayerId(reporter), player(reporter, "self", 0.5));
        report
    }

    #[test]
    fn empty_cohort_is_a_contract_violation() {
        let mut sink = CollectingSink::default();
        let result = merge_cohort(0, Vec::new(), &ReconConfig::default(), &mut sink);
        assert_eq!(result.unwrap_err(), MergeError::EmptyCohort);
    }

    #[test]
    fn union_of_visibility() {
        let mut sink = CollectingSink::default();
        let cohort = vec![
            report(12, 1, vec![(5, star("Sol", 1, 0.0, 0.0))]),
            report(
                12,
                2,
                vec![
                    (5, star("Sol", 1, 0.0, 0.0)),
                    (9, star("Rigel", 2, 3.0, 4.0)),
                ],
            ),
        ];

        let state = merge_cohort(2, cohort, &ReconConfig::default(), &mut sink).unwrap();

        assert_eq!(state.turn, 2);
        assert_eq!(state.tick, 12);
        assert_eq!(state.stars.len(), 2);
        assert!(state.stars[&StarId(5)].is_observed());
        assert_eq!(state.stars[&StarId(9)].star().name, "Rigel");
        assert_eq!(state.players.len(), 2);
        assert!(sink.conflicts.is_empty());
    }

    #[test]
    fn conflicting_star_surfaces_one_diagnostic_and_keeps_first() {
        let mut sink = CollectingSink::default();
        let cohort = vec![
            report(12, 1, vec![(5, star("Sol", 1, 0.0, 0.0))]),
            report(12, 2, vec![(5, star("Sol", 2, 0.0, 0.0))]),
        ];

        let state = merge_cohort(2, cohort, &ReconConfig::default(), &mut sink).unwrap();

        assert_eq!(sink.conflicts.len(), 1);
        match &sink.conflicts[0] {
            Conflict::StarMismatch {
                star, name, field, ..
            } => {
                assert_eq!(*star, StarId(5));
                assert_eq!(name, "Sol");
                assert_eq!(*field, ConflictField::Owner);
            }
            other => panic!("unexpected diagnostic {other:?}"),
        }
        assert_eq!(state.stars[&StarId(5)].star().owner, PlayerId(1));
    }

    #[test]
    fn position_noise_within_tolerance_is_not_a_conflict() {
        let mut sink = CollectingSink::default();
        let cohort = vec![
            report(12, 1, vec![(5, star("Sol", 1, 0.0, 0.0))]),
            report(12, 2, vec![(5, star("Sol", 1, 5.0e-5, -5.0e-5))]),
        ];

        merge_cohort(2, cohort, &ReconConfig::default(), &mut sink).unwrap();
        assert!(sink.conflicts.is_empty());
    }

    #[test]
    fn position_drift_outside_tolerance_conflicts() {
        let mut sink = CollectingSink::default();
        let cohort = vec![
            report(12, 1, vec![(5, star("Sol", 1, 0.0, 0.0))]),
            report(12, 2, vec![(5, star("Sol", 1, 0.01, 0.0))]),
        ];

        merge_cohort(2, cohort, &ReconConfig::default(), &mut sink).unwrap();

        assert_eq!(sink.conflicts.len(), 1);
        assert!(matches!(
            sink.conflicts[0],
            Conflict::StarMismatch {
                field: ConflictField::Position,
                ..
            }
        ));
    }

    #[test]
    fn tick_mismatch_skips_the_whole_report() {
        let mut sink = CollectingSink::default();
        let cohort = vec![
            report(12, 1, vec![(5, star("Sol", 1, 0.0, 0.0))]),
            report(13, 2, vec![(9, star("Rigel", 2, 3.0, 4.0))]),
        ];

        let state = merge_cohort(2, cohort, &ReconConfig::default(), &mut sink).unwrap();

        assert_eq!(state.tick, 12);
        assert!(!state.stars.contains_key(&StarId(9)));
        assert!(!state.players.contains_key(&PlayerId(2)));
        assert!(matches!(
            sink.conflicts[0],
            Conflict::TickMismatch {
                expected_tick: 12,
                reported_tick: 13,
                ..
            }
        ));
    }

    #[test]
    fn self_report_evicts_third_party_mention() {
        let mut sink = CollectingSink::default();

        // Player 1 carries a stale view of player 2's tech.
        let mut first = report(12, 1, vec![]);
        first
            .players
            .insert(PlayerId(2), player(2, "stale", 0.25));
        let second = report(12, 2, vec![]);

        let state = merge_cohort(2, vec![first, second], &ReconConfig::default(), &mut sink)
            .unwrap();

        assert_eq!(state.players[&PlayerId(2)].alias, "self");
    }

    #[test]
    fn third_party_mention_does_not_overwrite_self_report() {
        let mut sink = CollectingSink::default();

        let first = report(12, 1, vec![]);
        let mut second = report(12, 2, vec![]);
        second
            .players
            .insert(PlayerId(1), player(1, "hearsay", 0.1));

        let state = merge_cohort(2, vec![first, second], &ReconConfig::default(), &mut sink)
            .unwrap();

        assert_eq!(state.players[&PlayerId(1)].alias, "self");
    }

    #[test]
    fn fleets_are_first_writer_wins() {
        let mut sink = CollectingSink::default();

        let mut first = report(12, 1, vec![]);
        first.fleets.insert(FleetId(7), fleet(7, 1, 30));
        let mut second = report(12, 2, vec![]);
        second.fleets.insert(FleetId(7), fleet(7, 1, 99));

        let state = merge_cohort(2, vec![first, second], &ReconConfig::default(), &mut sink)
            .unwrap();

        assert_eq!(state.fleets[&FleetId(7)].ships, 30);
    }

    #[test]
    fn missing_self_record_is_a_silent_no_op() {
        let mut sink = CollectingSink::default();
        let mut lone = report(12, 1, vec![(5, star("Sol", 1, 0.0, 0.0))]);
        lone.players.clear();

        let state =
            merge_cohort(2, vec![lone], &ReconConfig::default(), &mut sink).unwrap();

        assert!(state.players.is_empty());
        assert!(sink.conflicts.is_empty());
    }
}
