//! The merged per-turn world state.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

use ahash::RandomState;
use report_schema::{Fleet, FleetId, Player, PlayerId, Star, StarId};

/// What the reconstruction knows about one star this turn.
///
/// The distinction is structural rather than a flag: a `Remembered` entry can
/// only be created by carry-forward, and always carries the record from the
/// last turn the star was observed, unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum StarKnowledge {
    /// Freshly reported by at least one player this turn.
    Observed(Star),
    /// Known from an earlier turn, currently outside everyone's sensors.
    Remembered(Star),
}

impl StarKnowledge {
    pub fn star(&self) -> &Star {
        match self {
            StarKnowledge::Observed(star) | StarKnowledge::Remembered(star) => star,
        }
    }

    pub fn is_observed(&self) -> bool {
        matches!(self, StarKnowledge::Observed(_))
    }
}

/// The authoritative aggregate for one turn.
///
/// Created by the merge engine, augmented exactly once by carry-forward, then
/// handed to the output boundary and never mutated again.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub turn: u32,
    /// Tick adopted from the first report merged into this turn.
    pub tick: u32,
    pub stars: HashMap<StarId, StarKnowledge>,
    pub players: HashMap<PlayerId, Player>,
    pub fleets: HashMap<FleetId, Fleet>,
}

// Fixed seeds keep the content hash stable across processes.
const HASH_SEEDS: (u64, u64, u64, u64) = (
    0x7374_6172_7665_696c,
    0x7265_636f_6e_0001,
    0x6d61_705f_7265_6e64,
    0x776f_726c_6473_7461,
);

impl WorldState {
    /// Deterministic content hash over the sorted entity maps.
    ///
    /// Two reconstructions of the same inputs hash identically regardless of
    /// map iteration order.
    pub fn content_hash(&self) -> u64 {
        let state =
            RandomState::with_seeds(HASH_SEEDS.0, HASH_SEEDS.1, HASH_SEEDS.2, HASH_SEEDS.3);
        let mut hasher = state.build_hasher();

        hasher.write_u32(self.turn);
        hasher.write_u32(self.tick);

        let mut star_ids: Vec<StarId> = self.stars.keys().copied().collect();
        star_ids.sort_unstable();
        for id in star_ids {
            let knowledge = &self.stars[&id];
            let star = knowledge.star();
            hasher.write_i32(id.0);
            hasher.write_u8(knowledge.is_observed() as u8);
            hash_str(&mut hasher, &star.name);
            hasher.write_i32(star.owner.0);
            hasher.write_u64(star.x.to_bits());
            hasher.write_u64(star.y.to_bits());
        }

        let mut player_ids: Vec<PlayerId> = self.players.keys().copied().collect();
        player_ids.sort_unstable();
        for id in player_ids {
            let player = &self.players[&id];
            hasher.write_i32(id.0);
            hash_str(&mut hasher, &player.alias);
            let mut techs: Vec<(&String, &report_schema::Tech)> = player.tech.iter().collect();
            techs.sort_by(|a, b| a.0.cmp(b.0));
            for (name, tech) in techs {
                hash_str(&mut hasher, name);
                hasher.write_u64(tech.value.to_bits());
                hasher.write_i32(tech.level);
            }
        }

        let mut fleet_ids: Vec<FleetId> = self.fleets.keys().copied().collect();
        fleet_ids.sort_unstable();
        for id in fleet_ids {
            let fleet = &self.fleets[&id];
            hasher.write_i32(id.0);
            hash_str(&mut hasher, &fleet.name);
            hasher.write_i32(fleet.owner.0);
            hasher.write_u64(fleet.x.to_bits());
            hasher.write_u64(fleet.y.to_bits());
            hasher.write_u64(fleet.lx.to_bits());
            hasher.write_u64(fleet.ly.to_bits());
            hasher.write_i32(fleet.ships);
            hasher.write_usize(fleet.orders.len());
            for order in &fleet.orders {
                hasher.write_i32(order.delay);
                hasher.write_i32(order.destination.0);
                hasher.write_i32(order.command.code());
                hasher.write_i32(order.param);
            }
        }

        hasher.finish()
    }
}

fn hash_str(hasher: &mut impl Hasher, value: &str) {
    hasher.write_usize(value.len());
    hasher.write(value.as_bytes());
}
