//! Decoded snapshot records shared across the Starveil workspace.
//!
//! One snapshot file is one player's view of the galaxy at one tick. The
//! structs here mirror the wire format of the downloaded game state; field
//! names are mapped from the abbreviated wire names via serde renames.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tech key whose value is the owner's sensor radius in world units.
pub const SCANNING_TECH: &str = "scanning";

/// Identifier for a player. `-1` is the reserved neutral sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub i32);

impl PlayerId {
    /// Sentinel owner for unclaimed stars.
    pub const NEUTRAL: PlayerId = PlayerId(-1);

    pub fn is_neutral(self) -> bool {
        self == Self::NEUTRAL
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a star, unique for the lifetime of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StarId(pub i32);

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a fleet, unique for the lifetime of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FleetId(pub i32);

impl fmt::Display for FleetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A celestial body as decoded from a snapshot.
///
/// Carries no visibility marker: whether a star was freshly observed or is
/// only remembered from an earlier turn is a property of the reconstruction,
/// not of the snapshot record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "puid")]
    pub owner: PlayerId,
    pub x: f64,
    pub y: f64,
}

/// Standing order in a fleet's queue. Sequence order is execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Ticks until the order executes.
    pub delay: i32,
    pub destination: StarId,
    pub command: FleetCommand,
    pub param: i32,
}

/// Command codes carried in the compressed order quadruple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FleetCommand {
    DoNothing = 0,
    CollectAll = 1,
    DropAll = 2,
    Collect = 3,
    Drop = 4,
    CollectAllBut = 5,
    DropAllBut = 6,
    Garrison = 7,
}

impl FleetCommand {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(FleetCommand::DoNothing),
            1 => Some(FleetCommand::CollectAll),
            2 => Some(FleetCommand::DropAll),
            3 => Some(FleetCommand::Collect),
            4 => Some(FleetCommand::Drop),
            5 => Some(FleetCommand::CollectAllBut),
            6 => Some(FleetCommand::DropAllBut),
            7 => Some(FleetCommand::Garrison),
            _ => None,
        }
    }
}

/// A mobile unit as decoded from a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fleet {
    #[serde(rename = "uid")]
    pub id: FleetId,
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "puid")]
    pub owner: PlayerId,
    pub x: f64,
    pub y: f64,
    /// Last-known position, the fallback when the destination is unresolvable.
    pub lx: f64,
    pub ly: f64,
    #[serde(rename = "st")]
    pub ships: i32,
    /// Decoded from the wire quadruples `[delay, destination, command, param]`.
    #[serde(rename = "o", default, with = "order_codec")]
    pub orders: Vec<Order>,
}

/// One named technology: a continuous magnitude plus a discrete level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tech {
    pub value: f64,
    pub level: i32,
}

/// A participant. Every player fully knows their own tech table; third-party
/// entries may be stale or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "uid")]
    pub id: PlayerId,
    pub alias: String,
    #[serde(default)]
    pub tech: HashMap<String, Tech>,
}

/// One player's snapshot at one tick: everything currently visible to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub tick: u32,
    /// The reporting player.
    #[serde(rename = "player_uid")]
    pub player: PlayerId,
    #[serde(default)]
    pub stars: HashMap<StarId, Star>,
    #[serde(default)]
    pub players: HashMap<PlayerId, Player>,
    #[serde(default)]
    pub fleets: HashMap<FleetId, Fleet>,
}

impl Report {
    /// Turn bucket this report belongs to.
    pub fn turn(&self, ticks_per_turn: u32) -> u32 {
        self.tick / ticks_per_turn
    }
}

/// Top-level wrapper of one snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub report: Report,
}

impl GameState {
    pub fn from_json_str(text: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, DecodeError> {
        let contents = fs::read_to_string(path).map_err(|source| DecodeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to parse snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read snapshot from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

mod order_codec {
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::{Serialize, Serializer};

    use super::{FleetCommand, Order, StarId};

    pub fn serialize<S>(orders: &[Order], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let compressed: Vec<[i32; 4]> = orders
            .iter()
            .map(|order| {
                [
                    order.delay,
                    order.destination.0,
                    order.command.code(),
                    order.param,
                ]
            })
            .collect();
        compressed.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Order>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let compressed = Vec::<[i32; 4]>::deserialize(deserializer)?;
        compressed
            .into_iter()
            .map(|[delay, destination, command, param]| {
                let command = FleetCommand::from_code(command).ok_or_else(|| {
                    de::Error::custom(format!("unknown fleet command code {command}"))
                })?;
                Ok(Order {
                    delay,
                    destination: StarId(destination),
                    command,
                    param,
                })
            })
            .collect()
    }
}
