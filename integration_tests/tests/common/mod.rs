//! Shared builders for reconstruction scenarios.

#![allow(dead_code)]

use std::collections::HashMap;

use report_schema::{Player, PlayerId, Report, Star, StarId, Tech, SCANNING_TECH};

pub fn star(name: &str, owner: i32, x: f64, y: f64) -> Star {
    Star {
        name: name.to_string(),
        owner: PlayerId(owner),
        x,
        y,
    }
}

pub fn player(id: i32, alias: &str, scanning: f64) -> Player {
    let mut tech = HashMap::new();
    tech.insert(
        SCANNING_TECH.to_string(),
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

/// A report from `reporter` at `tick`, seeing the given stars, carrying the
/// reporter's own player record.
pub fn report(tick: u32, reporter: i32, stars: Vec<(i32, Star)>) -> Report {
    let mut result = Report {
        tick,
        player: PlayerId(reporter),
        stars: HashMap::new(),
        players: HashMap::new(),
        fleets: HashMap::new(),
    };
    for (id, star) in stars {
        result.stars.insert(StarId(id), star);
    }
    result.players.insert(
        PlayerId(reporter),
        player(reporter, &format!("player-{reporter}"), 0.5),
    );
    result
}
