use anyhow::Result;
use report_schema::{FleetCommand, FleetId, GameState, PlayerId, StarId, SCANNING_TECH};

/// A trimmed-down but structurally faithful snapshot download.
const SNAPSHOT: &str = r#"{
    "report": {
        "tick": 18,
        "player_uid": 3,
        "stars": {
            "101": { "n": "Antares", "puid": 3, "x": -2.125, "y": 0.75 },
            "102": { "n": "Mizar", "puid": -1, "x": 1.5, "y": -3.25 }
        },
        "players": {
            "3": {
                "uid": 3,
                "alias": "Red Dwarf",
                "tech": {
                    "scanning": { "value": 0.625, "level": 4 },
                    "propulsion": { "value": 0.5, "level": 3 }
                }
            },
            "5": {
                "uid": 5,
                "alias": "Nomad",
                "tech": {}
            }
        },
        "fleets": {
            "77": {
                "uid": 77,
                "n": "Far Patrol",
                "puid": 3,
                "x": -1.0,
                "y": 0.5,
                "lx": -1.25,
                "ly": 0.5,
                "st": 18,
                "o": [[0, 102, 3, 6], [12, 101, 0, 0]]
            }
        }
    }
}"#;

#[test]
fn full_snapshot_decodes() -> Result<()> {
    let state = GameState::from_json_str(SNAPSHOT)?;
    let report = state.report;

    assert_eq!(report.tick, 18);
    assert_eq!(report.turn(6), 3);
    assert_eq!(report.player, PlayerId(3));

    assert_eq!(report.stars[&StarId(101)].name, "Antares");
    assert!(report.stars[&StarId(102)].owner.is_neutral());

    let own = &report.players[&PlayerId(3)];
    assert_eq!(own.alias, "Red Dwarf");
    assert_eq!(own.tech[SCANNING_TECH].level, 4);
    assert!(report.players[&PlayerId(5)].tech.is_empty());

    let fleet = &report.fleets[&FleetId(77)];
    assert_eq!(fleet.ships, 18);
    assert_eq!(fleet.orders[0].command, FleetCommand::Collect);
    assert_eq!(fleet.orders[0].destination, StarId(102));
    assert_eq!(fleet.orders[1].command, FleetCommand::DoNothing);
    Ok(())
}

#[test]
fn wire_keys_are_integer_strings() -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(SNAPSHOT)?;
    let stars = value["report"]["stars"].as_object().unwrap();
    assert!(stars.contains_key("101"));

    let state = GameState::from_json_str(SNAPSHOT)?;
    assert_eq!(state.report.stars.len(), stars.len());
    Ok(())
}

#[test]
fn truncated_download_is_an_error_not_a_panic() {
    let truncated = &SNAPSHOT[..SNAPSHOT.len() / 2];
    assert!(GameState::from_json_str(truncated).is_err());
}

#[test]
fn non_snapshot_json_is_rejected() {
    assert!(GameState::from_json_str(r#"{ "error": "game not found" }"#).is_err());
}
