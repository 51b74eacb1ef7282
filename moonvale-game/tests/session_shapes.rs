//! Serialized session shape: wire field names and lossless round-trips.

use moonvale_game::steps::{STEP_NIGHT_CUPID, STEP_NIGHT_WEREWOLF, STEP_NIGHT_WITCH_KILL};
use moonvale_game::{GameSession, PlayerId, RoleId, StoryId};
use serde_json::Value;

/// A session deep into a game, touching every persisted field.
fn mid_game_session() -> GameSession {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = GameSession::new();
    session.generate_players(6);
    session.roles = vec![
        RoleId::Werewolf,
        RoleId::Witch,
        RoleId::Cupid,
        RoleId::Hunter,
    ];
    session.set_story(StoryId::Pirate);
    session.start_game().unwrap();
    let ids: Vec<PlayerId> = session.players.iter().map(|p| p.id).collect();
    session.assign_role(ids[0], Some(RoleId::Hunter)).unwrap();
    session.deal_roles(0xBEEF);
    session.set_notes(ids[1], "keeps glancing at the seer");

    session.toggle_target(STEP_NIGHT_CUPID, ids[2]);
    session.toggle_target(STEP_NIGHT_CUPID, ids[3]);
    session.toggle_target(STEP_NIGHT_WEREWOLF, ids[0]);
    session.toggle_target(STEP_NIGHT_WITCH_KILL, ids[4]);
    session.advance_phase();
    session
}

#[test]
fn wire_field_names_are_camel_case() {
    let session = mid_game_session();
    let doc: Value = serde_json::to_value(&session).unwrap();

    let settings = &doc["settings"];
    assert!(settings["id"].is_string());
    assert_eq!(settings["status"], "playing");
    assert_eq!(settings["phase"], "day");
    assert_eq!(settings["cycle"], 1);
    assert!(settings["phaseStepIndex"].is_u64());

    assert!(doc["players"].as_array().unwrap().len() == 6);
    let player = &doc["players"][0];
    assert!(player["roleId"].is_string());
    assert!(player["isAlive"].is_boolean());
    assert!(player["notes"].is_string());

    let roles: Vec<&str> = doc["roles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_str().unwrap())
        .collect();
    assert!(roles.contains(&"werewolf"));

    assert!(doc["targets"].is_object());
    assert_eq!(doc["lovers"].as_array().unwrap().len(), 2);
    assert_eq!(doc["witchPotions"]["life"], true);
    assert_eq!(doc["witchPotions"]["death"], false);
    assert!(doc["hunterPendingShot"].is_string());
    assert_eq!(doc["storyId"], "pirate");
}

#[test]
fn fresh_session_round_trips() {
    let session = GameSession::new();
    let json = serde_json::to_string(&session).unwrap();
    let back: GameSession = serde_json::from_str(&json).unwrap();
    assert_eq!(back, session);
}

#[test]
fn mid_game_session_round_trips() {
    let session = mid_game_session();
    let json = serde_json::to_string(&session).unwrap();
    let back: GameSession = serde_json::from_str(&json).unwrap();
    assert_eq!(back, session);

    // A second hop through the wire shape stays stable.
    let json_again = serde_json::to_string(&back).unwrap();
    assert_eq!(json, json_again);
}

#[test]
fn round_trip_survives_reset_states() {
    let mut session = mid_game_session();
    session.reset(true);
    let json = serde_json::to_string(&session).unwrap();
    let back: GameSession = serde_json::from_str(&json).unwrap();
    assert_eq!(back, session);

    session.reset(false);
    let json = serde_json::to_string(&session).unwrap();
    let back: GameSession = serde_json::from_str(&json).unwrap();
    assert_eq!(back, session);
}
