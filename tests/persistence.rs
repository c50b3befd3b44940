use std::fs;

use serde_json::json;
use scoreboard_terminal::futsal::FutsalRecord;
use scoreboard_terminal::persist::{self, FileStore, MemoryStore, Store};
use scoreboard_terminal::score::Pair;
use scoreboard_terminal::volleyball::VolleyballState;

fn volleyball_record() -> VolleyballState {
    VolleyballState {
        scores: Pair::new(17, 21),
        sets: Pair::new(2, 1),
    }
}

fn futsal_record() -> FutsalRecord {
    FutsalRecord {
        scores: Pair::new(4, 3),
        fouls: Pair::new(5, 2),
        timer: 137,
    }
}

#[test]
fn memory_store_round_trips_records() {
    let store = MemoryStore::new();
    persist::save(&store, "volleyball", &volleyball_record()).expect("save");
    persist::save(&store, "futsal", &futsal_record()).expect("save");

    assert_eq!(
        persist::load::<VolleyballState>(&store, "volleyball"),
        Some(volleyball_record())
    );
    assert_eq!(
        persist::load::<FutsalRecord>(&store, "futsal"),
        Some(futsal_record())
    );
}

#[test]
fn memory_store_clones_share_entries() {
    let store = MemoryStore::new();
    let other = store.clone();
    store.set("k", json!(1)).expect("set");
    assert_eq!(other.get("k"), Some(json!(1)));
    assert_eq!(other.len(), 1);
}

#[test]
fn record_shape_is_plain_team_keyed_json() {
    let store = MemoryStore::new();
    persist::save(&store, "volleyball", &volleyball_record()).expect("save");
    assert_eq!(
        store.get("volleyball"),
        Some(json!({
            "scores": { "a": 17, "b": 21 },
            "sets": { "a": 2, "b": 1 },
        }))
    );
}

#[test]
fn missing_and_malformed_records_are_absent() {
    let store = MemoryStore::new();
    assert_eq!(persist::load::<VolleyballState>(&store, "volleyball"), None);

    store
        .set("volleyball", json!({ "scores": "nope" }))
        .expect("set");
    assert_eq!(persist::load::<VolleyballState>(&store, "volleyball"), None);
}

#[test]
fn file_store_round_trips_and_keeps_other_keys() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FileStore::in_dir(dir.path());

    persist::save(&store, "volleyball", &volleyball_record()).expect("save volleyball");
    persist::save(&store, "futsal", &futsal_record()).expect("save futsal");

    let reopened = FileStore::in_dir(dir.path());
    assert_eq!(
        persist::load::<VolleyballState>(&reopened, "volleyball"),
        Some(volleyball_record())
    );
    assert_eq!(
        persist::load::<FutsalRecord>(&reopened, "futsal"),
        Some(futsal_record())
    );
    assert!(!store.path().with_extension("json.tmp").exists());
}

#[test]
fn file_store_creates_missing_directories() {
    let dir = tempfile::tempdir().expect("temp dir");
    let nested = dir.path().join("a").join("b");
    let store = FileStore::in_dir(&nested);

    assert_eq!(store.get("volleyball"), None);
    store.set("theme", json!("light")).expect("set");
    assert_eq!(store.get("theme"), Some(json!("light")));
}

#[test]
fn file_store_ignores_other_versions() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FileStore::in_dir(dir.path());
    fs::write(
        store.path(),
        json!({
            "version": 99,
            "entries": { "volleyball": { "scores": { "a": 1, "b": 1 }, "sets": { "a": 0, "b": 0 } } }
        })
        .to_string(),
    )
    .expect("write fixture");

    assert_eq!(store.get("volleyball"), None);

    // Writing replaces the stale file with the current version.
    store.set("theme", json!("dark")).expect("set");
    let raw = fs::read_to_string(store.path()).expect("read back");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(parsed["version"], json!(1));
    assert!(parsed["entries"].get("volleyball").is_none());
}

#[test]
fn file_store_treats_garbage_as_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FileStore::in_dir(dir.path());
    fs::write(store.path(), "{not json").expect("write fixture");
    assert_eq!(store.get("futsal"), None);
}
