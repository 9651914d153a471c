//! Browser-only checks against real localStorage.
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use quest_server::config::QuestConfig;
use quest_server::quest::state::Quest;
use quest_server::quest::storage::{BrowserStorage, SnapshotStore};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn browser_storage_roundtrip() {
    let store = BrowserStorage::new().unwrap();
    assert!(store.is_durable());
    store.save("quest-web-test", "hello").unwrap();
    assert_eq!(store.load("quest-web-test").unwrap().as_deref(), Some("hello"));
    store.remove("quest-web-test").unwrap();
    assert!(store.load("quest-web-test").unwrap().is_none());
}

#[wasm_bindgen_test]
fn quest_survives_reload() {
    let config = QuestConfig {
        storage_key: "quest-web-test-state".to_string(),
        ..QuestConfig::default()
    };
    let store: Rc<dyn SnapshotStore> = Rc::new(BrowserStorage::new().unwrap());
    store.remove(&config.storage_key).unwrap();

    let mut quest = Quest::load(store.clone(), &config);
    quest.advance();
    quest.set_mood(42);

    let reloaded = Quest::load(Rc::new(BrowserStorage::new().unwrap()), &config);
    assert_eq!(reloaded.state().current_step, 1);
    assert_eq!(reloaded.state().mood, Some(42));
    store.remove(&config.storage_key).unwrap();
}
