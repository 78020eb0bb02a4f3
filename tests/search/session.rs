//! Session controller flows with an injected clock.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::common::{handle, sample_docs};
use docsift::config::SearchConfig;
use docsift::{Key, SearchSession, SessionEvent, SessionState};

const DEBOUNCE: Duration = Duration::from_millis(100);

fn session() -> SearchSession {
    SearchSession::new(handle(&sample_docs()), DEBOUNCE)
}

#[test]
fn test_typing_then_results() {
    let mut session = session();
    let t0 = Instant::now();
    assert_eq!(session.state(), SessionState::Idle);

    session.on_input("i", t0);
    session.on_input("in", t0 + Duration::from_millis(30));
    session.on_input("install", t0 + Duration::from_millis(60));
    assert!(!session.tick(t0 + Duration::from_millis(120)));
    assert_eq!(session.state(), SessionState::Typing);

    assert!(session.tick(t0 + Duration::from_millis(160)));
    assert_eq!(session.state(), SessionState::Displaying);
    assert_eq!(session.query(), "install");
    assert!(!session.hits().is_empty());
    assert_eq!(session.selected_index(), Some(0));
}

#[test]
fn test_from_config_uses_configured_debounce() {
    let config = SearchConfig {
        debounce_ms: 10,
        ..SearchConfig::default()
    };
    let mut session = SearchSession::from_config(handle(&sample_docs()), &config);
    let t0 = Instant::now();
    session.on_input("theme", t0);
    assert_eq!(session.deadline(), Some(t0 + Duration::from_millis(10)));
    assert!(session.tick(t0 + Duration::from_millis(10)));
}

#[test]
fn test_worker_thread_result_is_delivered() {
    let mut session = session();
    let index = handle(&sample_docs());
    let t0 = Instant::now();

    session.on_input("config", t0);
    let pending = session.dispatch(t0 + DEBOUNCE).expect("debounce elapsed");
    assert_eq!(session.state(), SessionState::Querying);

    let generation = pending.generation();
    let response = thread::spawn(move || pending.run(&index)).join().unwrap();
    assert!(session.deliver(generation, response));
    assert_eq!(session.state(), SessionState::Displaying);
}

#[test]
fn test_result_overtaken_by_keystroke_is_dropped() {
    let mut session = session();
    let index = handle(&sample_docs());
    let t0 = Instant::now();

    session.on_input("config", t0);
    let stale = session.dispatch(t0 + DEBOUNCE).unwrap();

    // the user keeps typing while the worker runs
    session.on_input("config theme", t0 + DEBOUNCE + Duration::from_millis(5));
    let stale_generation = stale.generation();
    let stale_response = thread::spawn(move || stale.run(&index)).join().unwrap();
    assert!(stale_response.cancelled || !stale_response.is_empty());
    assert!(!session.deliver(stale_generation, stale_response));
    assert_eq!(session.state(), SessionState::Typing);
    assert!(session.response().is_none());

    assert!(session.tick(t0 + DEBOUNCE * 3));
    assert_eq!(session.query(), "config theme");
}

#[test]
fn test_out_of_order_delivery_keeps_newest() {
    let mut session = session();
    let index = handle(&sample_docs());
    let t0 = Instant::now();

    session.on_input("install", t0);
    let first = session.dispatch(t0 + DEBOUNCE).unwrap();
    session.on_input("theme", t0 + DEBOUNCE);
    let second = session.dispatch(t0 + DEBOUNCE * 2).unwrap();

    let newest = second.run(&index);
    let newest_generation = second.generation();
    assert!(session.deliver(newest_generation, newest.clone()));

    // the older query finishes late and must not overwrite
    let late = first.run(&index);
    assert!(late.cancelled);
    assert!(!session.deliver(first.generation(), late));
    assert_eq!(session.response(), Some(&newest));
}

#[test]
fn test_keyboard_selection_opens_hit() {
    let mut session = session();
    let t0 = Instant::now();
    session.on_input("config", t0);
    assert!(session.tick(t0 + DEBOUNCE));
    let count = session.hits().len();
    assert!(count >= 2);

    session.navigate(Key::Down);
    assert_eq!(session.selected_index(), Some(1));
    session.navigate(Key::Up);
    session.navigate(Key::Up);
    assert_eq!(session.selected_index(), Some(count - 1));

    let expected = session.hits()[count - 1].clone();
    match session.navigate(Key::Enter) {
        Some(SessionEvent::Selected(hit)) => assert_eq!(hit, expected),
        other => panic!("expected a selection, got {:?}", other),
    }
    // selecting doesn't leave the results view
    assert_eq!(session.state(), SessionState::Displaying);
}

#[test]
fn test_escape_discards_in_flight_query() {
    let mut session = session();
    let index = handle(&sample_docs());
    let t0 = Instant::now();
    session.on_input("install", t0);
    let pending = session.dispatch(t0 + DEBOUNCE).unwrap();

    assert_eq!(session.navigate(Key::Escape), Some(SessionEvent::Closed));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.query(), "");

    let generation = pending.generation();
    let response = pending.run(&index);
    assert!(!session.deliver(generation, response));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_translations_follow_session_locale() {
    let mut translations = BTreeMap::new();
    translations.insert(
        "zh-CN".to_string(),
        BTreeMap::from([("placeholder".to_string(), "搜索文档".to_string())]),
    );
    let session = session()
        .with_locale("zh-CN")
        .with_translations(Arc::new(translations));
    assert_eq!(
        session.ui_strings().and_then(|s| s.get("placeholder")).map(String::as_str),
        Some("搜索文档")
    );
}
