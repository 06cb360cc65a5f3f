//! Integration tests for the Session API
//!
//! These drive a session the way a host does: submit, resolve, measure,
//! poll, export.

use etymon::{
    EtymonError, Session,
    analyze::AnalyzeOutcome,
    config::{AppConfig, UsageConfig, ValidationConfig},
    controller::{ControllerState, NotificationLevel, Resolution, SubmitRejected},
    definition::{Combination, Definition, MorphemePart},
    geometry::Size,
    identifier::Id,
    node::GraphNode,
    store::{JsonFileStore, MemoryStore},
    sync::{SyncEvent, SyncPhase},
};

fn session() -> Session {
    Session::new(Box::new(MemoryStore::new()), &AppConfig::default())
}

fn definition_for(word: &str) -> Definition {
    Definition::new(
        "",
        vec![
            MorphemePart::new("stem", word, word, "Latin", "root"),
            MorphemePart::new("suffix", "-s", "-s", "Latin", "plural"),
        ],
        vec![vec![Combination::new(
            word,
            word,
            "a word",
            ["stem", "suffix"],
        )]],
    )
}

fn measure_all(session: &mut Session, size: Size) {
    let ids: Vec<Id> = session.nodes().iter().map(GraphNode::id).collect();
    for id in ids {
        assert!(session.record_size(id, size));
    }
}

#[test]
fn test_worked_example_pipeline() {
    let mut session = session();
    assert_eq!(session.nodes().len(), 9);
    assert_eq!(session.edges().len(), 7);
    assert_eq!(session.poll(), None);

    measure_all(&mut session, Size::new(100.0, 40.0));
    assert_eq!(session.poll(), Some(SyncEvent::Positioned));
    assert!(matches!(
        session.poll(),
        Some(SyncEvent::FitView {
            animate_ms: 1000,
            ..
        })
    ));
    assert_eq!(session.poll(), None);
    assert_eq!(session.sync().phase(), SyncPhase::Settled);

    let layers: Vec<(usize, f32)> = session
        .nodes()
        .iter()
        .map(|node| (node.layer(), node.position().y()))
        .collect();
    for pair in layers.windows(2) {
        if pair[0].0 < pair[1].0 {
            assert!(pair[0].1 < pair[1].1);
        }
    }
}

#[test]
fn test_regenerate_always_forces_update() {
    let mut session = session();
    let mut calls = Vec::new();
    let mut analyzer = |word: &str, force: bool| {
        calls.push((word.to_string(), force));
        AnalyzeOutcome::Complete(definition_for(word))
    };

    session.analyze_with(&mut analyzer, "cats").expect("first");
    session.analyze_with(&mut analyzer, " CATS ").expect("resubmit");
    session.analyze_with(&mut analyzer, "dogs").expect("new word");

    assert_eq!(
        calls,
        [
            ("cats".to_string(), false),
            ("CATS".to_string(), true),
            ("dogs".to_string(), false),
        ]
    );

    let request = session.regenerate("dogs").expect("regenerate");
    assert!(request.force_update());
}

#[test]
fn test_busy_and_stale() {
    let mut session = session();
    let first = session.submit("cats").expect("submit");
    assert_eq!(session.submit("dogs").err(), Some(SubmitRejected::Busy));
    assert_eq!(session.controller().state(), ControllerState::Loading);

    assert_eq!(
        session.resolve(&first, AnalyzeOutcome::Complete(definition_for("cats"))),
        Resolution::Updated
    );
    assert_eq!(
        session.resolve(&first, AnalyzeOutcome::Complete(definition_for("cats"))),
        Resolution::Stale
    );
}

#[test]
fn test_usage_gate_fires_once_per_threshold() {
    let mut session = session();
    let mut analyzer = |word: &str, _force: bool| AnalyzeOutcome::Complete(definition_for(word));
    let mut opened_at = Vec::new();

    for count in 1..=16u64 {
        let word = format!("word{count}");
        session.analyze_with(&mut analyzer, &word).expect("analyze");
        if session.open_prompt().is_some() {
            opened_at.push(count);
            assert!(session.dismiss_prompt());
        }
    }

    assert_eq!(opened_at, [5, 10, 15]);
    assert_eq!(session.controller().usage().dismiss_count(), 3);
}

#[test]
fn test_usage_counters_survive_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state").join("usage.json");
    let config = AppConfig::new(
        Default::default(),
        UsageConfig::new(2, 2),
        Default::default(),
        Default::default(),
    );
    let mut analyzer = |word: &str, _force: bool| AnalyzeOutcome::Complete(definition_for(word));

    {
        let store = JsonFileStore::open(&path).expect("open");
        let mut session = Session::new(Box::new(store), &config);
        session.analyze_with(&mut analyzer, "one").expect("analyze");
    }

    let store = JsonFileStore::open(&path).expect("reopen");
    let mut session = Session::new(Box::new(store), &config);
    assert_eq!(session.controller().usage().usage_count(), 1);

    session.analyze_with(&mut analyzer, "two").expect("analyze");
    let prompt = session.open_prompt().expect("prompt at two");
    assert_eq!(prompt.word_count(), 2);
}

#[test]
fn test_degraded_and_failed_notifications() {
    let mut session = session();
    let mut degraded = |word: &str, _force: bool| AnalyzeOutcome::Degraded(definition_for(word));
    session.analyze_with(&mut degraded, "cats").expect("analyze");

    let mut failing = |_word: &str, _force: bool| AnalyzeOutcome::failed("service down");
    assert_eq!(
        session.analyze_with(&mut failing, "dogs"),
        Ok(Resolution::Failed)
    );

    let levels: Vec<NotificationLevel> = session
        .take_notifications()
        .iter()
        .map(|notification| notification.level())
        .collect();
    assert_eq!(levels, [NotificationLevel::Info, NotificationLevel::Warning]);
    assert_eq!(session.controller().analyzed_word(), Some("cats"));
    assert_eq!(session.nodes().len(), 6);
}

#[test]
fn test_strict_validation_rejects_dangling_sources() {
    let config = AppConfig::new(
        Default::default(),
        Default::default(),
        Default::default(),
        ValidationConfig::new(true),
    );
    let mut session = Session::new(Box::new(MemoryStore::new()), &config);
    let broken = Definition::new(
        "",
        vec![MorphemePart::new("a", "a", "a", "Latin", "")],
        vec![vec![Combination::new("ab", "ab", "", ["a", "nowhere"])]],
    );
    let mut analyzer = move |_word: &str, _force: bool| AnalyzeOutcome::Complete(broken.clone());

    assert_eq!(
        session.analyze_with(&mut analyzer, "ab"),
        Ok(Resolution::Failed)
    );
    assert_eq!(session.nodes().len(), 9);
}

#[test]
fn test_parse_errors_are_definition_errors() {
    let result = etymon::parse_definition(r#"{"parts": [{"id": 3}]}"#);
    assert!(matches!(result, Err(EtymonError::Definition(_))));
}
