//! Integration Tests for the Cache Facade
//!
//! Exercises the public API end to end against the in-memory store, plus an
//! ignored test against a live Redis server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use vole::{CacheValue, Config, Event, EventKind, Fetched, MemoryStore, Vole, VoleError};

// == Helper Functions ==

async fn create_online_vole() -> (Vole, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let vole = Vole::from_shared(store.clone());
    vole.connect().await;
    (vole, store)
}

fn doc(value: Value) -> CacheValue {
    CacheValue::try_from(value).unwrap()
}

fn record_events(vole: &Vole) -> Arc<Mutex<Vec<Event>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for kind in [
        EventKind::Ready,
        EventKind::Connect,
        EventKind::Error,
        EventKind::End,
        EventKind::Hit,
        EventKind::Miss,
        EventKind::Set,
    ] {
        let sink = seen.clone();
        vole.on(kind, move |event| sink.lock().unwrap().push(event.clone()));
    }
    seen
}

// == Write / Read ==

#[tokio::test]
async fn test_set_then_get_object() {
    let (vole, _) = create_online_vole().await;

    vole.set("foo", &doc(json!({"foo": "bar"}))).await.unwrap();
    let data = vole.get("foo").await.unwrap().unwrap();

    assert_eq!(data["foo"], "bar");
}

#[tokio::test]
async fn test_typed_documents_round_trip() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        id: u64,
        tags: Vec<String>,
    }

    let (vole, _) = create_online_vole().await;
    let profile = Profile {
        id: 42,
        tags: vec!["a".to_string(), "b".to_string()],
    };

    vole.set("profile:42", &CacheValue::from_serialize(&profile).unwrap())
        .await
        .unwrap();
    let read = vole.get("profile:42").await.unwrap().unwrap();

    assert_eq!(serde_json::from_value::<Profile>(read).unwrap(), profile);
}

#[tokio::test]
async fn test_scalar_is_rejected_before_the_store() {
    let (_, store) = create_online_vole().await;
    let before = store.commands();

    let err = CacheValue::from_serialize(&"just text").unwrap_err();

    assert!(matches!(err, VoleError::Validation(_)));
    assert_eq!(err.to_string(), "Val must be an object");
    assert_eq!(store.commands(), before);
}

#[tokio::test]
async fn test_explicit_ttl_expires() {
    let (vole, _) = create_online_vole().await;

    vole.set_with_ttl("foo2", &doc(json!({"foo": "bar"})), 1)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(vole.get("foo2").await.unwrap(), None);
}

#[tokio::test]
async fn test_zero_default_ttl_keeps_keys() {
    let (vole, store) = create_online_vole().await;
    vole.set_ttl(Some(0));

    vole.set("forever", &doc(json!({"foo": "bar"}))).await.unwrap();

    assert!(store.ttl("forever").await.is_none());
    assert!(vole.get("forever").await.unwrap().is_some());
}

// == Multi Get ==

#[tokio::test]
async fn test_multi_get_with_missing_key() {
    let (vole, _) = create_online_vole().await;
    vole.set("foo3", &doc(json!({"foo": "bar3"}))).await.unwrap();
    vole.set("foo4", &doc(json!({"foo": "bar4"}))).await.unwrap();

    let result = vole
        .get_many(&["foo3", "foo4", "foo5"])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.values.len(), 3);
    assert_eq!(result.values[0], Some(json!({"foo": "bar3"})));
    assert_eq!(result.values[1], Some(json!({"foo": "bar4"})));
    assert_eq!(result.values[2], None);
    assert_eq!(result.missing, vec!["foo5".to_string()]);
}

#[tokio::test]
async fn test_fetch_array_of_keys() {
    let (vole, _) = create_online_vole().await;
    vole.set("a", &doc(json!({"n": 1}))).await.unwrap();

    match vole.fetch(vec!["a", "b"]).await.unwrap() {
        Fetched::Many(Some(result)) => {
            assert_eq!(result.values[0], Some(json!({"n": 1})));
            assert_eq!(result.missing, vec!["b".to_string()]);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

// == Bust ==

#[tokio::test]
async fn test_bust_array_then_get_returns_nothing() {
    let (vole, _) = create_online_vole().await;
    let keys = ["x", "y"];
    for key in keys {
        vole.set(key, &doc(json!({"k": key}))).await.unwrap();
    }

    assert_eq!(vole.bust(keys).await.unwrap(), Some(2));

    for key in keys {
        assert_eq!(vole.get(key).await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_bust_empty_list_is_rejected() {
    let (vole, _) = create_online_vole().await;
    assert!(vole.bust(Vec::<String>::new()).await.is_err());
}

// == Events ==

#[tokio::test]
async fn test_event_sequence() {
    let store = Arc::new(MemoryStore::new());
    let vole = Vole::from_shared(store.clone());
    let seen = record_events(&vole);

    vole.connect().await;
    vole.set("foo", &doc(json!({"foo": "bar"}))).await.unwrap();
    vole.get("foo").await.unwrap();
    vole.get("nope").await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Event::Connect,
            Event::Ready,
            Event::Set {
                key: "foo".to_string(),
                value: r#"{"foo":"bar"}"#.to_string(),
            },
            Event::Hit {
                key: "foo".to_string(),
                value: r#"{"foo":"bar"}"#.to_string(),
            },
            Event::Miss {
                key: "nope".to_string(),
            },
        ]
    );
}

// == Offline ==

#[tokio::test]
async fn test_offline_facade_never_contacts_store() {
    let store = Arc::new(MemoryStore::new());
    store.set_available(false);
    let vole = Vole::from_shared(store.clone());
    vole.connect().await;
    let after_connect = store.commands();

    assert!(vole.set("a", &doc(json!({}))).await.is_ok());
    assert_eq!(vole.get("a").await.unwrap(), None);
    assert_eq!(vole.fetch(["a", "b"]).await.unwrap(), Fetched::Many(None));
    assert_eq!(vole.bust("a").await.unwrap(), None);
    assert_eq!(store.commands(), after_connect);
}

#[tokio::test]
async fn test_lost_connection_goes_offline() {
    let (vole, store) = create_online_vole().await;
    let seen = record_events(&vole);

    store.set_available(false);
    vole.refresh_connection().await;

    assert!(!vole.is_online());
    let kinds: Vec<EventKind> = seen.lock().unwrap().iter().map(Event::kind).collect();
    assert_eq!(kinds, vec![EventKind::Error, EventKind::End]);
}

// == File Logging ==

#[tokio::test]
async fn test_hits_and_misses_logged_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vole.log");
    let (vole, _) = create_online_vole().await;
    vole.log_to_file(&path).unwrap();

    vole.set("foo", &doc(json!({"foo": "bar"}))).await.unwrap();
    vole.get("foo").await.unwrap();
    vole.get("bar").await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let records: Vec<Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["hit"], true);
    assert_eq!(records[1]["hit"], false);
    assert_eq!(records[1]["key"], "bar");
}

// == Live Redis ==

#[tokio::test]
#[ignore = "requires a Redis server on REDIS_HOST:REDIS_PORT"]
async fn test_against_live_redis() {
    let vole = Vole::open(&Config::from_env()).await.unwrap();
    assert!(vole.is_online());

    vole.set_with_ttl("vole:test", &doc(json!({"foo": "bar"})), 5)
        .await
        .unwrap();
    assert_eq!(
        vole.get("vole:test").await.unwrap(),
        Some(json!({"foo": "bar"}))
    );

    let result = vole
        .get_many(&["vole:test", "vole:absent"])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.missing, vec!["vole:absent".to_string()]);

    assert_eq!(vole.bust("vole:test").await.unwrap(), Some(1));
    assert_eq!(vole.get("vole:test").await.unwrap(), None);
}
