//! Property-Based Tests for the Cache Facade
//!
//! Uses proptest against the in-memory store.

use proptest::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use tokio_test::block_on;

use crate::cache::{resolve_expiry, CacheValue, Vole};
use crate::store::MemoryStore;

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,32}".prop_map(|s| s)
}

/// Generates JSON scalars (no floats, so equality is exact)
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// Generates cacheable documents: objects or arrays of scalars
fn document_strategy() -> impl Strategy<Value = CacheValue> {
    prop_oneof![
        prop::collection::btree_map("[a-z]{1,8}", scalar_strategy(), 0..6)
            .prop_map(|fields| CacheValue::Object(fields.into_iter().collect())),
        prop::collection::vec(scalar_strategy(), 0..6).prop_map(CacheValue::Array),
    ]
}

fn online_vole() -> (Vole, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let vole = Vole::from_shared(store.clone());
    block_on(vole.connect());
    (vole, store)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Writing K=V then reading K returns a value deep-equal to V.
    #[test]
    fn prop_roundtrip(key in valid_key_strategy(), value in document_strategy()) {
        let (vole, _) = online_vole();

        block_on(vole.set(&key, &value)).unwrap();
        let read = block_on(vole.get(&key)).unwrap();

        prop_assert_eq!(read, Some(value.into_value()));
    }

    // A later write to the same key replaces the earlier document.
    #[test]
    fn prop_overwrite(
        key in valid_key_strategy(),
        first in document_strategy(),
        second in document_strategy()
    ) {
        let (vole, _) = online_vole();

        block_on(vole.set(&key, &first)).unwrap();
        block_on(vole.set(&key, &second)).unwrap();

        prop_assert_eq!(block_on(vole.get(&key)).unwrap(), Some(second.into_value()));
    }

    // Busting a list of keys leaves every slot of a following multi-get empty.
    #[test]
    fn prop_bust_then_get_many(
        keys in prop::collection::vec(valid_key_strategy(), 1..8),
        value in document_strategy()
    ) {
        let (vole, _) = online_vole();
        for key in &keys {
            block_on(vole.set(key, &value)).unwrap();
        }

        block_on(vole.bust(keys.clone())).unwrap();
        let result = block_on(vole.get_many(&keys)).unwrap().unwrap();

        prop_assert!(result.values.iter().all(Option::is_none));
        prop_assert_eq!(result.missing, keys);
    }

    // Multi-get preserves order and lists exactly the absent keys as missing.
    #[test]
    fn prop_multi_get_missing(
        entries in prop::collection::btree_map(valid_key_strategy(), any::<bool>(), 1..8),
        value in document_strategy()
    ) {
        let (vole, _) = online_vole();
        for (key, present) in &entries {
            if *present {
                block_on(vole.set(key, &value)).unwrap();
            }
        }

        let keys: Vec<String> = entries.keys().cloned().collect();
        let result = block_on(vole.get_many(&keys)).unwrap().unwrap();

        let expected_missing: Vec<String> = entries
            .iter()
            .filter(|(_, present)| !**present)
            .map(|(key, _)| key.clone())
            .collect();
        prop_assert_eq!(&result.missing, &expected_missing);
        for ((_, present), slot) in entries.iter().zip(&result.values) {
            prop_assert_eq!(*present, slot.is_some());
        }
    }

    // Expiry follows the explicit TTL when non-zero, else a non-zero default.
    #[test]
    fn prop_expiry_resolution(explicit in prop::option::of(0u64..10_000), default_ttl in 0u64..10_000) {
        let resolved = resolve_expiry(explicit, default_ttl);

        match explicit {
            Some(seconds) if seconds > 0 => prop_assert_eq!(resolved, Some(seconds)),
            _ if default_ttl > 0 => prop_assert_eq!(resolved, Some(default_ttl)),
            _ => prop_assert_eq!(resolved, None),
        }
    }

    // Scalars never become cache values.
    #[test]
    fn prop_scalars_rejected(scalar in scalar_strategy()) {
        let err = CacheValue::try_from(scalar).unwrap_err();
        prop_assert!(err.is_validation());
    }

    // While offline nothing reaches the store and every call succeeds empty.
    #[test]
    fn prop_offline_short_circuit(key in valid_key_strategy(), value in document_strategy()) {
        let store = Arc::new(MemoryStore::new());
        let vole = Vole::from_shared(store.clone());

        prop_assert!(block_on(vole.set(&key, &value)).is_ok());
        prop_assert_eq!(block_on(vole.get(&key)).unwrap(), None);
        prop_assert_eq!(block_on(vole.bust(key.as_str())).unwrap(), None);
        prop_assert_eq!(store.commands(), 0);
    }
}
