//! Property-Based Tests for the Cache Module
//!
//! Uses proptest to check key construction and value round-trips.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::Value;

use crate::cache::{Cache, CacheConfig};
use crate::key::{build_key, Version};
use crate::repository::InMemoryRepository;
use crate::serializer;

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}"
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    "[a-z]{0,8}"
}

fn version_strategy() -> impl Strategy<Value = Version> {
    prop_oneof![
        (0i64..1000).prop_map(Version::Number),
        "v[0-9]\\.[0-9]".prop_map(Version::Tag),
    ]
}

/// Arbitrary JSON documents, nested a few levels deep.
fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<f64>().prop_filter_map("finite floats only", |f| {
            serde_json::Number::from_f64(f).map(Value::Number)
        }),
        ".{0,16}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{0,6}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn memory_cache(prefix: &str, version: Version) -> Cache {
    Cache::new(
        Arc::new(InMemoryRepository::default()),
        CacheConfig::new(prefix, version),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Same inputs always give the same physical key.
    #[test]
    fn prop_build_key_deterministic(
        prefix in prefix_strategy(),
        version in version_strategy(),
        key in key_strategy()
    ) {
        prop_assert_eq!(build_key(&prefix, &version, &key), build_key(&prefix, &version, &key));
    }

    // Distinct namespaces never share a physical key for the same logical key.
    #[test]
    fn prop_namespaces_do_not_collide(
        a in (prefix_strategy(), version_strategy()),
        b in (prefix_strategy(), version_strategy()),
        key in key_strategy()
    ) {
        prop_assume!(a.0 != b.0 || a.1.to_string() != b.1.to_string());
        prop_assert_ne!(build_key(&a.0, &a.1, &key), build_key(&b.0, &b.1, &key));
    }

    // Encoding then decoding any JSON value gives it back.
    #[test]
    fn prop_json_round_trip(value in json_strategy()) {
        let decoded = serializer::loads(&serializer::dumps(&value).unwrap()).unwrap();
        prop_assert_eq!(decoded, value);
    }

    // A value survives set then get through a repository.
    #[test]
    fn prop_set_get_round_trip(key in key_strategy(), value in json_strategy()) {
        let cache = memory_cache("prop", Version::default());
        let fetched = runtime().block_on(async {
            cache.set(&key, &value, 60, None).await.unwrap();
            cache.get(&key, None).await.unwrap()
        });
        prop_assert_eq!(fetched, Some(value));
    }

    // Values written under one version are invisible under another.
    #[test]
    fn prop_versions_isolate_values(
        key in key_strategy(),
        value in json_strategy(),
        written in 0i64..100,
        read in 100i64..200
    ) {
        let cache = memory_cache("prop", Version::from(written));
        let (other, same) = runtime().block_on(async {
            cache.set(&key, &value, 60, None).await.unwrap();
            let other = cache.get(&key, Some(&Version::from(read))).await.unwrap();
            let same = cache.get(&key, Some(&Version::from(written))).await.unwrap();
            (other, same)
        });
        prop_assert_eq!(other, None);
        prop_assert_eq!(same, Some(value));
    }

    // set_nx succeeds once per key until the key is deleted.
    #[test]
    fn prop_set_nx_once(key in key_strategy(), attempts in 2usize..6) {
        let cache = memory_cache("nx", Version::default());
        let (results, after_delete) = runtime().block_on(async {
            let mut results = Vec::new();
            for i in 0..attempts {
                results.push(cache.set_nx(&key, &i, 60, None).await.unwrap());
            }
            cache.delete(&key, None).await.unwrap();
            let after_delete = cache.set_nx(&key, &0, 60, None).await.unwrap();
            (results, after_delete)
        });
        prop_assert_eq!(results.iter().filter(|written| **written).count(), 1);
        prop_assert!(results[0]);
        prop_assert!(after_delete);
    }
}
