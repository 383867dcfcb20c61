//! Property-based tests for the canonical conversation pair
//!
//! Uses proptest to generate random user IDs and verify that a conversation
//! resolves to the same key whichever participant opens it.

use proptest::prelude::*;
use ridehub::backend::store::Store;
use ridehub::shared::CanonicalPair;
use uuid::Uuid;

fn any_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

proptest! {
    #[test]
    fn test_pair_ignores_argument_order(a in any_uuid(), b in any_uuid()) {
        prop_assume!(a != b);
        let forward = CanonicalPair::new(a, b).unwrap();
        let backward = CanonicalPair::new(b, a).unwrap();
        prop_assert_eq!(forward, backward);
        prop_assert!(forward.first() < forward.second());
        prop_assert!(forward.first().to_string() < forward.second().to_string());
    }

    #[test]
    fn test_pair_other_swaps_participants(a in any_uuid(), b in any_uuid(), stranger in any_uuid()) {
        prop_assume!(a != b && stranger != a && stranger != b);
        let pair = CanonicalPair::new(a, b).unwrap();
        prop_assert_eq!(pair.other(a), Some(b));
        prop_assert_eq!(pair.other(b), Some(a));
        prop_assert_eq!(pair.other(stranger), None);
    }

    #[test]
    fn test_same_user_is_never_a_pair(a in any_uuid()) {
        prop_assert!(CanonicalPair::new(a, a).is_err());
    }

    #[test]
    fn test_pair_survives_json(a in any_uuid(), b in any_uuid()) {
        prop_assume!(a != b);
        let pair = CanonicalPair::new(b, a).unwrap();
        let json = serde_json::to_value(pair).unwrap();
        prop_assert_eq!(&json, &serde_json::json!([pair.first(), pair.second()]));
        let back: CanonicalPair = serde_json::from_value(json).unwrap();
        prop_assert_eq!(back, pair);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_store_get_or_create_is_idempotent(a in any_uuid(), b in any_uuid()) {
        prop_assume!(a != b);
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let store = Store::memory();
            let first = store
                .get_or_create_conversation(CanonicalPair::new(a, b).unwrap())
                .await
                .unwrap();
            let second = store
                .get_or_create_conversation(CanonicalPair::new(b, a).unwrap())
                .await
                .unwrap();
            assert_eq!(first, second);
            assert_eq!(store.conversations_for_user(a).await.unwrap().len(), 1);
        });
    }
}
