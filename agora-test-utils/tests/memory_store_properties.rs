//! Property-Based Tests for the in-memory store
//!
//! For every entity kind, a created draft reads back equal on its declared
//! fields, and deleting it makes the key absent.

use agora_core::{Ethics, Group, Influence, News, Role, Scaling, Task};
use agora_storage::Repository;
use agora_test_utils::fixtures;
use agora_test_utils::generators::*;
use agora_test_utils::{Agent, Entity, MemoryStore};
use proptest::prelude::*;
use tokio::runtime::Runtime;

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_role_and_influence_round_trip(role in arb_new_role(), influence in arb_new_influence()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let store = MemoryStore::new();

            let created = Repository::<Role>::create(&store, role.clone()).await.unwrap();
            let fetched = Repository::<Role>::get_by_key(&store, &role.name).await.unwrap();
            prop_assert_eq!(fetched.as_ref().map(|r| &r.description), Some(&role.description));
            prop_assert_eq!(created.key(), &role.name);

            Repository::<Influence>::create(&store, influence.clone()).await.unwrap();
            let fetched = Repository::<Influence>::get_by_key(&store, &influence.name).await.unwrap();
            prop_assert_eq!(fetched.map(|i| i.effect), Some(influence.effect));
            Ok(())
        })?;
    }

    #[test]
    fn prop_group_members_keep_order(group in arb_new_group()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let store = MemoryStore::new();
            Repository::<Group>::create(&store, group.clone()).await.unwrap();
            let fetched = Repository::<Group>::get_by_key(&store, &group.name).await.unwrap();
            prop_assert_eq!(fetched.map(|g| g.members), Some(group.members));
            Ok(())
        })?;
    }

    #[test]
    fn prop_id_keyed_records_round_trip(ethics in arb_new_ethics(), scaling in arb_new_scaling()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let store = MemoryStore::new();

            let created = Repository::<Ethics>::create(&store, ethics.clone()).await.unwrap();
            let fetched = Repository::<Ethics>::get_by_key(&store, &created.id).await.unwrap();
            prop_assert_eq!(fetched.map(|e| e.principles), Some(ethics.principles));

            let created = Repository::<Scaling>::create(&store, scaling.clone()).await.unwrap();
            prop_assert!(Repository::<Scaling>::delete_by_key(&store, &created.id).await.unwrap());
            prop_assert!(Repository::<Scaling>::get_by_key(&store, &created.id).await.unwrap().is_none());
            Ok(())
        })?;
    }

    #[test]
    fn prop_delete_absent_is_false(news in arb_new_news()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let store = MemoryStore::new();
            prop_assert!(!Repository::<News>::delete_by_key(&store, &news.title).await.unwrap());
            prop_assert!(Repository::<News>::list_all(&store).await.unwrap().is_empty());
            Ok(())
        })?;
    }
}

#[tokio::test]
async fn test_fixture_cascade_chain() {
    let store = MemoryStore::new();
    Repository::<Role>::create(&store, fixtures::role("pilot")).await.unwrap();
    Repository::<Agent>::create(&store, fixtures::agent_with_role("a1", "pilot"))
        .await
        .unwrap();
    Repository::<Task>::create(&store, fixtures::task("t1", Some("a1")))
        .await
        .unwrap();
    Repository::<Group>::create(&store, fixtures::group("g1", &["a1"], &["t1"]))
        .await
        .unwrap();

    Repository::<Agent>::delete_by_key(&store, &"a1".to_string()).await.unwrap();
    let task = Repository::<Task>::get_by_key(&store, &"t1".to_string()).await.unwrap().unwrap();
    assert_eq!(task.agent, None);

    Repository::<Task>::delete_by_key(&store, &"t1".to_string()).await.unwrap();
    let group = Repository::<Group>::get_by_key(&store, &"g1".to_string()).await.unwrap().unwrap();
    assert!(group.tasks.is_empty());
    assert_eq!(group.members, vec!["a1".to_string()]);
}

#[tokio::test]
async fn test_fixture_feedback_and_ethics() {
    let store = MemoryStore::new();
    Repository::<agora_core::Feedback>::create(&store, fixtures::feedback("u1"))
        .await
        .unwrap();
    let ethics = Repository::<Ethics>::create(&store, fixtures::ethics(&["fairness"]))
        .await
        .unwrap();
    let scaling = Repository::<Scaling>::create(&store, fixtures::scaling("horizontal"))
        .await
        .unwrap();
    assert_eq!(ethics.principles, vec!["fairness".to_string()]);
    assert_eq!(scaling.strategy, "horizontal");
    assert_eq!(store.call_count(), 3);
}
