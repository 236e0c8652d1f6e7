//! Property-Based Tests for the CRUD surface
//!
//! For any valid record, create → get → delete → get behaves as a complete
//! cycle. For any blank key, the request is rejected before storage.

mod support;

use agora_test_utils::generators::{arb_blank, arb_new_agent, arb_new_feedback, arb_new_task, arb_text};
use axum::http::StatusCode;
use proptest::prelude::*;
use serde_json::json;
use support::test_app;
use tokio::runtime::Runtime;

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_agent_crud_cycle(draft in arb_new_agent()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = test_app();
            let body = json!({"name": draft.name, "model": draft.model});

            let created = app.post("/api/v1/agents/", &body).await;
            prop_assert_eq!(created.status, StatusCode::CREATED);
            prop_assert_eq!(&created.body, &body);

            let uri = format!("/api/v1/agents/{}", draft.name);
            let fetched = app.get(&uri).await;
            prop_assert_eq!(fetched.status, StatusCode::OK);
            prop_assert_eq!(&fetched.body, &body);

            prop_assert_eq!(app.delete(&uri).await.status, StatusCode::NO_CONTENT);
            prop_assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
            Ok(())
        })?;
    }

    #[test]
    fn prop_second_create_conflicts(draft in arb_new_feedback()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = test_app();
            let body = json!({"user": draft.user, "content": draft.content});

            prop_assert_eq!(app.post("/api/v1/feedback/", &body).await.status, StatusCode::CREATED);
            let again = app.post("/api/v1/feedback/", &body).await;
            prop_assert_eq!(again.status, StatusCode::CONFLICT);
            prop_assert_eq!(again.body, json!({"detail": "Feedback already exists"}));

            let listed = app.get("/api/v1/feedback").await;
            prop_assert_eq!(listed.body.as_array().map(Vec::len), Some(1));
            Ok(())
        })?;
    }

    #[test]
    fn prop_task_update_is_visible(draft in arb_new_task(), action in arb_text()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = test_app();
            app.post("/api/v1/tasks/", &json!({"name": draft.name, "action": draft.action})).await;

            let uri = format!("/api/v1/tasks/{}", draft.name);
            let replacement = json!({"name": draft.name, "action": action});
            let updated = app.put(&uri, &replacement).await;
            prop_assert_eq!(updated.status, StatusCode::OK);
            prop_assert_eq!(&app.get(&uri).await.body, &replacement);
            Ok(())
        })?;
    }

    #[test]
    fn prop_blank_name_never_reaches_storage(name in arb_blank(), model in arb_text()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let app = test_app();
            let response = app
                .post("/api/v1/agents/", &json!({"name": name, "model": model}))
                .await;
            prop_assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
            prop_assert_eq!(&response.body["detail"][0]["loc"], &json!(["body", "name"]));
            prop_assert_eq!(app.store.call_count(), 0);
            Ok(())
        })?;
    }
}
