//! Agora Test Utilities
//!
//! Shared test infrastructure for the Agora workspace:
//! - Proptest generators for every draft type
//! - Fixtures for common scenarios
//! - A scripted NLP backend that counts its calls

// Re-export the in-memory store from its source crate
pub use agora_storage::MemoryStore;

// Re-export core types for convenience
pub use agora_core::{
    Agent, AgoraError, AgoraResult, Entity, EntityKind, NewAgent, NewEthics, NewFeedback,
    NewGroup, NewInfluence, NewNews, NewRecommendation, NewRole, NewScaling, NewStage, NewTask,
    NewTraining, NlpError, StorageError,
};
pub use agora_nlp::{NlpBackend, NlpService};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// MOCK NLP BACKEND
// ============================================================================

/// Deterministic stand-in for the inference API.
///
/// - sentiment: `[{"label": "POSITIVE" | "NEGATIVE", "score": ..}]`
/// - entities: one `MISC` entity per capitalized word
/// - translation: `[{"translation_text": "[<target>] <text>"}]`
///
/// Every call is counted, including failed and timed-out ones.
#[derive(Debug, Default)]
pub struct MockNlpBackend {
    calls: AtomicUsize,
    failure: Mutex<Option<NlpError>>,
    delay: Option<Duration>,
}

impl MockNlpBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering, to exercise timeouts.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Fail every following call with `error`.
    pub fn fail_with(&self, error: NlpError) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> AgoraResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone();
        match failure {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NlpBackend for MockNlpBackend {
    async fn sentiment(&self, text: &str) -> AgoraResult<Value> {
        self.enter().await?;
        let negative = ["hate", "bad", "awful", "terrible"]
            .iter()
            .any(|word| text.to_lowercase().contains(word));
        let label = if negative { "NEGATIVE" } else { "POSITIVE" };
        Ok(json!([{ "label": label, "score": 0.9987 }]))
    }

    async fn entities(&self, text: &str) -> AgoraResult<Value> {
        self.enter().await?;
        let entities: Vec<Value> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.chars().next().is_some_and(char::is_uppercase))
            .map(|word| json!({ "entity_group": "MISC", "word": word, "score": 0.95 }))
            .collect();
        Ok(Value::Array(entities))
    }

    async fn translate(&self, text: &str, target_language: &str) -> AgoraResult<Value> {
        self.enter().await?;
        Ok(json!([{ "translation_text": format!("[{}] {}", target_language, text) }]))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    /// Natural keys: short, lowercase, never blank.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,15}"
    }

    /// Free text that is never blank.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ,.]{0,40}"
    }

    /// Distinct, non-blank names.
    pub fn arb_distinct_names(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set(arb_name(), 1..=max).prop_map(|set| set.into_iter().collect())
    }

    pub fn arb_new_agent() -> impl Strategy<Value = NewAgent> {
        (arb_name(), arb_text()).prop_map(|(name, model)| NewAgent {
            name,
            model,
            role: None,
        })
    }

    pub fn arb_new_role() -> impl Strategy<Value = NewRole> {
        (arb_name(), arb_text()).prop_map(|(name, description)| NewRole { name, description })
    }

    pub fn arb_new_task() -> impl Strategy<Value = NewTask> {
        (arb_name(), arb_text()).prop_map(|(name, action)| NewTask {
            name,
            action,
            agent: None,
        })
    }

    pub fn arb_new_group() -> impl Strategy<Value = NewGroup> {
        (arb_name(), arb_distinct_names(5)).prop_map(|(name, members)| NewGroup {
            name,
            members,
            tasks: Vec::new(),
        })
    }

    pub fn arb_new_influence() -> impl Strategy<Value = NewInfluence> {
        (arb_name(), arb_text()).prop_map(|(name, effect)| NewInfluence { name, effect })
    }

    pub fn arb_new_news() -> impl Strategy<Value = NewNews> {
        (arb_name(), arb_text()).prop_map(|(title, content)| NewNews { title, content })
    }

    pub fn arb_new_feedback() -> impl Strategy<Value = NewFeedback> {
        (arb_name(), arb_text()).prop_map(|(user, content)| NewFeedback { user, content })
    }

    pub fn arb_new_ethics() -> impl Strategy<Value = NewEthics> {
        prop::collection::vec(arb_text(), 1..5).prop_map(|principles| NewEthics { principles })
    }

    pub fn arb_new_scaling() -> impl Strategy<Value = NewScaling> {
        arb_text().prop_map(|strategy| NewScaling { strategy })
    }

    /// Strings made only of whitespace, including the empty string.
    pub fn arb_blank() -> impl Strategy<Value = String> {
        "[ \t\n]{0,4}"
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;

    pub fn agent(name: &str) -> NewAgent {
        NewAgent {
            name: name.to_string(),
            model: "m1".to_string(),
            role: None,
        }
    }

    pub fn agent_with_role(name: &str, role: &str) -> NewAgent {
        NewAgent {
            role: Some(role.to_string()),
            ..agent(name)
        }
    }

    pub fn role(name: &str) -> NewRole {
        NewRole {
            name: name.to_string(),
            description: format!("{} role", name),
        }
    }

    pub fn task(name: &str, agent: Option<&str>) -> NewTask {
        NewTask {
            name: name.to_string(),
            action: "summarize".to_string(),
            agent: agent.map(str::to_string),
        }
    }

    pub fn group(name: &str, members: &[&str], tasks: &[&str]) -> NewGroup {
        NewGroup {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            tasks: tasks.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn feedback(user: &str) -> NewFeedback {
        NewFeedback {
            user: user.to_string(),
            content: "Works well".to_string(),
        }
    }

    pub fn ethics(principles: &[&str]) -> NewEthics {
        NewEthics {
            principles: principles.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn scaling(strategy: &str) -> NewScaling {
        NewScaling {
            strategy: strategy.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_every_call() {
        let backend = MockNlpBackend::new();
        backend.sentiment("I love it").await.unwrap();
        backend.entities("Paris and Berlin").await.unwrap();
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_sentiment_labels() {
        let backend = MockNlpBackend::new();
        let positive = backend.sentiment("I love sunny days!").await.unwrap();
        let negative = backend.sentiment("I hate rain").await.unwrap();
        assert_eq!(positive[0]["label"], "POSITIVE");
        assert_eq!(negative[0]["label"], "NEGATIVE");
    }

    #[tokio::test]
    async fn test_mock_entities_are_capitalized_words() {
        let backend = MockNlpBackend::new();
        let entities = backend.entities("Alice met Bob in Paris").await.unwrap();
        let words: Vec<&str> = entities
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["word"].as_str().unwrap())
            .collect();
        assert_eq!(words, vec!["Alice", "Bob", "Paris"]);
    }

    #[tokio::test]
    async fn test_mock_failure_still_counts() {
        let backend = MockNlpBackend::new();
        backend.fail_with(NlpError::InvalidResponse {
            model: "m".to_string(),
            reason: "down".to_string(),
        });
        assert!(backend.translate("hi", "fr").await.is_err());
        assert_eq!(backend.call_count(), 1);
    }
}
