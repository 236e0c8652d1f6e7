//! Named and titled text records.
//!
//! Six kinds share one shape: a natural key plus one text attribute. They
//! differ only in field names, so the request, response, validation and
//! mappings are generated together.

use agora_core::{
    Feedback, Influence, News, NewFeedback, NewInfluence, NewNews, NewRecommendation, NewStage,
    NewTraining, Recommendation, Stage, Training,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::component::impl_component;
use crate::validation::{Validate, ValidateNonEmpty, Violations};

/// Declare the wire pair for a two-field text record.
macro_rules! text_component {
    (
        $(#[$meta:meta])*
        $create:ident, $response:ident => $record:ident / $draft:ident {
            $key:ident,
            $attr:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
        pub struct $create {
            pub $key: String,
            pub $attr: String,
        }

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
        pub struct $response {
            pub $key: String,
            pub $attr: String,
        }

        impl Validate for $create {
            fn collect_violations(&self, violations: &mut Violations) {
                violations
                    .check(self.$key.validate_non_empty(stringify!($key)))
                    .check(self.$attr.validate_non_empty(stringify!($attr)));
            }
        }

        impl From<$create> for $draft {
            fn from(req: $create) -> Self {
                Self {
                    $key: req.$key,
                    $attr: req.$attr,
                }
            }
        }

        impl From<$record> for $response {
            fn from(record: $record) -> Self {
                Self {
                    $key: record.$key,
                    $attr: record.$attr,
                }
            }
        }

        impl_component!($response, record: $record, create: $create);
    };
}

text_component! {
    /// Request to record an influence and its effect.
    CreateInfluenceRequest, InfluenceResponse => Influence / NewInfluence { name, effect }
}

text_component! {
    /// Request to create a stage.
    CreateStageRequest, StageResponse => Stage / NewStage { name, description }
}

text_component! {
    /// Request to publish a news item. Titles are unique.
    CreateNewsRequest, NewsResponse => News / NewNews { title, content }
}

text_component! {
    CreateRecommendationRequest, RecommendationResponse => Recommendation / NewRecommendation { title, content }
}

text_component! {
    CreateTrainingRequest, TrainingResponse => Training / NewTraining { title, content }
}

text_component! {
    /// Request to leave feedback. One entry per user.
    CreateFeedbackRequest, FeedbackResponse => Feedback / NewFeedback { user, content }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_user_is_rejected() {
        let req = CreateFeedbackRequest {
            user: "".to_string(),
            content: "x".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_maps_to_draft() {
        let draft = NewNews::from(CreateNewsRequest {
            title: "launch".to_string(),
            content: "today".to_string(),
        });
        assert_eq!(draft.title, "launch");
        assert_eq!(draft.content, "today");
    }
}
