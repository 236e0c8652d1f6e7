//! Validation Traits
//!
//! Request payloads are checked field by field before any handler body runs.
//! Every violation is collected, so a single 422 reports all of them.

use crate::error::{ApiError, ApiResult};
use agora_core::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Message attached to blank required text.
pub const BLANK_MESSAGE: &str = "ensure this value has at least 1 characters";

/// Message attached to a target language that is not a language code.
pub const LANGUAGE_CODE_MESSAGE: &str = "must be a language code such as 'fr' or 'pt-BR'";

/// `fr`, `deu`, `pt-BR`, `zh-Hant`. Surrounding whitespace is tolerated.
static LANGUAGE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})?$").expect("language code regex is valid")
});

/// A request payload that can check its own field constraints.
pub trait Validate {
    /// Push every violation into `violations`.
    fn collect_violations(&self, violations: &mut Violations);

    /// `Ok` if no field is violated, otherwise a 422 listing each one.
    fn validate(&self) -> ApiResult<()> {
        let mut violations = Violations::default();
        self.collect_violations(&mut violations);
        violations.into_result()
    }
}

/// Accumulator for field violations.
#[derive(Debug, Default)]
pub struct Violations(Vec<ValidationError>);

impl Violations {
    pub fn check(&mut self, outcome: Result<(), ValidationError>) -> &mut Self {
        if let Err(err) = outcome {
            self.0.push(err);
        }
        self
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) -> &mut Self {
        self.0.extend(errors);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> ApiResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::from(self.0))
        }
    }
}

/// Trait for validating non-empty strings.
///
/// # Example
/// ```ignore
/// use agora_api::validation::ValidateNonEmpty;
///
/// violations.check(req.name.validate_non_empty("name"));
/// ```
pub trait ValidateNonEmpty {
    /// Fails if the value is empty or whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError> {
        if self.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: field_name.to_string(),
                reason: BLANK_MESSAGE.to_string(),
            });
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError> {
        self.as_str().validate_non_empty(field_name)
    }
}

/// Optional fields are only checked when present.
impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> Result<(), ValidationError> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Ok(()),
        }
    }
}

/// Language codes that end up in a model id.
pub trait ValidateLanguageCode {
    /// Fails if the trimmed value is not a bare language code.
    fn validate_language_code(&self, field_name: &str) -> Result<(), ValidationError>;
}

impl ValidateLanguageCode for str {
    fn validate_language_code(&self, field_name: &str) -> Result<(), ValidationError> {
        if LANGUAGE_CODE.is_match(self.trim()) {
            Ok(())
        } else {
            Err(ValidationError::InvalidValue {
                field: field_name.to_string(),
                reason: LANGUAGE_CODE_MESSAGE.to_string(),
            })
        }
    }
}

impl ValidateLanguageCode for String {
    fn validate_language_code(&self, field_name: &str) -> Result<(), ValidationError> {
        self.as_str().validate_language_code(field_name)
    }
}

/// Checks over list fields. Element errors are located as `field.index`.
pub trait ValidateList {
    /// Every element must be non-blank.
    fn validate_each_non_empty(&self, field_name: &str) -> Vec<ValidationError>;

    /// No element may appear twice.
    fn validate_distinct(&self, field_name: &str) -> Vec<ValidationError>;
}

impl ValidateList for [String] {
    fn validate_each_non_empty(&self, field_name: &str) -> Vec<ValidationError> {
        self.iter()
            .enumerate()
            .filter_map(|(i, item)| {
                item.validate_non_empty(&format!("{}.{}", field_name, i))
                    .err()
            })
            .collect()
    }

    fn validate_distinct(&self, field_name: &str) -> Vec<ValidationError> {
        let mut seen = HashSet::new();
        self.iter()
            .enumerate()
            .filter(|(_, item)| !seen.insert(item.as_str()))
            .map(|(i, item)| ValidationError::InvalidValue {
                field: format!("{}.{}", field_name, i),
                reason: format!("duplicate entry '{}'", item),
            })
            .collect()
    }
}
