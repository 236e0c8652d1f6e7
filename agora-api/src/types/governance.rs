//! Ethics and scaling API types. Both are addressed by their server-assigned id.

use agora_core::{Ethics, NewEthics, NewScaling, RecordId, Scaling};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::component::impl_component;
use crate::validation::{Validate, ValidateList, ValidateNonEmpty, Violations};

/// Request to record a set of ethical principles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateEthicsRequest {
    /// Principles, in order
    pub principles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EthicsResponse {
    pub id: RecordId,
    pub principles: Vec<String>,
}

impl Validate for CreateEthicsRequest {
    fn collect_violations(&self, violations: &mut Violations) {
        violations.extend(self.principles.validate_each_non_empty("principles"));
    }
}

impl From<CreateEthicsRequest> for NewEthics {
    fn from(req: CreateEthicsRequest) -> Self {
        Self {
            principles: req.principles,
        }
    }
}

impl From<Ethics> for EthicsResponse {
    fn from(ethics: Ethics) -> Self {
        Self {
            id: ethics.id,
            principles: ethics.principles,
        }
    }
}

impl_component!(EthicsResponse, record: Ethics, create: CreateEthicsRequest);

/// Request to record a scaling strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateScalingRequest {
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScalingResponse {
    pub id: RecordId,
    pub strategy: String,
}

impl Validate for CreateScalingRequest {
    fn collect_violations(&self, violations: &mut Violations) {
        violations.check(self.strategy.validate_non_empty("strategy"));
    }
}

impl From<CreateScalingRequest> for NewScaling {
    fn from(req: CreateScalingRequest) -> Self {
        Self {
            strategy: req.strategy,
        }
    }
}

impl From<Scaling> for ScalingResponse {
    fn from(scaling: Scaling) -> Self {
        Self {
            id: scaling.id,
            strategy: scaling.strategy,
        }
    }
}

impl_component!(ScalingResponse, record: Scaling, create: CreateScalingRequest);
