//! Agent, role, task and group API types

use agora_core::{Agent, Group, NewAgent, NewGroup, NewRole, NewTask, Role, Task};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::component::impl_component;
use crate::validation::{Validate, ValidateList, ValidateNonEmpty, Violations};

// ============================================================================
// AGENT
// ============================================================================

/// Request to create an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateAgentRequest {
    /// Unique agent name
    pub name: String,
    /// Model the agent runs on
    pub model: String,
    /// Name of an existing role
    #[serde(default)]
    pub role: Option<String>,
}

/// Agent response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AgentResponse {
    pub name: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Validate for CreateAgentRequest {
    fn collect_violations(&self, violations: &mut Violations) {
        violations
            .check(self.name.validate_non_empty("name"))
            .check(self.model.validate_non_empty("model"))
            .check(self.role.validate_non_empty("role"));
    }
}

impl From<CreateAgentRequest> for NewAgent {
    fn from(req: CreateAgentRequest) -> Self {
        Self {
            name: req.name,
            model: req.model,
            role: req.role,
        }
    }
}

impl From<Agent> for AgentResponse {
    fn from(agent: Agent) -> Self {
        Self {
            name: agent.name,
            model: agent.model,
            role: agent.role,
        }
    }
}

impl_component!(AgentResponse, record: Agent, create: CreateAgentRequest);

// ============================================================================
// ROLE
// ============================================================================

/// Request to create a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub name: String,
    pub description: String,
}

impl Validate for CreateRoleRequest {
    fn collect_violations(&self, violations: &mut Violations) {
        violations
            .check(self.name.validate_non_empty("name"))
            .check(self.description.validate_non_empty("description"));
    }
}

impl From<CreateRoleRequest> for NewRole {
    fn from(req: CreateRoleRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            name: role.name,
            description: role.description,
        }
    }
}

impl_component!(RoleResponse, record: Role, create: CreateRoleRequest);

// ============================================================================
// TASK
// ============================================================================

/// Request to create a task. `PUT` takes the same body and replaces every
/// field, so it may rename the task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub name: String,
    /// What the task does
    pub action: String,
    /// Name of the owning agent
    #[serde(default)]
    pub agent: Option<String>,
}

/// Full replacement body for `PUT /tasks/{name}`.
pub type UpdateTaskRequest = CreateTaskRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub name: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl Validate for CreateTaskRequest {
    fn collect_violations(&self, violations: &mut Violations) {
        violations
            .check(self.name.validate_non_empty("name"))
            .check(self.action.validate_non_empty("action"))
            .check(self.agent.validate_non_empty("agent"));
    }
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            name: req.name,
            action: req.action,
            agent: req.agent,
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            name: task.name,
            action: task.action,
            agent: task.agent,
        }
    }
}

impl_component!(TaskResponse, record: Task, create: CreateTaskRequest);

// ============================================================================
// GROUP
// ============================================================================

/// Request to create a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    /// Member names, in order
    pub members: Vec<String>,
    /// Names of existing tasks to attach, in order
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GroupResponse {
    pub name: String,
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<String>,
}

impl Validate for CreateGroupRequest {
    fn collect_violations(&self, violations: &mut Violations) {
        violations
            .check(self.name.validate_non_empty("name"))
            .extend(self.members.validate_each_non_empty("members"))
            .extend(self.tasks.validate_each_non_empty("tasks"))
            .extend(self.tasks.validate_distinct("tasks"));
    }
}

impl From<CreateGroupRequest> for NewGroup {
    fn from(req: CreateGroupRequest) -> Self {
        Self {
            name: req.name,
            members: req.members,
            tasks: req.tasks,
        }
    }
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            name: group.name,
            members: group.members,
            tasks: group.tasks,
        }
    }
}

impl_component!(GroupResponse, record: Group, create: CreateGroupRequest);
