//! API Request and Response Types
//!
//! Wire records are kept apart from the persistence records in `agora-core`.
//! Each module declares the `From` mappings in both directions and the
//! field constraints of its request bodies.

// Agents, roles, tasks and groups
mod agent;
pub use agent::*;

// Named and titled text records
mod content;
pub use content::*;

// Ethics and scaling
mod governance;
pub use governance::*;

// NLP endpoints
mod nlp;
pub use nlp::*;

// Root, health and auth
mod system;
pub use system::*;
