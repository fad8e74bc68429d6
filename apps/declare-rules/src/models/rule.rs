//! Declarative blocking rule as consumed by the browser's rule engine.
//!
//! Field declaration order is the serialized key order:
//! `id`, `priority`, `action`, `condition`.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single match-and-action record.
pub struct Rule {
    pub id: u32,
    pub priority: u32,
    pub action: Action,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Request match condition; only the URL filter is emitted.
pub struct Condition {
    #[serde(rename = "urlFilter")]
    pub url_filter: String,
}

impl Action {
    pub fn block() -> Self {
        Action {
            kind: ActionType::Block,
        }
    }
}
