//! Frame decoder: one inbound text frame -> one typed envelope.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FrameError;
use crate::types::{
    AgentBudgetSummary, AgentInfo, AgentTaskSummary, Deployment, FleetData, HardwareMetrics,
    ManagedSearch, Notification, ProjectSummary, RecordSummary, SearchJob, Status,
};

/// Partial state update. `None` means the coordinator left the field out of this tick.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateFrame {
    pub status: Option<Status>,
    pub fleet: Option<FleetData>,
    pub searches: Option<Vec<ManagedSearch>>,
    pub search_jobs: Option<Vec<SearchJob>>,
    pub deployments: Option<Vec<Deployment>>,
    pub agent_tasks: Option<Vec<AgentTaskSummary>>,
    pub agent_budgets: Option<Vec<AgentBudgetSummary>>,
    pub running_agents: Option<Vec<AgentInfo>>,
    pub projects: Option<Vec<ProjectSummary>>,
    pub records: Option<Vec<RecordSummary>>,
    // absent and null both clear; see Snapshot::apply
    pub coordinator: Option<HardwareMetrics>,
}

#[derive(Debug, Deserialize)]
struct NotificationFrame {
    notification: Notification,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Update(Box<UpdateFrame>),
    Notification(Notification),
}

/// Parse a text frame and dispatch on its `type` field.
pub fn decode(text: &str) -> Result<Frame, FrameError> {
    let mut value: Value = serde_json::from_str(text).map_err(FrameError::Json)?;
    let kind = match value.get_mut("type").map(Value::take) {
        Some(Value::String(s)) => s,
        _ => return Err(FrameError::MissingType),
    };
    match kind.as_str() {
        "update" => serde_json::from_value::<UpdateFrame>(value)
            .map(|u| Frame::Update(Box::new(u)))
            .map_err(|source| FrameError::Shape {
                kind: "update",
                source,
            }),
        "notification" => serde_json::from_value::<NotificationFrame>(value)
            .map(|n| Frame::Notification(n.notification))
            .map_err(|source| FrameError::Shape {
                kind: "notification",
                source,
            }),
        _ => Err(FrameError::UnknownType(kind)),
    }
}
