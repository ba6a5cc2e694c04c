//! Canonical in-memory state and the merge step that folds update frames into it.

use crate::frame::{Frame, UpdateFrame};
use crate::hosts::{group_by_host, HostNode};
use crate::notifications::NotificationLog;
use crate::types::{
    AgentBudgetSummary, AgentInfo, AgentTaskSummary, Deployment, FleetData, HardwareMetrics,
    ManagedSearch, ProjectSummary, RecordSummary, SearchJob, Status,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub status: Option<Status>,
    pub fleet: FleetData,
    pub searches: Vec<ManagedSearch>,
    pub search_jobs: Vec<SearchJob>,
    pub deployments: Vec<Deployment>,
    pub agent_tasks: Vec<AgentTaskSummary>,
    pub agent_budgets: Vec<AgentBudgetSummary>,
    pub running_agents: Vec<AgentInfo>,
    pub projects: Vec<ProjectSummary>,
    pub records: Vec<RecordSummary>,
    pub coordinator: Option<HardwareMetrics>,
}

fn replace_if_present<T>(slot: &mut T, incoming: Option<T>) {
    if let Some(v) = incoming {
        *slot = v;
    }
}

impl Snapshot {
    /// Per-field merge: fields missing from `update` keep their last value,
    /// except `coordinator`, which always takes the incoming value (absent clears it).
    pub fn apply(&mut self, update: UpdateFrame) {
        if update.status.is_some() {
            self.status = update.status;
        }
        replace_if_present(&mut self.fleet, update.fleet);
        replace_if_present(&mut self.searches, update.searches);
        replace_if_present(&mut self.search_jobs, update.search_jobs);
        replace_if_present(&mut self.deployments, update.deployments);
        replace_if_present(&mut self.agent_tasks, update.agent_tasks);
        replace_if_present(&mut self.agent_budgets, update.agent_budgets);
        replace_if_present(&mut self.running_agents, update.running_agents);
        replace_if_present(&mut self.projects, update.projects);
        replace_if_present(&mut self.records, update.records);
        self.coordinator = update.coordinator;
    }

    /// Host view models derived from the current snapshot.
    pub fn hosts(&self) -> Vec<HostNode> {
        group_by_host(
            &self.fleet,
            self.coordinator.as_ref(),
            &self.searches,
            &self.deployments,
        )
    }
}

/// Everything the driver publishes to readers: the merged snapshot plus the notification log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetState {
    pub snapshot: Snapshot,
    pub notifications: NotificationLog,
}

impl FleetState {
    /// Route a decoded frame. Returns true when anything visible changed.
    pub fn apply_frame(&mut self, frame: Frame) -> bool {
        match frame {
            Frame::Update(update) => {
                self.snapshot.apply(*update);
                true
            }
            Frame::Notification(n) => self.notifications.append(n),
        }
    }
}
