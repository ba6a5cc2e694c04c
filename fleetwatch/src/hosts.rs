//! Groups the flat worker/search/deployment lists into one view model per
//! physical host. Recomputed from scratch on every read; fleets are small.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::types::{Deployment, FleetData, HardwareMetrics, ManagedSearch, WorkerStatus};

/// Hostname given to the synthesized card when the coordinator has no workers of its own.
pub const COORDINATOR_HOSTNAME: &str = "coordinator";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostNode {
    pub hostname: String,
    pub is_coordinator: bool,
    pub metrics: Option<HardwareMetrics>,
    pub workers: Vec<WorkerStatus>,
    pub searches: Vec<ManagedSearch>,
    pub deployments: Vec<Deployment>,
    pub total_cores: u32,
    pub total_tested: u64,
    pub total_found: u64,
}

fn host_key(w: &WorkerStatus) -> &str {
    if w.hostname.is_empty() {
        &w.worker_id
    } else {
        &w.hostname
    }
}

pub fn group_by_host(
    fleet: &FleetData,
    coordinator: Option<&HardwareMetrics>,
    searches: &[ManagedSearch],
    deployments: &[Deployment],
) -> Vec<HostNode> {
    let mut groups: IndexMap<&str, Vec<&WorkerStatus>> = IndexMap::new();
    for w in &fleet.workers {
        groups.entry(host_key(w)).or_default().push(w);
    }

    let merge_coordinator = groups.len() == 1 && coordinator.is_some();

    let mut nodes: Vec<HostNode> = groups
        .iter()
        .map(|(hostname, workers)| {
            let ids: HashSet<&str> = workers.iter().map(|w| w.worker_id.as_str()).collect();
            let mut metrics = workers.iter().find_map(|w| w.metrics.clone());
            if merge_coordinator && metrics.is_none() {
                metrics = coordinator.cloned();
            }
            HostNode {
                hostname: hostname.to_string(),
                is_coordinator: merge_coordinator,
                metrics,
                workers: workers.iter().map(|w| (*w).clone()).collect(),
                searches: searches
                    .iter()
                    .filter(|s| s.worker_id.as_deref().is_some_and(|id| ids.contains(id)))
                    .cloned()
                    .collect(),
                deployments: deployments
                    .iter()
                    .filter(|d| d.hostname == *hostname)
                    .cloned()
                    .collect(),
                // Each worker reports the whole host's core count, so take the max.
                total_cores: workers.iter().map(|w| w.cores).max().unwrap_or(0),
                total_tested: workers.iter().map(|w| w.tested).sum(),
                total_found: workers.iter().map(|w| w.found).sum(),
            }
        })
        .collect();

    if let (Some(metrics), false) = (coordinator, merge_coordinator) {
        let orphaned = deployments
            .iter()
            .filter(|d| !groups.contains_key(d.hostname.as_str()))
            .cloned()
            .collect();
        nodes.push(HostNode {
            hostname: COORDINATOR_HOSTNAME.to_string(),
            is_coordinator: true,
            metrics: Some(metrics.clone()),
            deployments: orphaned,
            ..HostNode::default()
        });
    }

    // stable: ties keep encounter order
    nodes.sort_by(|a, b| {
        b.is_coordinator
            .cmp(&a.is_coordinator)
            .then(b.total_cores.cmp(&a.total_cores))
    });
    nodes
}
