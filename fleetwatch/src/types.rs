//! Types that mirror the coordinator's JSON schema.
//!
//! Decoding is lenient on purpose: unknown fields are ignored and most fields
//! default, so a coordinator running a newer schema does not blank the view.

use serde::{Deserialize, Serialize};

/// Host-level hardware snapshot. Every worker on a host reports the same values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareMetrics {
    pub cpu_usage_percent: f64,
    pub memory_used_gb: f64,
    pub memory_total_gb: f64,
    pub memory_usage_percent: f64,
    pub disk_used_gb: f64,
    pub disk_total_gb: f64,
    pub disk_usage_percent: f64,
    pub load_avg_1m: f64,
    pub load_avg_5m: f64,
    pub load_avg_15m: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub worker_id: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub cores: u32,
    #[serde(default)]
    pub search_type: String,
    // serialized by the worker; shown as-is
    #[serde(default)]
    pub search_params: String,
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub tested: u64,
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub uptime_secs: u64,
    #[serde(default)]
    pub last_heartbeat_secs_ago: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<HardwareMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetData {
    pub workers: Vec<WorkerStatus>,
    pub total_workers: usize,
    pub total_cores: u64,
    pub total_tested: u64,
    pub total_found: u64,
}

/// Search progress, keyed by search form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Checkpoint {
    Factorial {
        last_n: u64,
        #[serde(default)]
        start: Option<u64>,
        #[serde(default)]
        end: Option<u64>,
    },
    Primorial {
        last_prime: u64,
        #[serde(default)]
        start: Option<u64>,
        #[serde(default)]
        end: Option<u64>,
    },
    Kbn {
        last_n: u64,
        #[serde(default)]
        min_n: Option<u64>,
        #[serde(default)]
        max_n: Option<u64>,
    },
    Palindromic {
        digit_count: u64,
        #[serde(default)]
        min_digits: Option<u64>,
        #[serde(default)]
        max_digits: Option<u64>,
    },
    NearRepdigit {
        digit_count: u64,
        #[serde(default)]
        min_digits: Option<u64>,
        #[serde(default)]
        max_digits: Option<u64>,
    },
    // Forms this client does not know yet still decode.
    #[serde(other)]
    Unknown,
}

fn range(lo: Option<u64>, hi: Option<u64>) -> String {
    match (lo, hi) {
        (Some(lo), Some(hi)) => format!(" [{lo}..{hi}]"),
        (Some(lo), None) => format!(" [{lo}..]"),
        (None, Some(hi)) => format!(" [..{hi}]"),
        (None, None) => String::new(),
    }
}

impl Checkpoint {
    /// One-line progress summary for headers and logs.
    pub fn describe(&self) -> String {
        match self {
            Checkpoint::Factorial { last_n, start, end } => {
                format!("factorial n={last_n}{}", range(*start, *end))
            }
            Checkpoint::Primorial {
                last_prime,
                start,
                end,
            } => format!("primorial p={last_prime}{}", range(*start, *end)),
            Checkpoint::Kbn {
                last_n,
                min_n,
                max_n,
            } => format!("kbn n={last_n}{}", range(*min_n, *max_n)),
            Checkpoint::Palindromic {
                digit_count,
                min_digits,
                max_digits,
            } => format!(
                "palindromic {digit_count} digits{}",
                range(*min_digits, *max_digits)
            ),
            Checkpoint::NearRepdigit {
                digit_count,
                min_digits,
                max_digits,
            } => format!(
                "near-repdigit {digit_count} digits{}",
                range(*min_digits, *max_digits)
            ),
            Checkpoint::Unknown => "unknown form".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub active: bool,
    pub checkpoint: Option<Checkpoint>,
}

/// Lifecycle of a search or job. Failures carry the coordinator's reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Paused,
    Completed,
    Cancelled,
    Failed { reason: String },
    // Statuses this client does not know yet ("pending", "queued", ...) keep their raw name.
    #[serde(untagged)]
    Other(String),
}

impl JobStatus {
    pub fn label(&self) -> &str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Paused => "paused",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Failed { .. } => "failed",
            JobStatus::Other(raw) => raw,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Running | JobStatus::Paused)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedSearch {
    pub id: u64,
    #[serde(default)]
    pub search_type: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub status: JobStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub tested: u64,
    #[serde(default)]
    pub found: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchJob {
    pub id: u64,
    #[serde(default)]
    pub search_type: String,
    pub status: JobStatus,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub range_start: u64,
    #[serde(default)]
    pub range_end: u64,
    #[serde(default)]
    pub block_size: u64,
    #[serde(default)]
    pub total_tested: u64,
    #[serde(default)]
    pub total_found: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: u64,
    pub hostname: String,
    // running / deploying / failed / ... ; not an enum on the wire
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub ssh_user: Option<String>,
    #[serde(default)]
    pub search_type: Option<String>,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTaskSummary {
    pub id: u64,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub agent_model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentBudgetSummary {
    pub id: u64,
    pub period: String,
    pub budget_usd: f64,
    pub spent_usd: f64,
    pub tokens_used: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentInfo {
    pub task_id: u64,
    pub title: String,
    pub model: String,
    pub status: String,
    pub started_at: Option<String>,
    pub pid: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSummary {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub form: String,
    pub status: String,
    pub total_tested: u64,
    pub total_found: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSummary {
    pub form: String,
    pub expression: String,
    pub digits: u64,
    pub holder: String,
    pub our_best_digits: u64,
}

/// A discrete event pushed by the coordinator. `id` is unique across the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub timestamp_ms: u64,
}
