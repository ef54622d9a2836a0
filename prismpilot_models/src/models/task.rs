use std::fmt;

use super::{Extra, Reference};

/// Task : Asynchronous backend operation as returned by `GET tasks/<uuid>`.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "uuid", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "status")]
    pub status: TaskStatus,
    #[serde(rename = "operation_type", skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(rename = "progress_message", skip_serializing_if = "Option::is_none")]
    pub progress_message: Option<String>,
    #[serde(rename = "percentage_complete", skip_serializing_if = "Option::is_none")]
    pub percentage_complete: Option<u32>,
    #[serde(rename = "error_detail", skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    #[serde(rename = "entity_reference_list", skip_serializing_if = "Option::is_none")]
    pub entity_reference_list: Option<Vec<Reference>>,
    #[serde(flatten)]
    pub other: Extra,
}

impl Task {
    pub fn new(status: TaskStatus) -> Task {
        Task {
            status,
            ..Default::default()
        }
    }
}

/// Status of a [Task].
///
/// `Error` never comes from the backend: it is the client-side marker for a
/// status that could not be retrieved. Values this enum does not know are
/// kept verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Queued,
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
    Error,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Queued => "QUEUED",
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Succeeded => "SUCCEEDED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Error => "ERROR",
            TaskStatus::Other(status) => status.as_str(),
        }
    }

    /// Whether the backend is still working on the task.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "QUEUED" => TaskStatus::Queued,
            "PENDING" => TaskStatus::Pending,
            "RUNNING" => TaskStatus::Running,
            "SUCCEEDED" => TaskStatus::Succeeded,
            "FAILED" => TaskStatus::Failed,
            "ERROR" => TaskStatus::Error,
            _ => TaskStatus::Other(value),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
