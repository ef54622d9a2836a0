use super::Extra;

/// IntentResponse : What the backend answers to an accepted mutating call.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct IntentResponse {
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<IntentStatus>,
    #[serde(rename = "metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(flatten)]
    pub other: Extra,
}

impl IntentResponse {
    /// Identifier of the task tracking the accepted operation, if any.
    pub fn task_uuid(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|status| status.execution_context.as_ref())
            .and_then(|context| context.task_uuid.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct IntentStatus {
    /// `PENDING`, `COMPLETE`, ...
    #[serde(rename = "state", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "execution_context", skip_serializing_if = "Option::is_none")]
    pub execution_context: Option<ExecutionContext>,
    #[serde(flatten)]
    pub other: Extra,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionContext {
    #[serde(rename = "task_uuid", skip_serializing_if = "Option::is_none")]
    pub task_uuid: Option<String>,
    #[serde(flatten)]
    pub other: Extra,
}
