use super::{VmMetadata, VmSpec};

/// VmRequest : Body of `POST vms` and `PUT vms/<uuid>`.
///
/// The update is a full replace of the intent: anything missing from
/// `spec` or `metadata` is dropped by the backend.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct VmRequest {
    #[serde(rename = "api_version", skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(rename = "spec")]
    pub spec: VmSpec,
    #[serde(rename = "metadata")]
    pub metadata: VmMetadata,
}

impl VmRequest {
    pub fn new(spec: VmSpec, metadata: VmMetadata) -> VmRequest {
        VmRequest {
            api_version: None,
            spec,
            metadata,
        }
    }
}
