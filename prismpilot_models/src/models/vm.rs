use super::{VmMetadata, VmSpec};

/// Vm : VM intent as returned by `GET vms/<uuid>`.
///
/// `spec` and `metadata` are the desired state and must be written back
/// together. `status` is reported by the backend and is never submitted.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vm {
    #[serde(rename = "metadata")]
    pub metadata: VmMetadata,
    #[serde(rename = "spec")]
    pub spec: VmSpec,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
}

impl Vm {
    pub fn new(metadata: VmMetadata, spec: VmSpec) -> Vm {
        Vm {
            metadata,
            spec,
            status: None,
        }
    }
}
