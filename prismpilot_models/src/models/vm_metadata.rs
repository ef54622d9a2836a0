use super::{Extra, Reference};

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct VmMetadata {
    #[serde(rename = "kind")]
    pub kind: String,
    #[serde(rename = "uuid", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Revision of the spec, incremented by the backend on every accepted
    /// update. An update carrying a stale value is rejected with a conflict.
    #[serde(rename = "spec_version", skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<u64>,
    #[serde(rename = "project_reference", skip_serializing_if = "Option::is_none")]
    pub project_reference: Option<Reference>,
    #[serde(rename = "owner_reference", skip_serializing_if = "Option::is_none")]
    pub owner_reference: Option<Reference>,
    #[serde(flatten)]
    pub other: Extra,
}

impl VmMetadata {
    pub fn new(kind: String) -> VmMetadata {
        VmMetadata {
            kind,
            ..Default::default()
        }
    }
}
