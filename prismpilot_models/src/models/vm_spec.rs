use super::{Extra, Reference, VmResources};

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct VmSpec {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "resources")]
    pub resources: VmResources,
    #[serde(rename = "cluster_reference", skip_serializing_if = "Option::is_none")]
    pub cluster_reference: Option<Reference>,
    #[serde(flatten)]
    pub other: Extra,
}

impl VmSpec {
    pub fn new(name: String, resources: VmResources) -> VmSpec {
        VmSpec {
            name,
            resources,
            ..Default::default()
        }
    }
}
