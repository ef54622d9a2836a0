use super::{Disk, Extra, GuestCustomization, GuestTools, Nic};

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct VmResources {
    #[serde(rename = "num_sockets", skip_serializing_if = "Option::is_none")]
    pub num_sockets: Option<u32>,
    #[serde(rename = "num_vcpus_per_socket", skip_serializing_if = "Option::is_none")]
    pub num_vcpus_per_socket: Option<u32>,
    #[serde(rename = "num_threads_per_core", skip_serializing_if = "Option::is_none")]
    pub num_threads_per_core: Option<u32>,
    #[serde(rename = "memory_size_mib", skip_serializing_if = "Option::is_none")]
    pub memory_size_mib: Option<u64>,
    /// Desired power state, `ON` or `OFF`.
    #[serde(rename = "power_state", skip_serializing_if = "Option::is_none")]
    pub power_state: Option<String>,
    #[serde(rename = "disk_list", skip_serializing_if = "Option::is_none")]
    pub disk_list: Option<Vec<Disk>>,
    #[serde(rename = "nic_list", skip_serializing_if = "Option::is_none")]
    pub nic_list: Option<Vec<Nic>>,
    #[serde(rename = "guest_tools", skip_serializing_if = "Option::is_none")]
    pub guest_tools: Option<GuestTools>,
    #[serde(rename = "guest_customization", skip_serializing_if = "Option::is_none")]
    pub guest_customization: Option<GuestCustomization>,
    #[serde(flatten)]
    pub other: Extra,
}

impl VmResources {
    pub fn new() -> VmResources {
        VmResources::default()
    }
}
