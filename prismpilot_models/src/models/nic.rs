use super::{Extra, IpEndpoint, Reference};

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Nic {
    #[serde(rename = "uuid", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// `NORMAL_NIC`, `DIRECT_NIC`, ...
    #[serde(rename = "nic_type", skip_serializing_if = "Option::is_none")]
    pub nic_type: Option<String>,
    #[serde(rename = "is_connected", skip_serializing_if = "Option::is_none")]
    pub is_connected: Option<bool>,
    #[serde(rename = "subnet_reference", skip_serializing_if = "Option::is_none")]
    pub subnet_reference: Option<Reference>,
    #[serde(rename = "ip_endpoint_list", skip_serializing_if = "Option::is_none")]
    pub ip_endpoint_list: Option<Vec<IpEndpoint>>,
    #[serde(flatten)]
    pub other: Extra,
}

impl Nic {
    pub fn new(subnet_reference: Reference) -> Nic {
        Nic {
            subnet_reference: Some(subnet_reference),
            ..Default::default()
        }
    }
}
