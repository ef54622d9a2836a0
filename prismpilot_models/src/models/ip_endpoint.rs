use super::Extra;

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct IpEndpoint {
    #[serde(rename = "ip", skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ip_type: Option<IpType>,
    #[serde(flatten)]
    pub other: Extra,
}

impl IpEndpoint {
    pub fn new(ip_type: IpType) -> IpEndpoint {
        IpEndpoint {
            ip: None,
            ip_type: Some(ip_type),
            other: Extra::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IpType {
    #[default]
    #[serde(rename = "DHCP")]
    Dhcp,
    #[serde(rename = "ASSIGNED")]
    Assigned,
    #[serde(rename = "LEARNED")]
    Learned,
}
