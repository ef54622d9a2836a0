use super::{DeviceProperties, Extra, Reference};

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Disk {
    /// Assigned by the backend once the disk exists.
    #[serde(rename = "uuid", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "disk_size_bytes", skip_serializing_if = "Option::is_none")]
    pub disk_size_bytes: Option<u64>,
    #[serde(rename = "disk_size_mib", skip_serializing_if = "Option::is_none")]
    pub disk_size_mib: Option<u64>,
    #[serde(rename = "device_properties", skip_serializing_if = "Option::is_none")]
    pub device_properties: Option<DeviceProperties>,
    /// Image or disk the content is cloned from.
    #[serde(rename = "data_source_reference", skip_serializing_if = "Option::is_none")]
    pub data_source_reference: Option<Reference>,
    #[serde(flatten)]
    pub other: Extra,
}

impl Disk {
    pub fn new(device_properties: DeviceProperties) -> Disk {
        Disk {
            device_properties: Some(device_properties),
            ..Default::default()
        }
    }
}
