use super::{DiskAddress, Extra};

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceProperties {
    #[serde(rename = "device_type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
    #[serde(rename = "disk_address", skip_serializing_if = "Option::is_none")]
    pub disk_address: Option<DiskAddress>,
    #[serde(flatten)]
    pub other: Extra,
}

impl DeviceProperties {
    pub fn new(device_type: DeviceType, disk_address: DiskAddress) -> DeviceProperties {
        DeviceProperties {
            device_type: Some(device_type),
            disk_address: Some(disk_address),
            other: Extra::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceType {
    #[default]
    #[serde(rename = "DISK")]
    Disk,
    #[serde(rename = "CDROM")]
    Cdrom,
}
