use super::Extra;

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct DiskAddress {
    #[serde(rename = "device_index")]
    pub device_index: u32,
    #[serde(rename = "adapter_type")]
    pub adapter_type: AdapterType,
    #[serde(flatten)]
    pub other: Extra,
}

impl DiskAddress {
    pub fn new(adapter_type: AdapterType, device_index: u32) -> DiskAddress {
        DiskAddress {
            device_index,
            adapter_type,
            other: Extra::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdapterType {
    #[default]
    #[serde(rename = "SCSI")]
    Scsi,
    #[serde(rename = "IDE")]
    Ide,
    #[serde(rename = "PCI")]
    Pci,
    #[serde(rename = "SATA")]
    Sata,
    #[serde(rename = "SPAPR")]
    Spapr,
}
