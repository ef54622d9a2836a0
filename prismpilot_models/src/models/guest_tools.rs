use super::Extra;

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GuestTools {
    #[serde(rename = "nutanix_guest_tools", skip_serializing_if = "Option::is_none")]
    pub nutanix_guest_tools: Option<NutanixGuestTools>,
    #[serde(flatten)]
    pub other: Extra,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct NutanixGuestTools {
    /// `ENABLED` or `DISABLED`.
    #[serde(rename = "state", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// `MOUNTED` or `UNMOUNTED`.
    #[serde(rename = "iso_mount_state", skip_serializing_if = "Option::is_none")]
    pub iso_mount_state: Option<String>,
    #[serde(flatten)]
    pub other: Extra,
}
