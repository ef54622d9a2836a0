use super::Extra;

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GuestCustomization {
    #[serde(rename = "cloud_init", skip_serializing_if = "Option::is_none")]
    pub cloud_init: Option<CloudInit>,
    #[serde(rename = "is_overridable", skip_serializing_if = "Option::is_none")]
    pub is_overridable: Option<bool>,
    #[serde(flatten)]
    pub other: Extra,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CloudInit {
    /// Base64 encoded cloud-init user-data document.
    #[serde(rename = "user_data", skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(flatten)]
    pub other: Extra,
}
