/// Reference : Handle to any backend object, addressed by its kind and
/// its immutable uuid.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "kind")]
    pub kind: String,
    #[serde(rename = "uuid")]
    pub uuid: String,
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Reference {
    pub fn new(kind: String, uuid: String) -> Reference {
        Reference {
            kind,
            uuid,
            name: None,
        }
    }
}
