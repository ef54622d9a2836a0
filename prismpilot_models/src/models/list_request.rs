/// ListRequest : Body of a `POST <collection>/list` call.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(rename = "kind")]
    pub kind: String,
    /// Maximum number of entities returned in one page.
    #[serde(rename = "length")]
    pub length: u32,
    #[serde(rename = "offset", skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// FIQL filter expression evaluated by the backend.
    #[serde(rename = "filter", skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl ListRequest {
    pub fn new(kind: String, length: u32) -> ListRequest {
        ListRequest {
            kind,
            length,
            offset: None,
            filter: None,
        }
    }
}
