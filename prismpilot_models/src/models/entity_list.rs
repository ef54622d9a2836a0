use super::Entity;

/// EntityList : Response of a `POST <collection>/list` call.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityList {
    #[serde(rename = "entities", default)]
    pub entities: Vec<Entity>,
    #[serde(rename = "metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ListMetadata>,
}

impl EntityList {
    pub fn new(entities: Vec<Entity>) -> EntityList {
        EntityList {
            entities,
            metadata: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ListMetadata {
    #[serde(rename = "kind", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Number of entities matching the request on the backend, which may
    /// exceed the number returned in this page.
    #[serde(rename = "total_matches", skip_serializing_if = "Option::is_none")]
    pub total_matches: Option<u32>,
    #[serde(rename = "length", skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(rename = "offset", skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}
