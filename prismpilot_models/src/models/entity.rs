use super::Extra;

/// Entity : One element of a listing. Only the parts needed to resolve
/// names are modelled, the rest is kept as is.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "metadata")]
    pub metadata: EntityMetadata,
    #[serde(rename = "spec", skip_serializing_if = "Option::is_none")]
    pub spec: Option<EntitySpec>,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
}

impl Entity {
    pub fn new(metadata: EntityMetadata) -> Entity {
        Entity {
            metadata,
            spec: None,
            status: None,
        }
    }

    /// Display name as found in the entity spec.
    pub fn name(&self) -> Option<&str> {
        self.spec.as_ref().and_then(|spec| spec.name.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityMetadata {
    #[serde(rename = "kind", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Immutable identifier, unique within the kind.
    #[serde(rename = "uuid")]
    pub uuid: String,
    #[serde(flatten)]
    pub other: Extra,
}

impl EntityMetadata {
    pub fn new(uuid: String) -> EntityMetadata {
        EntityMetadata {
            kind: None,
            uuid,
            other: Extra::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct EntitySpec {
    /// Mutable display name, not unique.
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub other: Extra,
}
