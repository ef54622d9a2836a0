//! In-memory backend recording every call, for unit tests.
use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::repository::{Kind, Repository, RepositoryError};
use prismpilot_models::models::{
    AdapterType, DeviceProperties, DeviceType, Disk, DiskAddress, Entity, EntityList,
    EntityMetadata, EntitySpec, ExecutionContext, IntentResponse, IntentStatus, ListRequest,
};

pub(crate) const VM: &str = "9f3c2a10-5b7d-4e2a-8c61-000000000001";
pub(crate) const TASK: &str = "7a5e1c44-2d9b-4f80-9e13-000000000001";

type Scripted = Mutex<VecDeque<Result<IntentResponse, RepositoryError>>>;

#[derive(Debug, Default)]
pub(crate) struct FakeRepository {
    listing: Option<EntityList>,
    entities: HashMap<(Kind, String), Value>,
    /// Remaining statuses of each task, the last one is repeated forever.
    /// `None` stands for a fetch that fails.
    tasks: Mutex<HashMap<String, VecDeque<Option<String>>>>,
    update_responses: Scripted,
    create_responses: Scripted,

    list_requests: Mutex<Vec<ListRequest>>,
    gets: Mutex<Vec<(Kind, String)>>,
    updates: Mutex<Vec<(Kind, String, Value)>>,
    creates: Mutex<Vec<(Kind, Value)>>,
}

fn uri(path: &str) -> hyper::Uri {
    format!("http://fake/api/nutanix/v3/{}", path)
        .parse()
        .unwrap()
}

impl FakeRepository {
    pub(crate) fn new() -> FakeRepository {
        FakeRepository::default()
    }

    /// Listing returned for every list call, whatever the kind
    pub(crate) fn with_listing(mut self, listing: EntityList) -> FakeRepository {
        self.listing = Some(listing);
        self
    }

    pub(crate) fn with_entity(mut self, kind: Kind, uuid: &str, document: Value) -> FakeRepository {
        self.entities.insert((kind, uuid.to_string()), document);
        self
    }

    pub(crate) fn with_task_statuses(self, uuid: &str, statuses: &[&str]) -> FakeRepository {
        self.tasks.lock().unwrap().insert(
            uuid.to_string(),
            statuses.iter().map(|status| Some(status.to_string())).collect(),
        );
        self
    }

    /// Statuses returned before the backend stops answering for the task
    pub(crate) fn with_task_outage(self, uuid: &str, statuses: &[&str]) -> FakeRepository {
        let mut script: VecDeque<_> = statuses.iter().map(|status| Some(status.to_string())).collect();
        script.push_back(None);
        self.tasks.lock().unwrap().insert(uuid.to_string(), script);
        self
    }

    /// Queue the answer to the next update
    pub(crate) fn with_update_response(
        self,
        response: Result<IntentResponse, RepositoryError>,
    ) -> FakeRepository {
        self.update_responses.lock().unwrap().push_back(response);
        self
    }

    pub(crate) fn with_create_response(
        self,
        response: Result<IntentResponse, RepositoryError>,
    ) -> FakeRepository {
        self.create_responses.lock().unwrap().push_back(response);
        self
    }

    pub(crate) fn list_requests(&self) -> Vec<ListRequest> {
        self.list_requests.lock().unwrap().clone()
    }

    /// Number of get calls, whatever the kind
    pub(crate) fn gets(&self) -> usize {
        self.gets.lock().unwrap().len()
    }

    pub(crate) fn updates(&self) -> Vec<(Kind, String, Value)> {
        self.updates.lock().unwrap().clone()
    }

    pub(crate) fn creates(&self) -> Vec<(Kind, Value)> {
        self.creates.lock().unwrap().clone()
    }

    fn next_status(&self, uuid: &str) -> Option<Option<String>> {
        let mut tasks = self.tasks.lock().unwrap();
        let statuses = tasks.get_mut(uuid)?;
        if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        }
    }
}

#[async_trait]
impl Repository for FakeRepository {
    async fn list(&self, kind: Kind, request: &ListRequest) -> Result<EntityList, RepositoryError> {
        self.list_requests.lock().unwrap().push(request.clone());
        self.listing.clone().ok_or_else(|| {
            let path = format!("{}/list", kind.collection());
            RepositoryError::Request(uri(&path), "connection refused".to_string())
        })
    }

    async fn get(&self, kind: Kind, uuid: &str) -> Result<Value, RepositoryError> {
        self.gets.lock().unwrap().push((kind, uuid.to_string()));
        let not_found = || RepositoryError::NotFound(uri(&format!("{}/{}", kind.collection(), uuid)));

        if kind == Kind::Task {
            let status = self
                .next_status(uuid)
                .ok_or_else(not_found)?
                .ok_or_else(|| {
                    RepositoryError::Request(
                        uri(&format!("{}/{}", kind.collection(), uuid)),
                        "connection reset".to_string(),
                    )
                })?;
            return Ok(json!({"uuid": uuid, "status": status, "percentage_complete": 50}));
        }
        self.entities
            .get(&(kind, uuid.to_string()))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn update(
        &self,
        kind: Kind,
        uuid: &str,
        body: Value,
    ) -> Result<IntentResponse, RepositoryError> {
        self.updates
            .lock()
            .unwrap()
            .push((kind, uuid.to_string(), body));
        self.update_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RepositoryError::Request(uri(uuid), "no answer".to_string())))
    }

    async fn create(&self, kind: Kind, body: Value) -> Result<IntentResponse, RepositoryError> {
        self.creates.lock().unwrap().push((kind, body));
        self.create_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RepositoryError::Request(
                    uri(kind.collection()),
                    "no answer".to_string(),
                ))
            })
    }
}

/// Listing of named entities
pub(crate) fn listing(entities: &[(&str, &str)]) -> EntityList {
    EntityList::new(
        entities
            .iter()
            .map(|(name, uuid)| Entity {
                spec: Some(EntitySpec {
                    name: Some(name.to_string()),
                    ..Default::default()
                }),
                ..Entity::new(EntityMetadata::new(uuid.to_string()))
            })
            .collect(),
    )
}

pub(crate) fn disk(
    uuid: &str,
    size_bytes: u64,
    adapter_type: AdapterType,
    device_index: u32,
    device_type: DeviceType,
) -> Disk {
    Disk {
        uuid: Some(uuid.to_string()),
        disk_size_bytes: Some(size_bytes),
        ..Disk::new(DeviceProperties::new(
            device_type,
            DiskAddress::new(adapter_type, device_index),
        ))
    }
}

/// Answer of the backend to an accepted mutating call
pub(crate) fn accepted(task: &str) -> IntentResponse {
    IntentResponse {
        status: Some(IntentStatus {
            state: Some("PENDING".to_string()),
            execution_context: Some(ExecutionContext {
                task_uuid: Some(task.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
