//! # Changes to an existing VM
//!
//! Updates of a VM intent are full-document replacements: the backend keeps
//! exactly what is submitted and drops anything left out. Every change is
//! therefore applied by the [Mutator] as one read-modify-write cycle:
//!
//! 1. Read the current VM intent.
//! 2. Change one field of the in-memory document, or fail before writing
//!    anything if the targeted structure does not exist.
//! 3. Submit the whole `spec` and `metadata` as read, with only that field
//!    changed. `status` is never submitted.
//! 4. Hand back the identifier of the task tracking the accepted update.
//!
//! ## Concurrent writers
//!
//! Nothing locks the VM between steps 1 and 3. The `metadata.spec_version`
//! read in step 1 is submitted unchanged. A backend enforcing it rejects the
//! update of a VM modified in between with a conflict, in which case the
//! whole cycle is replayed from a fresh read, a bounded number of times. A
//! backend that does not enforce it lets the last writer win silently.
//! Mutations of a same VM should be serialized by the caller.
use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

use crate::{
    builder::BuilderError,
    client::PilotError,
    repository::{Kind, Repository, RepositoryError},
    resolver::parse_uuid,
    size::parse_size,
};
use prismpilot_models::models::{IntentResponse, Vm};

/// API version submitted with full replacements
const UPDATE_API_VERSION: &str = "3.1";

/// Desired power state of a VM
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::On => "ON",
            PowerState::Off => "OFF",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field change applied to a VM intent
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// Set the size of the disk with this uuid, in bytes
    ResizeDisk { disk_uuid: Uuid, size_bytes: u64 },
    SetPowerState(PowerState),
}

impl Mutation {
    /// Resize to a human readable size such as `"50 GiB"`.
    pub fn resize_disk(disk_uuid: Uuid, size: &str) -> Result<Mutation, BuilderError> {
        Ok(Mutation::ResizeDisk {
            disk_uuid,
            size_bytes: parse_size(size)?,
        })
    }

    /// Change the in-memory document as read from the backend. Nothing is
    /// modified when an error is returned.
    pub fn apply(&self, vm_uuid: Uuid, document: &mut Value) -> Result<(), PilotError> {
        match self {
            Mutation::ResizeDisk {
                disk_uuid,
                size_bytes,
            } => {
                let wanted = disk_uuid.to_string();
                let index = document
                    .pointer("/spec/resources/disk_list")
                    .and_then(Value::as_array)
                    .and_then(|disks| {
                        disks.iter().position(|disk| {
                            disk["uuid"]
                                .as_str()
                                .map(|uuid| uuid.eq_ignore_ascii_case(&wanted))
                                .unwrap_or(false)
                        })
                    })
                    .ok_or(PilotError::DiskNotFound {
                        vm: vm_uuid,
                        disk: *disk_uuid,
                    })?;
                let disk = document
                    .pointer_mut(&format!("/spec/resources/disk_list/{}", index))
                    .and_then(Value::as_object_mut)
                    .ok_or(PilotError::DiskNotFound {
                        vm: vm_uuid,
                        disk: *disk_uuid,
                    })?;
                debug!(
                    "Resize disk {} from {:?} to {} bytes",
                    disk_uuid,
                    disk.get("disk_size_bytes"),
                    size_bytes
                );
                disk.insert("disk_size_bytes".to_string(), Value::from(*size_bytes));
            }
            Mutation::SetPowerState(state) => {
                let resources = document
                    .pointer_mut("/spec/resources")
                    .and_then(Value::as_object_mut)
                    .ok_or_else(|| {
                        PilotError::Validation(format!("VM {} has no spec resources", vm_uuid))
                    })?;
                debug!(
                    "Change power state from {:?} to {}",
                    resources.get("power_state"),
                    state
                );
                resources.insert("power_state".to_string(), Value::from(state.as_str()));
            }
        }
        Ok(())
    }
}

/// Runs read-modify-write cycles against a repository
#[derive(Debug)]
pub struct Mutator<'a, R: Repository> {
    repository: &'a R,
    /// How many times a conflicting update is replayed before giving up
    conflict_retries: u32,
}

impl<'a, R: Repository> Mutator<'a, R> {
    pub fn new(repository: &'a R, conflict_retries: u32) -> Mutator<'a, R> {
        Mutator {
            repository,
            conflict_retries,
        }
    }

    /// Read the current intent of a VM
    pub async fn read(&self, vm_uuid: Uuid) -> Result<Vm, PilotError> {
        let json = self.read_document(vm_uuid).await?;
        serde_json::from_value(json)
            .map_err(|e| PilotError::Transport(RepositoryError::Deserialize(e)))
    }

    /// Read the current intent of a VM exactly as the backend returns it
    pub async fn read_document(&self, vm_uuid: Uuid) -> Result<Value, PilotError> {
        let json = match self.repository.get(Kind::Vm, &vm_uuid.to_string()).await {
            Err(RepositoryError::NotFound(_)) => return Err(PilotError::VmNotFound(vm_uuid)),
            other => other?,
        };
        trace!("VM {} read as {}", vm_uuid, json);
        Ok(json)
    }

    /// Apply the mutation and submit the updated intent, returning the uuid
    /// of the task tracking the update.
    #[instrument(skip(self), fields(vm = %vm_uuid))]
    pub async fn mutate(&self, vm_uuid: Uuid, mutation: &Mutation) -> Result<Uuid, PilotError> {
        let attempts = self.conflict_retries + 1;
        for attempt in 1..=attempts {
            let mut document = self.read_document(vm_uuid).await?;
            mutation.apply(vm_uuid, &mut document)?;
            let body = update_body(vm_uuid, document)?;
            trace!("Update body: {}", body);

            match self.submit(vm_uuid, body).await {
                Err(PilotError::Transport(RepositoryError::Conflict(_))) if attempt < attempts => {
                    warn!(
                        "Update of VM {} conflicted, retry {}/{} from a fresh read",
                        vm_uuid, attempt, self.conflict_retries
                    );
                }
                Err(PilotError::Transport(RepositoryError::Conflict(_))) => {
                    return Err(PilotError::Conflict(vm_uuid, attempts));
                }
                other => return other,
            }
        }
        Err(PilotError::Conflict(vm_uuid, attempts))
    }

    async fn submit(&self, vm_uuid: Uuid, body: Value) -> Result<Uuid, PilotError> {
        let response = self
            .repository
            .update(Kind::Vm, &vm_uuid.to_string(), body)
            .await?;
        let task = task_uuid(&response)?;
        info!("Update of VM {} accepted, task {}", vm_uuid, task);
        Ok(task)
    }
}

/// Full replacement built from the document read, `status` left out
fn update_body(vm_uuid: Uuid, document: Value) -> Result<Value, PilotError> {
    let mut document = match document {
        Value::Object(document) => document,
        _ => {
            return Err(PilotError::Validation(format!(
                "VM {} is not a JSON object",
                vm_uuid
            )))
        }
    };
    let mut body = Map::new();
    body.insert("api_version".to_string(), Value::from(UPDATE_API_VERSION));
    for key in ["spec", "metadata"] {
        let part = document.remove(key).ok_or_else(|| {
            PilotError::Validation(format!("VM {} has no {}", vm_uuid, key))
        })?;
        body.insert(key.to_string(), part);
    }
    Ok(Value::Object(body))
}

/// Identifier of the task tracking an accepted mutating call
pub(crate) fn task_uuid(response: &IntentResponse) -> Result<Uuid, PilotError> {
    let raw = response.task_uuid().ok_or_else(|| {
        PilotError::Validation("accepted response carries no task uuid".to_string())
    })?;
    parse_uuid(Kind::Task, raw)
}
