//! # Prism Client
//!
//! [PrismClient] is the entry point of the crate. It owns a [Repository]
//! and the connection settings, and exposes every operation: name
//! resolution, VM creation, mutation of existing VMs and task tracking.
//!
//! Operations on independent VMs can run concurrently on one client. No
//! state is kept between calls.
//!
//! ## Example
//!
//! ```no_run
//! use prismpilot::builder::{config::PrismConfigBuilder, Builder};
//! use prismpilot::client::PrismClient;
//! use prismpilot::repository::Kind;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PrismConfigBuilder::from_env().try_build()?;
//! let client = PrismClient::new(config);
//!
//! let vm = client.resolve(Kind::Vm, "web-01").await?;
//! let task = client.power_on(vm).await?;
//! client.wait_for_task(task).await.into_result(task)?;
//! # Ok(())
//! # }
//! ```
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;

use crate::{
    builder::{config::PrismConfig, BuilderError},
    mutation::{task_uuid, Mutation, Mutator, PowerState},
    repository::{HttpRepository, Kind, Repository, RepositoryError},
    resolver::{boot_disk, find_unique, parse_uuid, Resolver},
    task::{TaskOutcome, TaskPoller},
};
use prismpilot_models::models::{DiskAddress, Entity, EntityList, Task, TaskStatus, Vm, VmRequest};

/// How much is known about the effect of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Refused before anything was changed, by local validation or by the
    /// backend.
    Rejected,
    /// Accepted by the backend, then failed while executing.
    Failed,
    /// The operation may or may not have taken effect.
    Undetermined,
}

#[derive(thiserror::Error, Debug)]
pub enum PilotError {
    #[error("No {kind} named {name:?}")]
    NotFound { kind: Kind, name: String },
    #[error("{count} {kind} entities are named {name:?}")]
    Ambiguous {
        kind: Kind,
        name: String,
        count: usize,
    },
    #[error("VM {0} does not exist")]
    VmNotFound(Uuid),
    #[error("VM {vm} has no disk {disk}")]
    DiskNotFound { vm: Uuid, disk: Uuid },
    #[error("VM {0} has no single boot disk")]
    BootDiskNotFound(Uuid),
    #[error("Backend call failed: {0}")]
    Transport(#[from] RepositoryError),
    #[error("Invalid value: {0}")]
    Validation(String),
    #[error("Could not build request: {0}")]
    Build(#[from] BuilderError),
    #[error("Update of VM {0} still conflicting after {1} attempts")]
    Conflict(Uuid, u32),
    #[error("Could not fetch status of task {task}")]
    TaskError {
        task: Uuid,
        #[source]
        source: RepositoryError,
    },
    #[error("Task {task} ended with status {status}")]
    TaskFailed { task: Uuid, status: TaskStatus },
    #[error("Wait on task {0} was cancelled")]
    Cancelled(Uuid),
    #[error("Task {0} did not complete in time")]
    TimedOut(Uuid),
}

impl PilotError {
    pub fn class(&self) -> FailureClass {
        match self {
            PilotError::Transport(e) => match e {
                RepositoryError::InvalidUri(..) | RepositoryError::Serialize(_) => {
                    FailureClass::Rejected
                }
                e if e.is_answer() => FailureClass::Rejected,
                _ => FailureClass::Undetermined,
            },
            PilotError::TaskFailed { .. } => FailureClass::Failed,
            PilotError::TaskError { .. } | PilotError::Cancelled(_) | PilotError::TimedOut(_) => {
                FailureClass::Undetermined
            }
            _ => FailureClass::Rejected,
        }
    }
}

/// Client of a Prism endpoint
#[derive(Debug)]
pub struct PrismClient<R: Repository = HttpRepository> {
    repository: R,
    config: PrismConfig,
}

impl PrismClient {
    /// Create a client talking HTTP(S) to the configured endpoint
    pub fn new(config: PrismConfig) -> PrismClient {
        PrismClient {
            repository: HttpRepository::new(&config),
            config,
        }
    }
}

impl<R: Repository> PrismClient<R> {
    pub fn with_repository(repository: R, config: PrismConfig) -> PrismClient<R> {
        PrismClient { repository, config }
    }

    pub fn config(&self) -> &PrismConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn resolver(&self) -> Resolver<'_, R> {
        Resolver::new(&self.repository, self.config.max_results)
    }

    fn mutator(&self) -> Mutator<'_, R> {
        Mutator::new(&self.repository, self.config.conflict_retries)
    }

    /// Poller configured from the client settings, see [TaskPoller] to add a
    /// cancellation token.
    pub fn task_poller(&self) -> TaskPoller<'_, R> {
        let poller = TaskPoller::new(&self.repository, self.config.poll_interval);
        match self.config.task_timeout {
            Some(timeout) => poller.with_deadline(timeout),
            None => poller,
        }
    }

    pub async fn list(&self, kind: Kind) -> Result<EntityList, PilotError> {
        self.resolver().list(kind).await
    }

    pub async fn list_clusters(&self) -> Result<Vec<Entity>, PilotError> {
        Ok(self.list(Kind::Cluster).await?.entities)
    }

    pub async fn list_images(&self) -> Result<Vec<Entity>, PilotError> {
        Ok(self.list(Kind::Image).await?.entities)
    }

    pub async fn list_subnets(&self) -> Result<Vec<Entity>, PilotError> {
        Ok(self.list(Kind::Subnet).await?.entities)
    }

    pub async fn list_projects(&self) -> Result<Vec<Entity>, PilotError> {
        Ok(self.list(Kind::Project).await?.entities)
    }

    pub async fn list_vms(&self) -> Result<Vec<Entity>, PilotError> {
        Ok(self.list(Kind::Vm).await?.entities)
    }

    /// Identifier of the only entity of the kind with this exact name
    pub async fn resolve(&self, kind: Kind, name: &str) -> Result<Uuid, PilotError> {
        self.resolver().resolve(kind, name).await
    }

    /// Identifier of the user the client is authenticated as
    #[instrument(skip(self))]
    pub async fn current_user_uuid(&self) -> Result<Uuid, PilotError> {
        let json = self.repository.get(Kind::User, "me").await?;
        let uuid = json["metadata"]["uuid"]
            .as_str()
            .ok_or_else(|| PilotError::Validation("current user has no uuid".to_string()))?;
        debug!("Authenticated as user {}", uuid);
        parse_uuid(Kind::User, uuid)
    }

    pub async fn get_vm(&self, vm: Uuid) -> Result<Vm, PilotError> {
        self.mutator().read(vm).await
    }

    /// Identifier of the disk the VM boots from
    #[instrument(skip(self), fields(vm = %vm))]
    pub async fn boot_disk_uuid(&self, vm: Uuid) -> Result<Uuid, PilotError> {
        let document = self.get_vm(vm).await?;
        let disks = document.spec.resources.disk_list.unwrap_or_default();
        let disk = boot_disk(&disks).map_err(|_| PilotError::BootDiskNotFound(vm))?;
        let uuid = disk
            .uuid
            .as_deref()
            .ok_or_else(|| PilotError::Validation(format!("boot disk of VM {} has no uuid", vm)))?;
        Uuid::parse_str(uuid).map_err(|e| {
            PilotError::Validation(format!(
                "boot disk uuid {:?} of VM {} is malformed: {}",
                uuid, vm, e
            ))
        })
    }

    /// Adapter and index the disk is plugged on
    pub async fn disk_address(&self, vm: Uuid, disk: Uuid) -> Result<DiskAddress, PilotError> {
        let document = self.get_vm(vm).await?;
        let wanted = disk.to_string();
        let disks = document.spec.resources.disk_list.unwrap_or_default();
        let found = find_unique(disks, |candidate| {
            candidate
                .uuid
                .as_deref()
                .map(|uuid| uuid.eq_ignore_ascii_case(&wanted))
                .unwrap_or(false)
        })
        .map_err(|_| PilotError::DiskNotFound { vm, disk })?;

        found
            .device_properties
            .and_then(|properties| properties.disk_address)
            .ok_or_else(|| PilotError::Validation(format!("disk {} has no address", disk)))
    }

    /// Submit a new VM, returning the uuid of the task creating it
    #[instrument(skip_all, fields(name = %request.spec.name))]
    pub async fn create_vm(&self, request: &VmRequest) -> Result<Uuid, PilotError> {
        let body = serde_json::to_value(request).map_err(RepositoryError::Serialize)?;
        trace!("Create body: {}", body);
        let response = self.repository.create(Kind::Vm, body).await?;
        let task = task_uuid(&response)?;
        info!("Creation of VM {} accepted, task {}", request.spec.name, task);
        Ok(task)
    }

    /// Run a read-modify-write cycle on the VM, see [crate::mutation]
    pub async fn mutate(&self, vm: Uuid, mutation: &Mutation) -> Result<Uuid, PilotError> {
        self.mutator().mutate(vm, mutation).await
    }

    /// Resize a disk to a human readable size such as `"50 GiB"`
    pub async fn resize_disk(&self, vm: Uuid, disk: Uuid, size: &str) -> Result<Uuid, PilotError> {
        let mutation = Mutation::resize_disk(disk, size)?;
        self.mutate(vm, &mutation).await
    }

    pub async fn set_power_state(&self, vm: Uuid, state: PowerState) -> Result<Uuid, PilotError> {
        self.mutate(vm, &Mutation::SetPowerState(state)).await
    }

    pub async fn power_on(&self, vm: Uuid) -> Result<Uuid, PilotError> {
        self.set_power_state(vm, PowerState::On).await
    }

    pub async fn power_off(&self, vm: Uuid) -> Result<Uuid, PilotError> {
        self.set_power_state(vm, PowerState::Off).await
    }

    /// Current state of a task
    pub async fn task(&self, task: Uuid) -> Result<Task, PilotError> {
        Ok(self.task_poller().fetch(task).await?)
    }

    /// Poll the task until it reaches a terminal status or the configured
    /// timeout expires
    pub async fn wait_for_task(&self, task: Uuid) -> TaskOutcome {
        self.task_poller().wait(task).await
    }
}
