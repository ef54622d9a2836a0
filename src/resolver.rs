//! # Name Resolution
//!
//! Names are mutable and not unique on the backend, identifiers are. Every
//! lookup in this crate therefore goes through [find_unique], which either
//! returns the single match or tells why there is none. A name shared by
//! several entities is a legitimate backend state and is reported as such,
//! never resolved to an arbitrary one of them.
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::{
    client::PilotError,
    repository::{Kind, Repository},
};
use prismpilot_models::models::{AdapterType, DeviceType, Disk, EntityList, ListRequest};

/// Why [find_unique] did not return a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    Missing,
    /// Number of items that matched
    Multiple(usize),
}

/// Return the only item satisfying `predicate`.
pub fn find_unique<I, P>(items: I, mut predicate: P) -> Result<I::Item, MatchError>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    let mut matches = items.into_iter().filter(|item| predicate(item));
    let found = matches.next().ok_or(MatchError::Missing)?;
    match matches.count() {
        0 => Ok(found),
        others => Err(MatchError::Multiple(others + 1)),
    }
}

/// Whether the disk is the one the VM boots from: first disk on the SCSI
/// adapter.
pub fn is_boot_disk(disk: &Disk) -> bool {
    disk.device_properties
        .as_ref()
        .map(|properties| {
            properties.device_type == Some(DeviceType::Disk)
                && properties
                    .disk_address
                    .as_ref()
                    .map(|address| {
                        address.device_index == 0 && address.adapter_type == AdapterType::Scsi
                    })
                    .unwrap_or(false)
        })
        .unwrap_or(false)
}

/// Find the boot disk among the disks of a VM.
pub fn boot_disk(disks: &[Disk]) -> Result<&Disk, MatchError> {
    find_unique(disks, |disk| is_boot_disk(disk))
}

pub(crate) fn parse_uuid(kind: Kind, raw: &str) -> Result<Uuid, PilotError> {
    Uuid::parse_str(raw)
        .map_err(|e| PilotError::Validation(format!("{} uuid {:?} is malformed: {}", kind, raw, e)))
}

/// Resolves entity names against a repository
#[derive(Debug)]
pub struct Resolver<'a, R: Repository> {
    repository: &'a R,
    /// Page size of the listing the name is searched in
    max_results: u32,
}

impl<'a, R: Repository> Resolver<'a, R> {
    pub fn new(repository: &'a R, max_results: u32) -> Resolver<'a, R> {
        Resolver {
            repository,
            max_results,
        }
    }

    /// List every entity of the kind, within the page size limit.
    #[instrument(skip(self))]
    pub async fn list(&self, kind: Kind) -> Result<EntityList, PilotError> {
        let request = ListRequest::new(kind.as_str().to_string(), self.max_results);
        let list = self.repository.list(kind, &request).await?;
        debug!("Listed {} {} entities", list.entities.len(), kind);

        let total = list
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.total_matches)
            .unwrap_or(0) as usize;
        if total > list.entities.len() {
            warn!(
                "Listing of {} is truncated: {} returned out of {}",
                kind,
                list.entities.len(),
                total
            );
        }
        Ok(list)
    }

    /// Identifier of the only entity of the kind with this exact name.
    #[instrument(skip(self))]
    pub async fn resolve(&self, kind: Kind, name: &str) -> Result<Uuid, PilotError> {
        let list = self.list(kind).await?;
        let entity = find_unique(&list.entities, |entity| entity.name() == Some(name)).map_err(
            |e| match e {
                MatchError::Missing => PilotError::NotFound {
                    kind,
                    name: name.to_string(),
                },
                MatchError::Multiple(count) => PilotError::Ambiguous {
                    kind,
                    name: name.to_string(),
                    count,
                },
            },
        )?;
        debug!("Resolved {} {:?} to {}", kind, name, entity.metadata.uuid);
        parse_uuid(kind, &entity.metadata.uuid)
    }
}
