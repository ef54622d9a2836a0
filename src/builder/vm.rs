use uuid::Uuid;

use crate::{
    builder::{assert_not_none, Builder, BuilderError},
    network::{render, NetworkConfiguration},
    repository::Kind,
    size::parse_size,
};
use prismpilot_models::models::{
    AdapterType, CloudInit, DeviceProperties, DeviceType, Disk, DiskAddress, GuestCustomization,
    GuestTools, Nic, NutanixGuestTools, Reference, VmMetadata, VmRequest, VmResources, VmSpec,
};

const DEFAULT_NUM_SOCKETS: u32 = 1;
const DEFAULT_NUM_VCPUS_PER_SOCKET: u32 = 1;
const DEFAULT_NUM_THREADS_PER_CORE: u32 = 1;
const DEFAULT_MEMORY_SIZE_MIB: u64 = 1024;

/// Builder of a VM creation request
///
/// The boot disk is cloned from the image and an empty CD-ROM is attached
/// next to it. The VM gets a single NIC on the subnet, addressed according
/// to the [NetworkConfiguration].
#[derive(Debug)]
pub struct VmBuilder {
    name: String,
    description: String,
    cluster: Option<Uuid>,
    project: Option<Uuid>,
    owner: Option<Uuid>,
    image: Option<Uuid>,
    subnet: Option<Uuid>,
    num_sockets: u32,
    num_vcpus_per_socket: u32,
    num_threads_per_core: u32,
    memory_size_mib: u64,
    boot_disk_size: Option<String>,
    network: NetworkConfiguration,
}

impl VmBuilder {
    pub fn new(name: String) -> VmBuilder {
        VmBuilder {
            name,
            description: String::new(),
            cluster: None,
            project: None,
            owner: None,
            image: None,
            subnet: None,
            num_sockets: DEFAULT_NUM_SOCKETS,
            num_vcpus_per_socket: DEFAULT_NUM_VCPUS_PER_SOCKET,
            num_threads_per_core: DEFAULT_NUM_THREADS_PER_CORE,
            memory_size_mib: DEFAULT_MEMORY_SIZE_MIB,
            boot_disk_size: None,
            network: NetworkConfiguration::default(),
        }
    }

    pub fn with_description(mut self, description: String) -> VmBuilder {
        self.description = description;
        self
    }

    pub fn with_cluster(mut self, cluster: Uuid) -> VmBuilder {
        self.cluster = Some(cluster);
        self
    }

    pub fn with_project(mut self, project: Uuid) -> VmBuilder {
        self.project = Some(project);
        self
    }

    /// User owning the VM, see [crate::client::PrismClient::current_user_uuid]
    pub fn with_owner(mut self, owner: Uuid) -> VmBuilder {
        self.owner = Some(owner);
        self
    }

    /// Image the boot disk is cloned from
    pub fn with_image(mut self, image: Uuid) -> VmBuilder {
        self.image = Some(image);
        self
    }

    pub fn with_subnet(mut self, subnet: Uuid) -> VmBuilder {
        self.subnet = Some(subnet);
        self
    }

    pub fn with_num_sockets(mut self, num_sockets: u32) -> VmBuilder {
        self.num_sockets = num_sockets;
        self
    }

    pub fn with_num_vcpus_per_socket(mut self, num_vcpus_per_socket: u32) -> VmBuilder {
        self.num_vcpus_per_socket = num_vcpus_per_socket;
        self
    }

    pub fn with_num_threads_per_core(mut self, num_threads_per_core: u32) -> VmBuilder {
        self.num_threads_per_core = num_threads_per_core;
        self
    }

    pub fn with_memory_size_mib(mut self, memory_size_mib: u64) -> VmBuilder {
        self.memory_size_mib = memory_size_mib;
        self
    }

    /// Size of the boot disk, e.g. `"50 GiB"`. The image size is kept when
    /// unset.
    pub fn with_boot_disk_size(mut self, size: String) -> VmBuilder {
        self.boot_disk_size = Some(size);
        self
    }

    pub fn with_network(mut self, network: NetworkConfiguration) -> VmBuilder {
        self.network = network;
        self
    }
}

fn reference(kind: Kind, uuid: Option<Uuid>) -> Option<Reference> {
    uuid.map(|uuid| Reference::new(kind.as_str().to_string(), uuid.to_string()))
}

impl Builder<VmRequest> for VmBuilder {
    fn try_build(self) -> Result<VmRequest, BuilderError> {
        if self.name.trim().is_empty() {
            return Err(BuilderError::MissingRequiredField(
                stringify!(self.name).to_string(),
            ));
        }
        assert_not_none(stringify!(self.cluster), &self.cluster)?;
        assert_not_none(stringify!(self.project), &self.project)?;
        assert_not_none(stringify!(self.owner), &self.owner)?;
        assert_not_none(stringify!(self.image), &self.image)?;
        assert_not_none(stringify!(self.subnet), &self.subnet)?;

        let boot_disk_size = self
            .boot_disk_size
            .as_deref()
            .map(parse_size)
            .transpose()?;
        let network = render(&self.network)?;

        let boot_disk = Disk {
            disk_size_bytes: boot_disk_size,
            data_source_reference: reference(Kind::Image, self.image),
            ..Disk::new(DeviceProperties::new(
                DeviceType::Disk,
                DiskAddress::new(AdapterType::Scsi, 0),
            ))
        };
        let cdrom = Disk::new(DeviceProperties::new(
            DeviceType::Cdrom,
            DiskAddress::new(AdapterType::Ide, 1),
        ));

        let nic = Nic {
            nic_type: Some("NORMAL_NIC".to_string()),
            is_connected: Some(true),
            subnet_reference: reference(Kind::Subnet, self.subnet),
            ip_endpoint_list: Some(network.ip_endpoints),
            ..Default::default()
        };

        let resources = VmResources {
            num_sockets: Some(self.num_sockets),
            num_vcpus_per_socket: Some(self.num_vcpus_per_socket),
            num_threads_per_core: Some(self.num_threads_per_core),
            memory_size_mib: Some(self.memory_size_mib),
            disk_list: Some(vec![boot_disk, cdrom]),
            nic_list: Some(vec![nic]),
            guest_tools: Some(GuestTools {
                nutanix_guest_tools: Some(NutanixGuestTools {
                    state: Some("ENABLED".to_string()),
                    iso_mount_state: Some("MOUNTED".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            guest_customization: Some(GuestCustomization {
                cloud_init: Some(CloudInit {
                    user_data: Some(network.user_data),
                    ..Default::default()
                }),
                is_overridable: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };

        let spec = VmSpec {
            description: Some(self.description),
            cluster_reference: reference(Kind::Cluster, self.cluster),
            ..VmSpec::new(self.name.clone(), resources)
        };
        let metadata = VmMetadata {
            name: Some(self.name),
            project_reference: reference(Kind::Project, self.project),
            owner_reference: reference(Kind::User, self.owner),
            ..VmMetadata::new(Kind::Vm.as_str().to_string())
        };
        Ok(VmRequest::new(spec, metadata))
    }
}
