pub mod device_properties;
pub use self::device_properties::{DeviceProperties, DeviceType};
pub mod disk;
pub use self::disk::Disk;
pub mod disk_address;
pub use self::disk_address::{AdapterType, DiskAddress};
pub mod entity;
pub use self::entity::{Entity, EntityMetadata, EntitySpec};
pub mod entity_list;
pub use self::entity_list::{EntityList, ListMetadata};
pub mod guest_customization;
pub use self::guest_customization::{CloudInit, GuestCustomization};
pub mod guest_tools;
pub use self::guest_tools::{GuestTools, NutanixGuestTools};
pub mod intent_response;
pub use self::intent_response::{ExecutionContext, IntentResponse, IntentStatus};
pub mod ip_endpoint;
pub use self::ip_endpoint::{IpEndpoint, IpType};
pub mod list_request;
pub use self::list_request::ListRequest;
pub mod nic;
pub use self::nic::Nic;
pub mod reference;
pub use self::reference::Reference;
pub mod task;
pub use self::task::{Task, TaskStatus};
pub mod vm;
pub use self::vm::Vm;
pub mod vm_metadata;
pub use self::vm_metadata::VmMetadata;
pub mod vm_request;
pub use self::vm_request::VmRequest;
pub mod vm_resources;
pub use self::vm_resources::VmResources;
pub mod vm_spec;
pub use self::vm_spec::VmSpec;

/// Fields of a document that no model names explicitly.
///
/// They are carried through deserialization and serialization untouched.
pub type Extra = serde_json::Map<String, serde_json::Value>;
