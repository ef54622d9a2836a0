//! # Network Configuration of a new VM
//!
//! A VM is attached to a single subnet and gets its address in one of three
//! ways, see [NetworkConfiguration]. Each one needs a different pairing of
//! cloud-init user-data and NIC endpoint description, which [render]
//! produces.
//!
//! User-data is always returned base64 encoded, as the backend expects it.
//! For static configuration the netplan document is itself base64 encoded
//! and carried as one field of the cloud-init document, so the guest
//! receives two layers of encoding.
use std::net::IpAddr;

use askama::Template;
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{debug, trace};

use crate::builder::BuilderError;
use prismpilot_models::models::{IpEndpoint, IpType};

/// How the VM gets its address
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NetworkConfiguration {
    /// Address assigned dynamically by the backend, managed networks only.
    #[default]
    Automatic,
    /// Single static address, mask and gateway are taken from the subnet
    /// definition. Managed networks only: the backend refuses to assign an
    /// address on an unmanaged one.
    AssignedSimple(String),
    /// Full static configuration pushed into the guest through cloud-init,
    /// for networks the backend does not manage.
    AssignedStatic(StaticNetwork),
}

/// Complete static addressing of one interface, built through
/// [crate::builder::static_network::StaticNetworkBuilder]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticNetwork {
    pub(crate) ip_address: String,
    /// Prefix length of the subnet, e.g. `24`
    pub(crate) prefix: String,
    pub(crate) default_gw: String,
    pub(crate) dns_server1: String,
    pub(crate) dns_server2: String,
    pub(crate) dns_search: String,
}

fn parse_address(key: &str, value: &str) -> Result<IpAddr, BuilderError> {
    value
        .trim()
        .parse::<IpAddr>()
        .map_err(|e| BuilderError::InvalidField(key.to_string(), e.to_string()))
}

impl StaticNetwork {
    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn default_gw(&self) -> &str {
        &self.default_gw
    }

    pub fn dns_server1(&self) -> &str {
        &self.dns_server1
    }

    pub fn dns_server2(&self) -> &str {
        &self.dns_server2
    }

    pub fn dns_search(&self) -> &str {
        &self.dns_search
    }

    /// Check that every field is present and usable, returning the address
    /// of the interface.
    pub(crate) fn validate(&self) -> Result<IpAddr, BuilderError> {
        let fields = [
            (stringify!(self.ip_address), &self.ip_address),
            (stringify!(self.prefix), &self.prefix),
            (stringify!(self.default_gw), &self.default_gw),
            (stringify!(self.dns_server1), &self.dns_server1),
            (stringify!(self.dns_server2), &self.dns_server2),
            (stringify!(self.dns_search), &self.dns_search),
        ];
        if let Some((key, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(BuilderError::MissingRequiredField(key.to_string()));
        }

        let address = parse_address(stringify!(self.ip_address), &self.ip_address)?;
        let gateway = parse_address(stringify!(self.default_gw), &self.default_gw)?;
        parse_address(stringify!(self.dns_server1), &self.dns_server1)?;
        parse_address(stringify!(self.dns_server2), &self.dns_server2)?;

        if address.is_ipv4() != gateway.is_ipv4() {
            return Err(BuilderError::InvalidField(
                stringify!(self.default_gw).to_string(),
                format!("gateway {} and address {} are of different families", gateway, address),
            ));
        }

        let max_prefix = if address.is_ipv4() { 32 } else { 128 };
        match self.prefix.trim().parse::<u8>() {
            Ok(prefix) if prefix <= max_prefix => Ok(address),
            _ => Err(BuilderError::InvalidField(
                stringify!(self.prefix).to_string(),
                format!("expected a prefix length between 0 and {}", max_prefix),
            )),
        }
    }
}

/// Output of [render], ready to be placed into a VM spec
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedNetwork {
    /// Base64 encoded cloud-init document
    pub user_data: String,
    pub ip_endpoints: Vec<IpEndpoint>,
}

#[derive(Template)]
#[template(path = "cloud-init.yaml", escape = "none")]
struct ManagedCloudInit;

#[derive(Template)]
#[template(path = "cloud-init-net.yaml", escape = "none")]
struct UnmanagedCloudInit<'a> {
    netplan_content: &'a str,
}

#[derive(Template)]
#[template(path = "static.yaml", escape = "none")]
struct Netplan<'a> {
    ipv6: bool,
    ip_address: &'a str,
    prefix: &'a str,
    default_gw: &'a str,
    dns_server1: &'a str,
    dns_server2: &'a str,
    dns_search: &'a str,
}

fn render_template<T: Template>(template: &T) -> Result<String, BuilderError> {
    template
        .render()
        .map_err(|e| BuilderError::Render(e.to_string()))
}

/// Build the user-data and NIC endpoints matching the configuration.
pub fn render(config: &NetworkConfiguration) -> Result<RenderedNetwork, BuilderError> {
    match config {
        NetworkConfiguration::Automatic => {
            debug!("Render network configuration for DHCP");
            Ok(RenderedNetwork {
                user_data: managed_user_data()?,
                ip_endpoints: vec![IpEndpoint::new(IpType::Dhcp)],
            })
        }
        NetworkConfiguration::AssignedSimple(ip) => {
            debug!("Render network configuration for assigned address {}", ip);
            let endpoint = IpEndpoint {
                ip: Some(ip.clone()),
                ..IpEndpoint::new(IpType::Assigned)
            };
            Ok(RenderedNetwork {
                user_data: managed_user_data()?,
                ip_endpoints: vec![endpoint],
            })
        }
        NetworkConfiguration::AssignedStatic(network) => {
            debug!(
                "Render static network configuration for {}/{}",
                network.ip_address, network.prefix
            );
            Ok(RenderedNetwork {
                user_data: unmanaged_user_data(network)?,
                ip_endpoints: vec![IpEndpoint::new(IpType::Assigned)],
            })
        }
    }
}

fn managed_user_data() -> Result<String, BuilderError> {
    let document = render_template(&ManagedCloudInit)?;
    trace!("Managed cloud-init document: {}", document);
    Ok(STANDARD.encode(document))
}

fn unmanaged_user_data(network: &StaticNetwork) -> Result<String, BuilderError> {
    let address = network.validate()?;
    let netplan = render_template(&Netplan {
        ipv6: address.is_ipv6(),
        ip_address: &network.ip_address,
        prefix: &network.prefix,
        default_gw: &network.default_gw,
        dns_server1: &network.dns_server1,
        dns_server2: &network.dns_server2,
        dns_search: &network.dns_search,
    })?;
    trace!("Netplan document: {}", netplan);

    let netplan_content = STANDARD.encode(netplan);
    let document = render_template(&UnmanagedCloudInit {
        netplan_content: &netplan_content,
    })?;
    trace!("Unmanaged cloud-init document: {}", document);
    Ok(STANDARD.encode(document))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_yaml::Value;

    use super::*;
    use crate::builder::{static_network::StaticNetworkBuilder, Builder};

    fn decode(encoded: &str) -> String {
        String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap()
    }

    fn static_network() -> StaticNetwork {
        StaticNetworkBuilder::new()
            .with_ip_address("10.0.0.5".to_string())
            .with_prefix("24".to_string())
            .with_default_gw("10.0.0.1".to_string())
            .with_dns_server1("8.8.8.8".to_string())
            .with_dns_server2("8.8.4.4".to_string())
            .with_dns_search("example.com".to_string())
            .try_build()
            .unwrap()
    }

    #[test]
    fn automatic_uses_dhcp() {
        let rendered = render(&NetworkConfiguration::Automatic).unwrap();
        assert_eq!(rendered.ip_endpoints, vec![IpEndpoint::new(IpType::Dhcp)]);
        let document = decode(&rendered.user_data);
        assert!(document.starts_with("#cloud-config"));
        assert!(!document.contains("netplan"));
    }

    #[test]
    fn assigned_simple_carries_the_address() {
        let config = NetworkConfiguration::AssignedSimple("192.168.1.20".to_string());
        let rendered = render(&config).unwrap();
        assert_eq!(rendered.ip_endpoints.len(), 1);
        assert_eq!(rendered.ip_endpoints[0].ip.as_deref(), Some("192.168.1.20"));
        assert_eq!(rendered.ip_endpoints[0].ip_type, Some(IpType::Assigned));
        assert!(!decode(&rendered.user_data).contains("netplan"));
    }

    #[test]
    fn assigned_static_rejects_blank_fields() {
        let network = StaticNetwork {
            prefix: String::new(),
            default_gw: " ".to_string(),
            dns_search: String::new(),
            ..static_network()
        };
        let result = render(&NetworkConfiguration::AssignedStatic(network));
        assert_eq!(
            result.unwrap_err(),
            BuilderError::MissingRequiredField("self.prefix".to_string())
        );
    }

    #[test]
    fn assigned_static_rejects_unparsable_gateway() {
        let network = StaticNetwork {
            default_gw: "gateway".to_string(),
            ..static_network()
        };
        let result = render(&NetworkConfiguration::AssignedStatic(network));
        assert!(
            matches!(result, Err(BuilderError::InvalidField(field, _)) if field == "self.default_gw")
        );
    }

    #[test]
    fn ipv6_static_uses_gateway6() {
        let network = StaticNetworkBuilder::new()
            .with_ip_address("2001:db8::5".to_string())
            .with_prefix("64".to_string())
            .with_default_gw("2001:db8::1".to_string())
            .with_dns_server1("2001:4860:4860::8888".to_string())
            .with_dns_server2("2001:4860:4860::8844".to_string())
            .with_dns_search("example.com".to_string())
            .try_build()
            .unwrap();
        let rendered = render(&NetworkConfiguration::AssignedStatic(network)).unwrap();

        let cloud_init: Value = serde_yaml::from_str(&decode(&rendered.user_data)).unwrap();
        let content = cloud_init["write_files"][0]["content"].as_str().unwrap();
        let netplan: Value = serde_yaml::from_str(&decode(content)).unwrap();
        let iface = &netplan["network"]["ethernets"]["primary"];
        assert_eq!(iface["addresses"][0], "2001:db8::5/64");
        assert_eq!(iface["gateway6"], "2001:db8::1");
        assert!(iface.get("gateway4").is_none());
    }

    #[test]
    fn assigned_static_has_no_endpoint_address() {
        let rendered = render(&NetworkConfiguration::AssignedStatic(static_network())).unwrap();
        assert_eq!(rendered.ip_endpoints, vec![IpEndpoint::new(IpType::Assigned)]);
    }

    #[test]
    fn assigned_static_survives_both_encoding_layers() {
        let rendered = render(&NetworkConfiguration::AssignedStatic(static_network())).unwrap();

        let cloud_init: Value = serde_yaml::from_str(&decode(&rendered.user_data)).unwrap();
        let file = &cloud_init["write_files"][0];
        assert_eq!(file["path"], "/etc/netplan/50-cloud-init.yaml");
        assert_eq!(file["encoding"], "b64");

        let content = file["content"].as_str().unwrap();
        let netplan: Value = serde_yaml::from_str(&decode(content)).unwrap();
        let iface = &netplan["network"]["ethernets"]["primary"];
        assert_eq!(iface["addresses"][0], "10.0.0.5/24");
        assert_eq!(iface["gateway4"], "10.0.0.1");
        assert!(iface.get("gateway6").is_none());
        assert_eq!(iface["nameservers"]["addresses"][0], "8.8.8.8");
        assert_eq!(iface["nameservers"]["addresses"][1], "8.8.4.4");
        assert_eq!(iface["nameservers"]["search"][0], "example.com");
    }
}
