use crate::{
    builder::{assert_not_blank, Builder, BuilderError},
    network::StaticNetwork,
};

#[derive(Debug, Default)]
pub struct StaticNetworkBuilder {
    ip_address: Option<String>,
    prefix: Option<String>,
    default_gw: Option<String>,
    dns_server1: Option<String>,
    dns_server2: Option<String>,
    dns_search: Option<String>,
}

impl StaticNetworkBuilder {
    pub fn new() -> StaticNetworkBuilder {
        StaticNetworkBuilder::default()
    }

    pub fn with_ip_address(mut self, ip_address: String) -> StaticNetworkBuilder {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn with_prefix(mut self, prefix: String) -> StaticNetworkBuilder {
        self.prefix = Some(prefix);
        self
    }

    pub fn with_default_gw(mut self, default_gw: String) -> StaticNetworkBuilder {
        self.default_gw = Some(default_gw);
        self
    }

    pub fn with_dns_server1(mut self, dns_server1: String) -> StaticNetworkBuilder {
        self.dns_server1 = Some(dns_server1);
        self
    }

    pub fn with_dns_server2(mut self, dns_server2: String) -> StaticNetworkBuilder {
        self.dns_server2 = Some(dns_server2);
        self
    }

    pub fn with_dns_search(mut self, dns_search: String) -> StaticNetworkBuilder {
        self.dns_search = Some(dns_search);
        self
    }
}

impl Builder<StaticNetwork> for StaticNetworkBuilder {
    fn try_build(self) -> Result<StaticNetwork, BuilderError> {
        assert_not_blank(stringify!(self.ip_address), &self.ip_address)?;
        assert_not_blank(stringify!(self.prefix), &self.prefix)?;
        assert_not_blank(stringify!(self.default_gw), &self.default_gw)?;
        assert_not_blank(stringify!(self.dns_server1), &self.dns_server1)?;
        assert_not_blank(stringify!(self.dns_server2), &self.dns_server2)?;
        assert_not_blank(stringify!(self.dns_search), &self.dns_search)?;

        let network = StaticNetwork {
            ip_address: self.ip_address.unwrap_or_default().trim().to_string(),
            prefix: self.prefix.unwrap_or_default().trim().to_string(),
            default_gw: self.default_gw.unwrap_or_default().trim().to_string(),
            dns_server1: self.dns_server1.unwrap_or_default().trim().to_string(),
            dns_server2: self.dns_server2.unwrap_or_default().trim().to_string(),
            dns_search: self.dns_search.unwrap_or_default().trim().to_string(),
        };

        network.validate()?;
        Ok(network)
    }
}
