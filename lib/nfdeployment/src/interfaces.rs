/*
Copyright 2024 The Nephio Authors.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use thiserror::Error;

use crate::crd::InterfaceConfig;

#[derive(Error, Debug, PartialEq)]
pub enum InterfaceError {
    #[error("no interface named `{0}` with an IPv4 configuration")]
    NotFound(String),
    #[error("interface `{name}` has an invalid IPv4 address `{address}`")]
    InvalidAddress { name: String, address: String },
}

/// IPv4 settings of a single interface, as used to build vendor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Ipv4InterfaceConfig {
    /// host address without its prefix length
    pub address: Ipv4Addr,
    /// gateway, empty when the interface has none
    pub gateway: String,
    /// network the address belongs to, e.g. `10.1.1.0/24`
    pub network: Ipv4Net,
}

impl Ipv4InterfaceConfig {
    /// Prefix length of the network, as the text after "/" in its string form.
    pub fn cidr(&self) -> String {
        let network = self.network.to_string();
        cidr_suffix(&network).unwrap_or_default().to_string()
    }
}

// Returns the part of a network string after "/", e.g. "24" for "10.0.0.0/24".
pub fn cidr_suffix(network: &str) -> Option<&str> {
    network.split_once('/').map(|(_, suffix)| suffix)
}

/// Looks up the first interface called `name` that carries an IPv4 config.
pub fn first_interface_config_ipv4(
    interfaces: &[InterfaceConfig],
    name: &str,
) -> Result<Ipv4InterfaceConfig, InterfaceError> {
    let (iface, ipv4) = interfaces
        .iter()
        .filter(|iface| iface.name == name)
        .find_map(|iface| iface.ipv4.as_ref().map(|ipv4| (iface, ipv4)))
        .ok_or_else(|| InterfaceError::NotFound(name.to_string()))?;

    let net: Ipv4Net = ipv4
        .address
        .parse()
        .map_err(|_| InterfaceError::InvalidAddress {
            name: iface.name.clone(),
            address: ipv4.address.clone(),
        })?;

    Ok(Ipv4InterfaceConfig {
        address: net.addr(),
        gateway: ipv4.gateway.clone().unwrap_or_default(),
        network: net.trunc(),
    })
}
