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

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::consts::{DEFAULT_PROVIDER, DEFAULT_VENDOR_PORT, DEFAULT_VENDOR_SERVICE};
use crate::{Error, Result};

#[derive(Debug, Parser)]
#[clap(name = "controller", about = "Reconciles NFDeployments against vendor relays")]
pub struct Options {
    /// Relay of a provider, as `<provider>=<service>:<port>`. May be repeated.
    #[clap(long = "provider-endpoint", value_parser = parse_provider_endpoint)]
    pub provider_endpoints: Vec<ProviderEndpoint>,
    /// YAML file with a `providers` map of provider to `{service, port}`
    #[clap(long)]
    pub endpoints_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEndpoint {
    pub provider: String,
    pub endpoint: VendorEndpoint,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VendorEndpoint {
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub port: u16,
}

fn parse_provider_endpoint(arg: &str) -> std::result::Result<ProviderEndpoint, String> {
    let (provider, address) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected <provider>=<service>:<port>, got `{arg}`"))?;
    let (service, port) = address
        .rsplit_once(':')
        .ok_or_else(|| format!("expected <service>:<port>, got `{address}`"))?;
    let port = port
        .parse::<u16>()
        .map_err(|err| format!("invalid port `{port}`: {err}"))?;

    Ok(ProviderEndpoint {
        provider: provider.to_string(),
        endpoint: VendorEndpoint {
            service: service.to_string(),
            port,
        },
    })
}

/// Static mapping of provider identifiers to the relay serving them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderEndpoints {
    #[serde(default)]
    providers: HashMap<String, VendorEndpoint>,
}

impl ProviderEndpoints {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|err| Error::InvalidConfigError(format!("invalid endpoints file: {err}")))
    }

    pub fn insert(&mut self, provider: impl Into<String>, endpoint: VendorEndpoint) {
        self.providers.insert(provider.into(), endpoint);
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Returns the gRPC URL of the provider's relay.
    pub fn url_for(&self, provider: &str) -> Result<String> {
        match self.providers.get(provider) {
            Some(VendorEndpoint { service, port }) if !service.is_empty() && *port != 0 => {
                Ok(format!("http://{service}:{port}"))
            }
            _ => Err(Error::EndpointNotFound(provider.to_string())),
        }
    }
}

impl Options {
    /// Builds the endpoint mapping from the endpoints file, overlaid with the
    /// command line flags. Falls back to the free5gc UPF relay when neither
    /// is given.
    pub fn provider_endpoints(&self) -> Result<ProviderEndpoints> {
        let mut endpoints = match &self.endpoints_file {
            Some(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|err| {
                    Error::InvalidConfigError(format!("reading {}: {err}", path.display()))
                })?;
                ProviderEndpoints::from_yaml(&yaml)?
            }
            None => ProviderEndpoints::default(),
        };

        for arg in &self.provider_endpoints {
            endpoints.insert(arg.provider.clone(), arg.endpoint.clone());
        }

        if endpoints.is_empty() {
            endpoints.insert(
                DEFAULT_PROVIDER,
                VendorEndpoint {
                    service: DEFAULT_VENDOR_SERVICE.to_string(),
                    port: DEFAULT_VENDOR_PORT,
                },
            );
        }

        Ok(endpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_mapping_points_at_free5gc() {
        let opts = Options::parse_from(["controller"]);
        let endpoints = opts.provider_endpoints().unwrap();
        assert_eq!(
            endpoints.url_for("upf.free5gc.io").unwrap(),
            "http://free5gc-upf:50051"
        );
        assert!(matches!(
            endpoints.url_for("smf.free5gc.io"),
            Err(Error::EndpointNotFound(p)) if p == "smf.free5gc.io"
        ));
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "providers:\n  upf.free5gc.io:\n    service: upf-relay\n    port: 9000\n  smf.free5gc.io:\n    service: smf-relay\n    port: 9001"
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let opts = Options::parse_from([
            "controller",
            "--endpoints-file",
            path.as_str(),
            "--provider-endpoint",
            "upf.free5gc.io=upf-relay.nephio.svc:50051",
        ]);
        let endpoints = opts.provider_endpoints().unwrap();

        assert_eq!(
            endpoints.url_for("upf.free5gc.io").unwrap(),
            "http://upf-relay.nephio.svc:50051"
        );
        assert_eq!(
            endpoints.url_for("smf.free5gc.io").unwrap(),
            "http://smf-relay:9001"
        );
    }

    #[test]
    fn empty_service_or_port_is_not_an_endpoint() {
        let endpoints = ProviderEndpoints::from_yaml(
            "providers:\n  a.example.com:\n    port: 50051\n  b.example.com:\n    service: relay-b\n",
        )
        .unwrap();
        assert!(matches!(
            endpoints.url_for("a.example.com"),
            Err(Error::EndpointNotFound(_))
        ));
        assert!(matches!(
            endpoints.url_for("b.example.com"),
            Err(Error::EndpointNotFound(_))
        ));
    }

    #[test]
    fn rejects_malformed_flag() {
        assert!(parse_provider_endpoint("upf.free5gc.io").is_err());
        assert!(parse_provider_endpoint("upf.free5gc.io=free5gc-upf").is_err());
        assert!(parse_provider_endpoint("upf.free5gc.io=free5gc-upf:http").is_err());
        assert_eq!(
            parse_provider_endpoint("upf.free5gc.io=free5gc-upf:50051").unwrap(),
            ProviderEndpoint {
                provider: "upf.free5gc.io".to_string(),
                endpoint: VendorEndpoint {
                    service: "free5gc-upf".to_string(),
                    port: 50051,
                },
            }
        );
    }
}
