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

//! NFDeployment API types and the gRPC contract shared by the controller and
//! the vendor relay servers.

pub mod crd;
pub mod interfaces;

#[allow(clippy::all)]
pub mod rpc {
    tonic::include_proto!("nfdeploymentrpc");
}

pub use crd::{InterfaceConfig, IpConfig, NFDeployment, NFDeploymentSpec};

use kube::{Resource, ResourceExt};

impl From<&NFDeployment> for rpc::NfDeploymentRef {
    fn from(nfdeployment: &NFDeployment) -> Self {
        rpc::NfDeploymentRef {
            api_version: NFDeployment::api_version(&()).to_string(),
            name: nfdeployment.name_any(),
            namespace: nfdeployment.namespace().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_carries_key_and_api_version() {
        let mut nfd = NFDeployment::new("upf1", NFDeploymentSpec::default());
        nfd.metadata.namespace = Some("ns1".to_string());

        let reference = rpc::NfDeploymentRef::from(&nfd);
        assert_eq!(reference.name, "upf1");
        assert_eq!(reference.namespace, "ns1");
        assert_eq!(reference.api_version, "workload.nephio.org/v1alpha1");
    }
}
