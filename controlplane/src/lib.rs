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

use std::sync::Arc;

use kube::Client;
use thiserror::Error;

pub use nfdeployment_controller::controller as nfdeployment_controller;

pub mod client_manager;
pub mod config;
pub mod consts;
mod nfdeployment_controller;
pub mod traits;
mod utils;

use client_manager::VendorClientManager;

// Context for our reconciler
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client
    pub client: Client,
    /// Per-provider clients of the vendor relays
    pub vendors: Arc<VendorClientManager>,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("kube error: {0}")]
    KubeError(#[source] kube::Error),
    #[error("invalid configuration: `{0}`")]
    InvalidConfigError(String),
    #[error("error querying NFDeployment CRD: `{0}`; is the CRD installed?")]
    CRDNotFoundError(#[source] kube::Error),
    #[error("service name and gRPC port for provider `{0}` not found")]
    EndpointNotFound(String),
    #[error("failed to connect to vendor relay: {0}")]
    TransportError(#[source] tonic::transport::Error),
    #[error("vendor relay returned an error: {0}")]
    RpcError(#[source] tonic::Status),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
