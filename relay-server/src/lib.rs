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

pub mod config;
pub mod server;
pub mod vendor;

use std::net::{Ipv4Addr, SocketAddrV4};

use nfdeployment::rpc::nf_deployment_rpc_server::NfDeploymentRpcServer;
use thiserror::Error;
use tonic::{transport::Server, Status};
use tracing::info;

use server::{DeploymentStore, NfDeploymentService};
use vendor::VendorHandler;

#[derive(Error, Debug)]
pub enum Error {
    #[error("kube error: {0}")]
    KubeError(#[source] kube::Error),
    #[error("NFDeployment {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },
    #[error("invalid request: `{0}`")]
    InvalidRequest(String),
    #[error("failed to render vendor configuration: {0}")]
    RenderError(#[source] minijinja::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { .. } => Status::not_found(err.to_string()),
            Error::InvalidRequest(_) => Status::invalid_argument(err.to_string()),
            Error::KubeError(kube::Error::Api(ref response)) if response.code == 403 => {
                Status::permission_denied(err.to_string())
            }
            Error::KubeError(_) => Status::unavailable(err.to_string()),
            Error::RenderError(_) => Status::internal(err.to_string()),
        }
    }
}

pub async fn start<S, V>(addr: Ipv4Addr, port: u16, store: S, vendor: V) -> Result<(), anyhow::Error>
where
    S: DeploymentStore,
    V: VendorHandler,
{
    let service = NfDeploymentService::new(store, vendor);

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<NfDeploymentRpcServer<NfDeploymentService<S, V>>>()
        .await;

    let socket = SocketAddrV4::new(addr, port);
    info!("serving NFDeploymentRPC on {}", socket);

    // TODO: source the listen port from the vendor's Service once the
    // controller publishes it
    Server::builder()
        .add_service(health_service)
        .add_service(NfDeploymentRpcServer::new(service))
        .serve_with_shutdown(socket.into(), async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {}", err);
            }
        })
        .await?;

    info!("relay server stopped");
    Ok(())
}
