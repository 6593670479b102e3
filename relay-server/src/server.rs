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

use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Client, ResourceExt};
use tonic::{Request, Response, Status};
use tracing::{error, info};

use nfdeployment::rpc::nf_deployment_rpc_server::NfDeploymentRpc;
use nfdeployment::rpc::{ConfigurationArtifact, NfDeploymentRef, NfDeploymentResponse};
use nfdeployment::NFDeployment;

use crate::vendor::VendorHandler;
use crate::{Error, Result};

/// Read access to NFDeployments by key.
#[tonic::async_trait]
pub trait DeploymentStore: Send + Sync + 'static {
    async fn get(&self, namespace: &str, name: &str) -> Result<NFDeployment>;
}

pub struct KubeDeploymentStore {
    client: Client,
}

impl KubeDeploymentStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[tonic::async_trait]
impl DeploymentStore for KubeDeploymentStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<NFDeployment> {
        let api: Api<NFDeployment> = Api::namespaced(self.client.clone(), namespace);
        match api.get(name).await {
            Ok(nfdeployment) => Ok(nfdeployment),
            Err(kube::Error::Api(response)) if response.code == 404 => Err(Error::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(err) => Err(Error::KubeError(err)),
        }
    }
}

pub struct NfDeploymentService<S, V> {
    store: S,
    vendor: V,
}

impl<S: DeploymentStore, V: VendorHandler> NfDeploymentService<S, V> {
    pub fn new(store: S, vendor: V) -> Self {
        Self { store, vendor }
    }

    async fn resolve(&self, reference: &NfDeploymentRef) -> Result<NFDeployment> {
        if reference.name.is_empty() || reference.namespace.is_empty() {
            return Err(Error::InvalidRequest(
                "NFDeployment reference needs a name and a namespace".to_string(),
            ));
        }
        self.store.get(&reference.namespace, &reference.name).await
    }
}

fn artifact_from(config_map: ConfigMap) -> ConfigurationArtifact {
    ConfigurationArtifact {
        name: config_map.name_any(),
        namespace: config_map.namespace().unwrap_or_default(),
        data: config_map.data.unwrap_or_default().into_iter().collect(),
    }
}

#[tonic::async_trait]
impl<S: DeploymentStore, V: VendorHandler> NfDeploymentRpc for NfDeploymentService<S, V> {
    async fn create_update(
        &self,
        request: Request<NfDeploymentRef>,
    ) -> Result<Response<NfDeploymentResponse>, Status> {
        let reference = request.into_inner();

        let nfdeployment = self.resolve(&reference).await.map_err(|err| {
            error!("failed to get NFDeployment: {}", err);
            Status::from(err)
        })?;

        let config_map = self.vendor.create_update(&nfdeployment).map_err(|err| {
            error!("CreateUpdate failed: {}", err);
            Status::from(err)
        })?;

        info!(
            "CreateUpdate handled for {}/{}",
            reference.namespace, reference.name
        );
        Ok(Response::new(NfDeploymentResponse {
            message: format!(
                "success, NFDeployment {}/{} was configured",
                reference.namespace, reference.name
            ),
            artifact: Some(artifact_from(config_map)),
        }))
    }

    async fn delete(
        &self,
        request: Request<NfDeploymentRef>,
    ) -> Result<Response<NfDeploymentResponse>, Status> {
        let reference = request.into_inner();

        let nfdeployment = self.resolve(&reference).await.map_err(|err| {
            error!("failed to get NFDeployment: {}", err);
            Status::from(err)
        })?;

        self.vendor.delete(&nfdeployment).map_err(|err| {
            error!("Delete failed: {}", err);
            Status::from(err)
        })?;

        info!("Delete handled for {}/{}", reference.namespace, reference.name);
        Ok(Response::new(NfDeploymentResponse {
            message: format!(
                "success, NFDeployment {}/{} was deleted",
                reference.namespace, reference.name
            ),
            artifact: None,
        }))
    }
}
