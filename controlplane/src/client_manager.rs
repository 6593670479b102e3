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
use std::future::Future;
use std::sync::Arc;

use kube::ResourceExt;
use nfdeployment::rpc::nf_deployment_rpc_client::NfDeploymentRpcClient;
use nfdeployment::rpc::NfDeploymentRef;
use nfdeployment::NFDeployment;
use tokio::sync::{OnceCell, RwLock};
use tonic::transport::{Channel, Endpoint};
use tonic::Request;
use tracing::*;

use crate::config::ProviderEndpoints;
use crate::consts::VENDOR_RPC_TIMEOUT;
use crate::traits::VendorDispatch;
use crate::{Error, Result};

/// Lazily populated map of per-key clients.
///
/// Concurrent callers asking for the same missing key share a single
/// connect attempt. A failed attempt leaves the key empty so that the next
/// caller tries again. Entries are never evicted.
pub struct ClientCache<T> {
    clients: RwLock<HashMap<String, Arc<OnceCell<T>>>>,
}

impl<T> Default for ClientCache<T> {
    fn default() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone> ClientCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_try_connect<F, Fut>(&self, key: &str, connect: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cell = self.cell(key).await;
        cell.get_or_try_init(connect).await.cloned()
    }

    async fn cell(&self, key: &str) -> Arc<OnceCell<T>> {
        if let Some(cell) = self.clients.read().await.get(key) {
            return cell.clone();
        }
        self.clients
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Number of keys with a connected client.
    #[cfg(test)]
    async fn connected(&self) -> usize {
        self.clients
            .read()
            .await
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}

/// Dispatches NFDeployment events to the relay serving their provider.
pub struct VendorClientManager {
    endpoints: ProviderEndpoints,
    clients: ClientCache<NfDeploymentRpcClient<Channel>>,
}

impl VendorClientManager {
    pub fn new(endpoints: ProviderEndpoints) -> Self {
        Self {
            endpoints,
            clients: ClientCache::new(),
        }
    }

    pub async fn client_for(&self, provider: &str) -> Result<NfDeploymentRpcClient<Channel>> {
        self.clients
            .get_or_try_connect(provider, move || async move {
                let url = self.endpoints.url_for(provider)?;
                let channel = Endpoint::from_shared(url.clone())
                    .map_err(Error::TransportError)?
                    .timeout(VENDOR_RPC_TIMEOUT)
                    .connect()
                    .await
                    .map_err(Error::TransportError)?;
                info!("connected to vendor relay {} for provider {}", url, provider);
                Ok(NfDeploymentRpcClient::new(channel))
            })
            .await
    }
}

fn vendor_request(nfdeployment: &NFDeployment) -> Request<NfDeploymentRef> {
    let mut request = Request::new(NfDeploymentRef::from(nfdeployment));
    request.set_timeout(VENDOR_RPC_TIMEOUT);
    request
}

#[tonic::async_trait]
impl VendorDispatch for VendorClientManager {
    async fn on_create_update(&self, nfdeployment: &NFDeployment) -> Result<()> {
        let provider = nfdeployment.spec.provider.as_str();
        let mut client = self.client_for(provider).await?;

        let response = client
            .create_update(vendor_request(nfdeployment))
            .await
            .map_err(Error::RpcError)?;

        // TODO: write the outcome to the NFDeployment status once it has a
        // status subresource
        info!(
            "CreateUpdate of {} to {} returned: {}",
            nfdeployment.name_any(),
            provider,
            response.into_inner().message
        );
        Ok(())
    }

    async fn on_delete(&self, nfdeployment: &NFDeployment) -> Result<()> {
        let provider = nfdeployment.spec.provider.as_str();
        let mut client = self.client_for(provider).await?;

        let response = client
            .delete(vendor_request(nfdeployment))
            .await
            .map_err(Error::RpcError)?;

        info!(
            "Delete of {} to {} returned: {}",
            nfdeployment.name_any(),
            provider,
            response.into_inner().message
        );
        Ok(())
    }
}
