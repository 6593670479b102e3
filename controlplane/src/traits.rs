use nfdeployment::NFDeployment;

use crate::Result;

/// Read/write access to NFDeployments as the reconciler needs it.
#[tonic::async_trait]
pub trait DeploymentStore: Send + Sync {
    /// Returns `None` when the NFDeployment does not exist (anymore).
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<NFDeployment>>;

    async fn update(&self, nfdeployment: &NFDeployment) -> Result<NFDeployment>;
}

/// Forwards NFDeployment events to the vendor backend of their provider.
#[tonic::async_trait]
pub trait VendorDispatch: Send + Sync {
    async fn on_create_update(&self, nfdeployment: &NFDeployment) -> Result<()>;

    async fn on_delete(&self, nfdeployment: &NFDeployment) -> Result<()>;
}
