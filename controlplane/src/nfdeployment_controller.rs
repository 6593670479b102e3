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

use futures::StreamExt;
use std::{
    ops::Sub,
    sync::Arc,
    time::Instant,
};

use crate::consts::{NFDEPLOYMENT_FINALIZER, RECONCILE_RETRY_DELAY};
use crate::traits::{DeploymentStore, VendorDispatch};
use crate::utils::{add_finalizer, has_finalizer, remove_finalizer};
use crate::{Context, Error, Result};

use kube::{
    api::{Api, ListParams, PostParams},
    runtime::{controller::Action, watcher::Config, Controller},
    Client, ResourceExt,
};
use nfdeployment::NFDeployment;
use tracing::*;

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
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<NFDeployment>> {
        let api: Api<NFDeployment> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name).await.map_err(Error::KubeError)
    }

    async fn update(&self, nfdeployment: &NFDeployment) -> Result<NFDeployment> {
        let namespace = nfdeployment
            .namespace()
            .ok_or(Error::InvalidConfigError("invalid namespace".to_string()))?;
        let api: Api<NFDeployment> = Api::namespaced(self.client.clone(), &namespace);
        api.replace(&nfdeployment.name_any(), &PostParams::default(), nfdeployment)
            .await
            .map_err(Error::KubeError)
    }
}

/// Drives one NFDeployment towards its vendor backend.
///
/// While the NFDeployment is live, the finalizer is persisted before the
/// create/update is dispatched. Once it is being deleted, the delete is
/// dispatched first and the finalizer is only dropped when that succeeded,
/// so a failed delete keeps the object around for the next attempt.
pub async fn reconcile_nfdeployment<S, D>(
    store: &S,
    vendors: &D,
    namespace: &str,
    name: &str,
) -> Result<()>
where
    S: DeploymentStore + ?Sized,
    D: VendorDispatch + ?Sized,
{
    let Some(mut nfdeployment) = store.get(namespace, name).await? else {
        info!(
            "NFDeployment {}/{} not found, ignoring because object must be deleted",
            namespace, name
        );
        return Ok(());
    };

    if nfdeployment.metadata.deletion_timestamp.is_none() {
        if add_finalizer(&mut nfdeployment, NFDEPLOYMENT_FINALIZER) {
            debug!("adding finalizer to NFDeployment {}/{}", namespace, name);
            nfdeployment = store.update(&nfdeployment).await?;
        }
        return vendors.on_create_update(&nfdeployment).await;
    }

    if has_finalizer(&nfdeployment, NFDEPLOYMENT_FINALIZER) {
        vendors.on_delete(&nfdeployment).await?;

        remove_finalizer(&mut nfdeployment, NFDEPLOYMENT_FINALIZER);
        store.update(&nfdeployment).await?;
        info!("released NFDeployment {}/{}", namespace, name);
    }

    Ok(())
}

pub async fn reconcile(nfdeployment: Arc<NFDeployment>, ctx: Arc<Context>) -> Result<Action> {
    let start = Instant::now();

    let name = nfdeployment
        .metadata
        .name
        .clone()
        .ok_or(Error::InvalidConfigError("invalid name".to_string()))?;

    let ns = nfdeployment
        .metadata
        .namespace
        .clone()
        .ok_or(Error::InvalidConfigError("invalid namespace".to_string()))?;

    let store = KubeDeploymentStore::new(ctx.client.clone());
    reconcile_nfdeployment(&store, ctx.vendors.as_ref(), &ns, &name).await?;

    let duration = Instant::now().sub(start);
    info!("finished reconciling in {:?} ms", duration.as_millis());
    Ok(Action::await_change())
}

pub async fn controller(ctx: Context) -> Result<()> {
    let nfdeployment_api = Api::<NFDeployment>::all(ctx.client.clone());
    nfdeployment_api
        .list(&ListParams::default().limit(1))
        .await
        .map_err(Error::CRDNotFoundError)?;

    Controller::new(nfdeployment_api, Config::default().any_semantic())
        .shutdown_on_signal()
        .run(reconcile, error_policy, Arc::new(ctx))
        .filter_map(|x| async move { std::result::Result::ok(x) })
        .for_each(|_| futures::future::ready(()))
        .await;

    Ok(())
}

fn error_policy(_: Arc<NFDeployment>, error: &Error, _: Arc<Context>) -> Action {
    warn!("reconcile failed: {:?}", error);
    Action::requeue(RECONCILE_RETRY_DELAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
    use k8s_openapi::chrono::Utc;
    use nfdeployment::NFDeploymentSpec;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Update { finalizers: Vec<String> },
        CreateUpdate { finalizers: Vec<String> },
        Delete { finalizers: Vec<String> },
    }

    // Records store updates and vendor dispatches in one ordered log.
    #[derive(Default)]
    struct Recorder {
        objects: Mutex<HashMap<(String, String), NFDeployment>>,
        calls: Mutex<Vec<Call>>,
        fail_dispatch: bool,
    }

    impl Recorder {
        fn with(nfdeployment: NFDeployment) -> Self {
            let recorder = Recorder::default();
            recorder.objects.lock().unwrap().insert(key(&nfdeployment), nfdeployment);
            recorder
        }

        fn failing(mut self) -> Self {
            self.fail_dispatch = true;
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn stored(&self, namespace: &str, name: &str) -> NFDeployment {
            self.objects.lock().unwrap()[&(namespace.to_string(), name.to_string())].clone()
        }

        fn dispatch(&self, call: Call) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail_dispatch {
                return Err(Error::RpcError(tonic::Status::unavailable("relay down")));
            }
            Ok(())
        }
    }

    fn key(nfdeployment: &NFDeployment) -> (String, String) {
        (
            nfdeployment.namespace().unwrap_or_default(),
            nfdeployment.name_any(),
        )
    }

    #[tonic::async_trait]
    impl DeploymentStore for Recorder {
        async fn get(&self, namespace: &str, name: &str) -> Result<Option<NFDeployment>> {
            Ok(self
                .objects
                .lock()
                .unwrap()
                .get(&(namespace.to_string(), name.to_string()))
                .cloned())
        }

        async fn update(&self, nfdeployment: &NFDeployment) -> Result<NFDeployment> {
            self.calls.lock().unwrap().push(Call::Update {
                finalizers: nfdeployment.finalizers().to_vec(),
            });
            self.objects
                .lock()
                .unwrap()
                .insert(key(nfdeployment), nfdeployment.clone());
            Ok(nfdeployment.clone())
        }
    }

    #[tonic::async_trait]
    impl VendorDispatch for Recorder {
        async fn on_create_update(&self, nfdeployment: &NFDeployment) -> Result<()> {
            self.dispatch(Call::CreateUpdate {
                finalizers: nfdeployment.finalizers().to_vec(),
            })
        }

        async fn on_delete(&self, nfdeployment: &NFDeployment) -> Result<()> {
            self.dispatch(Call::Delete {
                finalizers: nfdeployment.finalizers().to_vec(),
            })
        }
    }

    fn upf1() -> NFDeployment {
        let mut nfd = NFDeployment::new(
            "upf1",
            NFDeploymentSpec {
                provider: "upf.free5gc.io".to_string(),
                ..Default::default()
            },
        );
        nfd.metadata.namespace = Some("ns1".to_string());
        nfd
    }

    fn finalized(mut nfd: NFDeployment) -> NFDeployment {
        nfd.metadata.finalizers = Some(vec![NFDEPLOYMENT_FINALIZER.to_string()]);
        nfd
    }

    fn deleting(mut nfd: NFDeployment) -> NFDeployment {
        nfd.metadata.deletion_timestamp = Some(Time(Utc::now()));
        nfd
    }

    fn with_finalizer() -> Vec<String> {
        vec![NFDEPLOYMENT_FINALIZER.to_string()]
    }

    #[tokio::test]
    async fn new_deployment_gets_finalizer_before_dispatch() {
        let recorder = Recorder::with(upf1());

        reconcile_nfdeployment(&recorder, &recorder, "ns1", "upf1")
            .await
            .unwrap();

        assert_eq!(
            recorder.calls(),
            vec![
                Call::Update {
                    finalizers: with_finalizer()
                },
                Call::CreateUpdate {
                    finalizers: with_finalizer()
                },
            ]
        );
    }

    #[tokio::test]
    async fn active_deployment_is_dispatched_without_update() {
        let recorder = Recorder::with(finalized(upf1()));

        reconcile_nfdeployment(&recorder, &recorder, "ns1", "upf1")
            .await
            .unwrap();

        assert_eq!(
            recorder.calls(),
            vec![Call::CreateUpdate {
                finalizers: with_finalizer()
            }]
        );
    }

    #[tokio::test]
    async fn create_update_failure_is_returned() {
        let recorder = Recorder::with(upf1()).failing();

        let result = reconcile_nfdeployment(&recorder, &recorder, "ns1", "upf1").await;

        assert!(matches!(result, Err(Error::RpcError(_))));
        assert!(has_finalizer(
            &recorder.stored("ns1", "upf1"),
            NFDEPLOYMENT_FINALIZER
        ));
    }

    #[tokio::test]
    async fn delete_is_dispatched_before_finalizer_removal() {
        let recorder = Recorder::with(deleting(finalized(upf1())));

        reconcile_nfdeployment(&recorder, &recorder, "ns1", "upf1")
            .await
            .unwrap();

        assert_eq!(
            recorder.calls(),
            vec![
                Call::Delete {
                    finalizers: with_finalizer()
                },
                Call::Update { finalizers: vec![] },
            ]
        );
    }

    #[tokio::test]
    async fn failed_delete_keeps_finalizer() {
        let recorder = Recorder::with(deleting(finalized(upf1()))).failing();

        let result = reconcile_nfdeployment(&recorder, &recorder, "ns1", "upf1").await;

        assert!(matches!(result, Err(Error::RpcError(_))));
        assert_eq!(
            recorder.calls(),
            vec![Call::Delete {
                finalizers: with_finalizer()
            }]
        );
        assert!(has_finalizer(
            &recorder.stored("ns1", "upf1"),
            NFDEPLOYMENT_FINALIZER
        ));
    }

    #[tokio::test]
    async fn deleting_without_finalizer_is_noop() {
        let recorder = Recorder::with(deleting(upf1()));

        reconcile_nfdeployment(&recorder, &recorder, "ns1", "upf1")
            .await
            .unwrap();

        assert!(recorder.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_deployment_is_success() {
        let recorder = Recorder::default();

        reconcile_nfdeployment(&recorder, &recorder, "ns1", "upf1")
            .await
            .unwrap();

        assert!(recorder.calls().is_empty());
    }
}
