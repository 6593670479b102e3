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

use std::fs;

use anyhow::Context;
use clap::Parser;
use kube::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use relay_server::config::Options;
use relay_server::server::KubeDeploymentStore;
use relay_server::start as start_relay_server;
use relay_server::vendor::Free5gcUpf;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let opts = Options::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let vendor = match &opts.template {
        Some(path) => {
            let template = fs::read_to_string(path)
                .with_context(|| format!("failed to read template {}", path.display()))?;
            Free5gcUpf::with_template(template).context("invalid values template")?
        }
        None => Free5gcUpf::new(),
    };

    let config = kube::Config::incluster().context("failed to create incluster config")?;
    let client = Client::try_from(config).context("failed to create kube client")?;

    info!("starting relay server");
    start_relay_server(
        opts.address,
        opts.port,
        KubeDeploymentStore::new(client),
        vendor,
    )
    .await?;

    info!("Exiting...");

    Ok(())
}
