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

use std::net::SocketAddr;

use anyhow::Error;
use clap::Parser;
use kube::Resource;

use nfdeployment::rpc::nf_deployment_rpc_client::NfDeploymentRpcClient;
use nfdeployment::rpc::NfDeploymentRef;
use nfdeployment::NFDeployment;

#[derive(Debug, Parser)]
pub struct Options {
    #[clap(default_value = "127.0.0.1", long)]
    pub server_ip: String,
    #[clap(default_value = "50051", long)]
    pub server_port: u16,
    #[clap(long)]
    pub name: String,
    #[clap(default_value = "default", long)]
    pub namespace: String,
    #[clap(long, short, action)]
    pub delete: bool,
}

pub async fn send(opts: Options) -> Result<(), Error> {
    let server_addr: SocketAddr = format!("{}:{}", opts.server_ip, opts.server_port).parse()?;

    let mut client = NfDeploymentRpcClient::connect(format!("http://{server_addr}")).await?;

    let reference = NfDeploymentRef {
        api_version: NFDeployment::api_version(&()).to_string(),
        name: opts.name,
        namespace: opts.namespace,
    };

    if opts.delete {
        let res = client.delete(reference).await?;
        println!(
            "grpc server responded to DELETE: {}",
            res.into_inner().message
        );
    } else {
        let res = client.create_update(reference).await?.into_inner();
        println!("grpc server responded to CREATE_UPDATE: {}", res.message);
        if let Some(artifact) = res.artifact {
            for (key, value) in artifact.data {
                println!("--- {}/{} {}\n{}", artifact.namespace, artifact.name, key, value);
            }
        }
    }

    Ok(())
}
