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

mod crdgen;
mod grpc;

use std::process::exit;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct Options {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Print the NFDeployment CustomResourceDefinition as YAML
    Crdgen(crdgen::Options),
    /// Send CreateUpdate or Delete to a running relay server
    GrpcClient(grpc::Options),
}

#[tokio::main]
async fn main() {
    let opts = Options::parse();

    use Command::*;
    let ret = match opts.command {
        Crdgen(opts) => crdgen::crdgen(opts),
        GrpcClient(opts) => grpc::send(opts).await,
    };

    if let Err(e) = ret {
        eprintln!("{:#}", e);
        exit(1);
    }
}
