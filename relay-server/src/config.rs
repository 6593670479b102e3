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

use clap::Parser;
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(name = "relay-server", about = "NFDeployment gRPC relay for the free5gc UPF")]
pub struct Options {
    /// Address to serve NFDeploymentRPC on
    #[clap(long, default_value = "127.0.0.1")]
    pub address: Ipv4Addr,
    #[clap(long, default_value_t = 50051)]
    pub port: u16,
    /// Replaces the built-in values.yaml template
    #[clap(long)]
    pub template: Option<PathBuf>,
}
