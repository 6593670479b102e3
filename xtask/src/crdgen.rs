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
use std::path::PathBuf;

use clap::Parser;
use kube::CustomResourceExt;
use nfdeployment::NFDeployment;

#[derive(Debug, Parser)]
pub struct Options {
    /// Write to this file instead of stdout
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn crdgen(opts: Options) -> Result<(), anyhow::Error> {
    let yaml = serde_yaml::to_string(&NFDeployment::crd())?;

    match opts.output {
        Some(path) => fs::write(&path, yaml)?,
        None => print!("{yaml}"),
    }

    Ok(())
}
