// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use log::debug;
use rawtx::{cli::Cli, operations};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("Raw input: {}", cli.raw_args().raw);

    let output = match &cli {
        Cli::Decode(args) => operations::decode(args)?,
        Cli::Params(args) => operations::params(args)?,
        Cli::SigningHash(args) => operations::signing_hash(args)?,
    };
    println!("{output}");

    Ok(())
}
