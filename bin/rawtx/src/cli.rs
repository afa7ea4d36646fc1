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

use alloy_primitives::{Address, U256};
use rawtx_primitives::{BlockTag, RpcMethod};

#[derive(clap::Parser, Debug, Clone)]
#[command(name = "rawtx")]
#[command(bin_name = "rawtx")]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Decode a signed legacy transaction and print its fields, hash and sender
    Decode(RawArgs),
    /// Print the JSON-RPC parameters for a signed legacy transaction
    Params(ParamsArgs),
    /// Print the hash the signer of a transaction signed
    SigningHash(SigningHashArgs),
}

impl Cli {
    pub fn raw_args(&self) -> &RawArgs {
        match &self {
            Cli::Decode(args) => args,
            Cli::Params(args) => &args.raw_args,
            Cli::SigningHash(args) => &args.raw_args,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct RawArgs {
    #[clap(short = 'r', long, require_equals = true, env = "RAWTX_RAW")]
    /// RLP-encoded signed transaction as hex, with or without the 0x prefix
    pub raw: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ParamsArgs {
    #[clap(flatten)]
    pub raw_args: RawArgs,

    #[clap(short = 'f', long, require_equals = true)]
    /// Sender to include in the transaction object
    pub from: Option<Address>,

    #[clap(short = 'm', long, require_equals = true, default_value_t = RpcMethod::Call)]
    /// One of eth_call, eth_estimateGas, eth_sendTransaction, eth_sendRawTransaction
    pub method: RpcMethod,

    #[clap(short = 'g', long, require_equals = true)]
    /// Gas limit to include; without it the node picks one
    pub gas_limit: Option<U256>,

    #[clap(short = 'b', long, require_equals = true, default_value_t = BlockTag::Latest)]
    /// Block to evaluate eth_call against: latest, pending, earliest or a number
    pub block: BlockTag,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SigningHashArgs {
    #[clap(flatten)]
    pub raw_args: RawArgs,

    #[clap(short = 'c', long, require_equals = true)]
    /// Chain id of the preimage
    ///
    /// [default: the chain id implied by v]
    pub chain_id: Option<U256>,
}
