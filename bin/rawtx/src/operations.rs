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

use alloy_primitives::hex;
use anyhow::Context;
use log::{info, warn};
use rawtx_primitives::{
    rpc::{raw_transaction_params, request_params},
    GasLimitPolicy, RpcMethod, Transaction, TransactionOptions,
};

use crate::cli::{ParamsArgs, RawArgs, SigningHashArgs};

fn load(args: &RawArgs) -> anyhow::Result<Transaction> {
    Transaction::from_raw_hex(&args.raw).context("failed to decode transaction")
}

/// Human-readable dump of the transaction.
pub fn decode(args: &RawArgs) -> anyhow::Result<String> {
    let tx = load(args)?;
    if let Err(err) = tx.sender() {
        warn!("Sender cannot be recovered: {err}");
    }
    Ok(tx.to_string())
}

/// JSON `params` array for the requested method.
pub fn params(args: &ParamsArgs) -> anyhow::Result<String> {
    let tx = load(&args.raw_args)?;
    let params = match args.method {
        RpcMethod::SendRawTransaction => {
            raw_transaction_params(&tx).context("transaction is not properly signed")?
        }
        method => {
            let options = TransactionOptions {
                from: args.from,
                gas_limit: args.gas_limit.map(GasLimitPolicy::Manual),
                call_on_block: Some(args.block),
                ..Default::default()
            };
            request_params(method, &tx, Some(&options))
                .with_context(|| format!("failed to build {method} parameters"))?
        }
    };
    info!("Built {} parameter(s) for {}", params.len(), args.method);
    Ok(serde_json::to_string_pretty(&params)?)
}

/// Hash of the signing preimage as `0x` hex.
pub fn signing_hash(args: &SigningHashArgs) -> anyhow::Result<String> {
    let tx = load(&args.raw_args)?;
    let chain_id = args.chain_id.or(tx.inferred_chain_id());
    info!("Using chain id {chain_id:?}");
    Ok(hex::encode_prefixed(tx.signing_hash(chain_id)?))
}
