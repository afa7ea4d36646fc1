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

//! JSON-RPC parameter sets built from a [Transaction].
//!
//! Only the `params` array is produced here; the request envelope belongs to the caller.

use std::{fmt, str::FromStr};

use alloy_primitives::{hex, Address, U256};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Transaction, TransactionOptions};

/// Transaction object as taken by `eth_call`, `eth_estimateGas` and
/// `eth_sendTransaction`. All values are lowercase `0x` hex strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParameters {
    /// Sender, only when the caller names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Recipient (absent for contract deployment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Gas limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Call data, `0x` when empty.
    pub data: String,
}

/// Formats a quantity as `0x`-prefixed lowercase hex without leading zeros; zero is `0x0`.
pub fn quantity_to_hex(quantity: U256) -> String {
    let digits = hex::encode(quantity.to_be_bytes::<32>());
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{digits}")
    }
}

impl Transaction {
    /// Projects the transaction onto the RPC transaction object.
    pub fn to_call_parameters(&self, from: Option<Address>) -> TransactionParameters {
        TransactionParameters {
            from: from.map(|from| hex::encode_prefixed(from.as_slice())),
            to: Option::<Address>::from(self.to).map(|to| hex::encode_prefixed(to.as_slice())),
            gas: Some(quantity_to_hex(self.gas_limit)),
            gas_price: Some(quantity_to_hex(self.gas_price)),
            value: self.value.map(quantity_to_hex),
            data: hex::encode_prefixed(&self.data),
        }
    }
}

/// Methods that take a transaction as their first parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RpcMethod {
    #[serde(rename = "eth_call")]
    Call,
    #[serde(rename = "eth_estimateGas")]
    EstimateGas,
    #[serde(rename = "eth_sendTransaction")]
    SendTransaction,
    #[serde(rename = "eth_sendRawTransaction")]
    SendRawTransaction,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::Call => "eth_call",
            RpcMethod::EstimateGas => "eth_estimateGas",
            RpcMethod::SendTransaction => "eth_sendTransaction",
            RpcMethod::SendRawTransaction => "eth_sendRawTransaction",
        }
    }

    /// Number of positional parameters the method takes.
    pub fn required_params(&self) -> usize {
        match self {
            RpcMethod::Call => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RpcMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eth_call" => Ok(RpcMethod::Call),
            "eth_estimateGas" => Ok(RpcMethod::EstimateGas),
            "eth_sendTransaction" => Ok(RpcMethod::SendTransaction),
            "eth_sendRawTransaction" => Ok(RpcMethod::SendRawTransaction),
            _ => Err(Error::InvalidRequest("unknown method")),
        }
    }
}

/// Builds the `params` array of `method` for `tx`.
///
/// `gas` is dropped for `eth_estimateGas` and whenever the options do not set a gas
/// limit, leaving it to the node. Methods with a second parameter get the options' block
/// tag, which must then be present.
pub fn request_params(
    method: RpcMethod,
    tx: &Transaction,
    options: Option<&TransactionOptions>,
) -> Result<Vec<Value>, Error> {
    if method == RpcMethod::SendRawTransaction {
        return Err(Error::InvalidRequest("raw transactions take the signed encoding"));
    }

    let mut parameters = tx.to_call_parameters(options.and_then(|options| options.from));
    if method == RpcMethod::EstimateGas || options.and_then(|options| options.gas_limit).is_none() {
        parameters.gas = None;
    }

    let mut params = vec![serde_json::to_value(parameters)?];
    if method.required_params() == 2 {
        let block = options.and_then(|options| options.call_on_block).ok_or_else(|| {
            debug!("{method} requires a block tag");
            Error::InvalidRequest("missing block tag")
        })?;
        params.push(Value::String(block.to_string()));
    }
    Ok(params)
}

/// Builds the `params` array of `eth_sendRawTransaction`: the signed encoding as hex.
///
/// Only transactions whose sender can be recovered are accepted.
pub fn raw_transaction_params(tx: &Transaction) -> Result<Vec<Value>, Error> {
    tx.sender()?;
    let raw = tx.encode_signed()?;
    Ok(vec![Value::String(hex::encode_prefixed(raw))])
}
