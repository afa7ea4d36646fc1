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

//! Caller-supplied overrides layered over protocol defaults.

use std::{fmt, str::FromStr};

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    transactions::{DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE},
    Error, Transaction, TransactionKind,
};

/// How the gas limit of a transaction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GasLimitPolicy {
    /// Left to the node; resolves to [DEFAULT_GAS_LIMIT] locally.
    Automatic,
    /// Exactly this limit.
    Manual(U256),
    /// An estimate capped at this limit. Merging into an existing transaction uses the
    /// cap as the limit.
    Limited(U256),
    /// An estimate scaled by this factor; resolves to [DEFAULT_GAS_LIMIT] locally.
    WithMargin(f64),
}

/// How the gas price of a transaction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GasPricePolicy {
    /// Left to the node; resolves to [DEFAULT_GAS_PRICE] locally.
    Automatic,
    /// Exactly this price.
    Manual(U256),
    /// The node's price scaled by this factor; resolves to [DEFAULT_GAS_PRICE] locally.
    WithMargin(f64),
}

impl GasPricePolicy {
    fn resolve(&self) -> U256 {
        match self {
            GasPricePolicy::Manual(price) => *price,
            _ => U256::from(DEFAULT_GAS_PRICE),
        }
    }
}

/// Block a read-only call is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockTag {
    Latest,
    Pending,
    Earliest,
    Number(u64),
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Latest => f.write_str("latest"),
            BlockTag::Pending => f.write_str("pending"),
            BlockTag::Earliest => f.write_str("earliest"),
            BlockTag::Number(number) => write!(f, "{number:#x}"),
        }
    }
}

/// Parses a tag name, a decimal block number or a `0x`-prefixed hex block number.
impl FromStr for BlockTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockTag::Latest),
            "pending" => Ok(BlockTag::Pending),
            "earliest" => Ok(BlockTag::Earliest),
            _ => {
                let number = match s.strip_prefix("0x") {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => s.parse(),
                };
                number
                    .map(BlockTag::Number)
                    .map_err(|_| Error::InvalidRequest("unknown block tag"))
            }
        }
    }
}

/// Optional overrides for building a transaction or a request from one.
///
/// Every field is optional. [TransactionOptions::default] is the empty overlay, while
/// [TransactionOptions::default_options] holds the protocol defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionOptions {
    pub from: Option<Address>,
    pub to: Option<TransactionKind>,
    pub gas_limit: Option<GasLimitPolicy>,
    pub gas_price: Option<GasPricePolicy>,
    pub value: Option<U256>,
    pub call_on_block: Option<BlockTag>,
}

impl TransactionOptions {
    /// Automatic gas limit and price, calls evaluated against the pending block.
    pub fn default_options() -> Self {
        Self {
            gas_limit: Some(GasLimitPolicy::Automatic),
            gas_price: Some(GasPricePolicy::Automatic),
            call_on_block: Some(BlockTag::Pending),
            ..Default::default()
        }
    }

    /// Layers `other` over `self`: every field set in `other` wins.
    pub fn merge(&self, other: &TransactionOptions) -> TransactionOptions {
        TransactionOptions {
            from: other.from.or(self.from),
            to: other.to.or(self.to),
            gas_limit: other.gas_limit.or(self.gas_limit),
            gas_price: other.gas_price.or(self.gas_price),
            value: other.value.or(self.value),
            call_on_block: other.call_on_block.or(self.call_on_block),
        }
    }
}

impl Transaction {
    /// Builds an unsigned transaction with nonce 0 from `options` layered over
    /// [TransactionOptions::default_options].
    ///
    /// Only manual gas settings are taken over; every other policy resolves to
    /// [DEFAULT_GAS_PRICE] and [DEFAULT_GAS_LIMIT]. The recipient is always `to`.
    pub fn from_options(
        to: impl Into<TransactionKind>,
        data: impl Into<Bytes>,
        options: &TransactionOptions,
    ) -> Self {
        let merged = TransactionOptions::default_options().merge(options);

        let mut tx = Transaction::default().with_to(to).with_data(data);
        if let Some(gas_price) = merged.gas_price {
            tx.gas_price = gas_price.resolve();
        }
        if let Some(gas_limit) = merged.gas_limit {
            tx.gas_limit = match gas_limit {
                GasLimitPolicy::Manual(limit) => limit,
                _ => U256::from(DEFAULT_GAS_LIMIT),
            };
        }
        tx.value = merged.value;
        tx
    }

    /// Returns a copy with `options` applied; fields the options leave unset are kept.
    ///
    /// Unlike [Transaction::from_options], a [GasLimitPolicy::Limited] cap is taken over
    /// as the gas limit. The signature is copied unchanged, so overriding a field of a
    /// signed transaction invalidates it.
    pub fn merged_with_options(&self, options: &TransactionOptions) -> Self {
        let mut tx = self.clone();
        if let Some(gas_price) = options.gas_price {
            tx.gas_price = gas_price.resolve();
        }
        if let Some(gas_limit) = options.gas_limit {
            tx.gas_limit = match gas_limit {
                GasLimitPolicy::Manual(limit) | GasLimitPolicy::Limited(limit) => limit,
                _ => U256::from(DEFAULT_GAS_LIMIT),
            };
        }
        if let Some(value) = options.value {
            tx.value = Some(value);
        }
        if let Some(to) = options.to {
            tx.to = to;
        }
        tx
    }
}
