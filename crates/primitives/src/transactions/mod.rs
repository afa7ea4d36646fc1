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

use std::fmt;

use alloy_primitives::{hex, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{keccak::keccak, Error};

pub mod codec;
mod kind;
mod signature;

pub use kind::TransactionKind;
pub use signature::TxSignature;

/// Gas price used when the caller leaves it to the defaults: 5 gwei.
pub const DEFAULT_GAS_PRICE: u64 = 5_000_000_000;
/// Gas limit used when the caller leaves it to the defaults: a plain transfer.
pub const DEFAULT_GAS_LIMIT: u64 = 21_000;

/// A legacy Ethereum transaction, signed or not.
///
/// The transaction is unsigned while both `r` and `s` are zero. In that state `v` holds
/// the chain id the transaction is intended for. Once signed, `v` holds the recovery id,
/// possibly with the chain id folded in as described in
/// [EIP-155](https://eips.ethereum.org/EIPS/eip-155).
///
/// The explicit chain id is private: it is fixed at construction with
/// [Transaction::with_chain_id] and can only be replaced through
/// [Transaction::override_chain_id]. It is never filled in from `v`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// A scalar value equal to the number of transactions sent by the sender.
    pub nonce: U256,
    /// Wei paid per unit of gas.
    pub gas_price: U256,
    /// Maximum amount of gas the transaction may use.
    pub gas_limit: U256,
    /// EIP-1559 priority fee. Carried along, but not part of the legacy encoding.
    pub max_priority_fee_per_gas: U256,
    /// EIP-1559 fee cap. Carried along, but not part of the legacy encoding.
    pub max_fee_per_gas: U256,
    /// Recipient, or [TransactionKind::Create] for a contract deployment.
    pub to: TransactionKind,
    /// Wei transferred to the recipient. Must be set before encoding.
    pub value: Option<U256>,
    /// Call data or init code.
    pub data: Bytes,
    pub signature: TxSignature,
    #[serde(default)]
    chain_id: Option<U256>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            nonce: U256::ZERO,
            gas_price: U256::ZERO,
            gas_limit: U256::ZERO,
            max_priority_fee_per_gas: U256::ZERO,
            max_fee_per_gas: U256::ZERO,
            to: TransactionKind::Create,
            value: None,
            data: Bytes::new(),
            signature: TxSignature::default(),
            chain_id: None,
        }
    }
}

impl Transaction {
    /// Creates an unsigned transaction with nonce 0.
    pub fn new_legacy(
        gas_price: U256,
        gas_limit: U256,
        to: TransactionKind,
        value: U256,
        data: Bytes,
    ) -> Self {
        Self {
            gas_price,
            gas_limit,
            to,
            value: Some(value),
            data,
            ..Default::default()
        }
    }

    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: U256) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_max_priority_fee_per_gas(mut self, fee: U256) -> Self {
        self.max_priority_fee_per_gas = fee;
        self
    }

    pub fn with_max_fee_per_gas(mut self, fee: U256) -> Self {
        self.max_fee_per_gas = fee;
        self
    }

    pub fn with_to(mut self, to: impl Into<TransactionKind>) -> Self {
        self.to = to.into();
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_signature(mut self, signature: TxSignature) -> Self {
        self.signature = signature;
        self
    }

    /// Sets the explicit chain id at construction time.
    pub fn with_chain_id(mut self, chain_id: Option<U256>) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Replaces the explicit chain id of an existing transaction.
    ///
    /// This changes the signing preimage and how `v` is interpreted during recovery, so a
    /// signed transaction may recover a different sender afterwards.
    pub fn override_chain_id(&mut self, chain_id: Option<U256>) {
        self.chain_id = chain_id;
    }

    /// The explicit chain id, if one was set.
    pub fn intrinsic_chain_id(&self) -> Option<U256> {
        self.chain_id
    }

    /// Returns `true` once `r` or `s` is non-zero.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_unsigned()
    }

    /// Keccak hash of the signed encoding; this is the transaction's identifier on chain.
    pub fn hash(&self) -> Result<B256, Error> {
        Ok(keccak(self.encode_signed()?))
    }

    /// The transaction id as lowercase, `0x`-prefixed hex.
    ///
    /// Only transactions whose sender can be recovered have an id.
    pub fn tx_id(&self) -> Result<String, Error> {
        self.sender()?;
        Ok(hex::encode_prefixed(self.hash()?))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn optional<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "none".to_string(), |value| value.to_string())
        }

        writeln!(f, "Transaction")?;
        writeln!(f, "Nonce: {}", self.nonce)?;
        writeln!(f, "Gas price: {}", self.gas_price)?;
        writeln!(f, "Gas limit: {}", self.gas_limit)?;
        writeln!(f, "Max priority fee per gas: {}", self.max_priority_fee_per_gas)?;
        writeln!(f, "Max fee per gas: {}", self.max_fee_per_gas)?;
        writeln!(f, "To: {}", self.to)?;
        writeln!(f, "Value: {}", optional(self.value))?;
        writeln!(f, "Data: {}", hex::encode_prefixed(&self.data))?;
        writeln!(f, "v: {}", self.signature.v)?;
        writeln!(f, "r: {}", self.signature.r)?;
        writeln!(f, "s: {}", self.signature.s)?;
        writeln!(f, "Intrinsic chain id: {}", optional(self.chain_id))?;
        writeln!(f, "Inferred chain id: {}", optional(self.inferred_chain_id()))?;
        let sender = self.sender().ok().map(|sender| hex::encode_prefixed(sender.as_slice()));
        writeln!(f, "Sender: {}", optional(sender))?;
        write!(f, "Hash: {}", optional(self.hash().ok().map(hex::encode_prefixed)))
    }
}
