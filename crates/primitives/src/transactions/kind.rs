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

use alloy_primitives::{hex, Address};
use alloy_rlp::{Encodable, EMPTY_STRING_CODE};
use serde::{Deserialize, Serialize};

/// Recipient of a transaction: either a call to an existing account or the deployment of
/// a new contract.
///
/// This is an enum rather than an `Option<Address>` so that a deployment can never be
/// confused with a call to the zero address; the two encode differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Contract deployment; the transaction data is the init code.
    #[default]
    Create,
    /// Message call to the given 160-bit address.
    Call(Address),
}

impl TransactionKind {
    /// Returns the raw bytes as they appear in the RLP encoding: 20 bytes for a call,
    /// nothing for a deployment.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            TransactionKind::Call(addr) => addr.as_slice(),
            TransactionKind::Create => &[],
        }
    }

    /// Returns `true` for contract deployments.
    pub fn is_create(&self) -> bool {
        matches!(self, TransactionKind::Create)
    }
}

impl From<TransactionKind> for Option<Address> {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Create => None,
            TransactionKind::Call(addr) => Some(addr),
        }
    }
}

impl From<Option<Address>> for TransactionKind {
    fn from(value: Option<Address>) -> Self {
        value.map_or(TransactionKind::Create, TransactionKind::Call)
    }
}

impl From<Address> for TransactionKind {
    fn from(value: Address) -> Self {
        TransactionKind::Call(value)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Call(addr) => f.write_str(&hex::encode_prefixed(addr.as_slice())),
            TransactionKind::Create => f.write_str("contract deployment"),
        }
    }
}

/// A call encodes as the address, a deployment as the empty string.
impl Encodable for TransactionKind {
    #[inline]
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        match self {
            TransactionKind::Call(addr) => addr.encode(out),
            TransactionKind::Create => out.put_u8(EMPTY_STRING_CODE),
        }
    }

    #[inline]
    fn length(&self) -> usize {
        match self {
            TransactionKind::Call(addr) => addr.length(),
            TransactionKind::Create => 1,
        }
    }
}
