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

use alloy_primitives::{hex::FromHexError, U256};

/// Errors returned when encoding, decoding or recovering a [crate::Transaction].
///
/// None of these are transient: every operation is a deterministic function of the
/// transaction, so retrying with the same input yields the same error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transaction cannot be encoded because `value` is not set.
    #[error("transaction value is missing")]
    MissingValue,
    /// The input is not a 9-item RLP list with a valid recipient.
    #[error("malformed transaction encoding: {0}")]
    MalformedEncoding(#[from] alloy_rlp::Error),
    /// The input is not valid hex.
    #[error("invalid hex input")]
    Hex(#[from] FromHexError),
    /// `r` or `s` is zero.
    #[error("invalid signature: r and s must be non-zero")]
    InvalidSignature,
    /// The normalized `v` does not map onto a recovery id.
    #[error("unsupported recovery id: {0}")]
    UnsupportedRecoveryId(U256),
    /// The curve rejected the hash and signature pair.
    #[error("public key recovery failed")]
    RecoveryFailure(#[source] k256::ecdsa::Error),
    /// The parameters cannot form a request for the given method.
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}
