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

use alloy_primitives::{Address, B256, U256};
use k256::PublicKey as K256PublicKey;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::Transaction;
use crate::{
    keccak::keccak,
    secp256k1::{marshal_signature, public_key_to_address, recover_public_key},
    Error,
};

/// The `v`, `r` and `s` components of a recoverable ECDSA signature.
///
/// While `r` and `s` are both zero the transaction is unsigned and `v` holds the chain id
/// the transaction is meant for, not a recovery id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxSignature {
    pub v: U256,
    pub r: U256,
    pub s: U256,
}

impl Default for TxSignature {
    fn default() -> Self {
        Self {
            v: U256::from(1),
            r: U256::ZERO,
            s: U256::ZERO,
        }
    }
}

impl TxSignature {
    /// Creates an unsigned placeholder whose `v` carries the intended chain id.
    pub fn unsigned(chain_id: U256) -> Self {
        Self {
            v: chain_id,
            ..Self::default()
        }
    }

    /// Returns `true` if both `r` and `s` are zero.
    pub fn is_unsigned(&self) -> bool {
        self.r.is_zero() && self.s.is_zero()
    }

    /// Chain id implied by `v` alone.
    ///
    /// - unsigned: `v` itself,
    /// - `v` is 27, 28 or below 35: no chain id, the signature predates EIP-155,
    /// - otherwise: `(v - 1) / 2 - 17`, the inverse of `v = 35 + 2 * chain_id + y_parity`.
    pub fn inferred_chain_id(&self) -> Option<U256> {
        if self.is_unsigned() {
            Some(self.v)
        } else if self.v < U256::from(35) {
            None
        } else {
            Some((self.v - U256::from(1)) / U256::from(2) - U256::from(17))
        }
    }
}

/// Base offset of the historic encoding bucket `v` falls into.
fn v_offset(v: U256) -> U256 {
    let offset = if v > U256::from(38) {
        0
    } else {
        match v.to::<u64>() {
            35..=38 => 35,
            31..=34 => 31,
            27..=30 => 27,
            _ => 0,
        }
    };
    U256::from(offset)
}

impl Transaction {
    /// Chain id implied by the signature's `v`. See [TxSignature::inferred_chain_id].
    pub fn inferred_chain_id(&self) -> Option<U256> {
        self.signature.inferred_chain_id()
    }

    /// Undoes the offset and the EIP-155 chain id folding of `v`.
    ///
    /// Returns the normalized `v` together with the chain id of the signing preimage: the
    /// explicit chain id if non-zero, otherwise the inferred one. The chain id removed from
    /// `v` may differ, since an explicit chain id that does not fit `v` falls through to
    /// the inferred one.
    fn normalize_v(&self) -> (U256, Option<U256>) {
        let v = self.signature.v;
        let mut offset = v_offset(v);

        let explicit = self.chain_id.filter(|chain_id| !chain_id.is_zero());
        let inferred = self.inferred_chain_id();
        let signing_chain_id = explicit.or(inferred);

        for chain_id in explicit.into_iter().chain(inferred) {
            let folded = chain_id
                .checked_mul(U256::from(2))
                .and_then(|double| double.checked_add(offset));
            if let Some(folded) = folded.filter(|folded| v >= *folded) {
                trace!("v={v}: removing offset {offset} and chain id {chain_id}");
                return (v - folded, signing_chain_id);
            }
        }

        if offset > v {
            offset = U256::ZERO;
        }
        trace!("v={v}: removing offset {offset}, no chain id");
        (v - offset, signing_chain_id)
    }

    /// Recovers the public key that signed this transaction.
    ///
    /// Fails with [Error::InvalidSignature] if either `r` or `s` is zero. In particular an
    /// unsigned transaction never reaches the curve.
    pub fn recover_public_key(&self) -> Result<K256PublicKey, Error> {
        let TxSignature { r, s, .. } = self.signature;
        if r.is_zero() || s.is_zero() {
            return Err(Error::InvalidSignature);
        }

        let (normalized_v, signing_chain_id) = self.normalize_v();
        if normalized_v > U256::from(u8::MAX) {
            debug!("normalized v {normalized_v} does not fit a recovery id");
            return Err(Error::UnsupportedRecoveryId(normalized_v));
        }
        let signature = marshal_signature(
            normalized_v.to::<u8>(),
            B256::from(r.to_be_bytes::<32>()),
            B256::from(s.to_be_bytes::<32>()),
        )?;

        let hash = keccak(self.signing_payload(signing_chain_id)?);
        recover_public_key(&hash, &signature).inspect_err(|err| {
            debug!("recovery failed for signing hash {hash}: {err}");
        })
    }

    /// Recovers the address of the account that signed this transaction.
    pub fn sender(&self) -> Result<Address, Error> {
        let public_key = self.recover_public_key()?;
        Ok(public_key_to_address(&public_key))
    }
}
