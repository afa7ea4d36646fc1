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

//! Thin wrappers around [k256] for recoverable ECDSA signatures.

use alloy_primitives::{Address, B256, U256};
use k256::{
    ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey as K256VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
    PublicKey as K256PublicKey,
};

use crate::{keccak::keccak, Error};

/// Length of a marshalled recoverable signature: `v ‖ r ‖ s`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Packs `v`, `r` and `s` into a recoverable signature laid out as `v ‖ r ‖ s`.
///
/// `v` may use any of the historic offsets 27, 31 or 35; it is folded down to the raw
/// recovery id in `0..=3`. Any other value is rejected.
pub fn marshal_signature(v: u8, r: B256, s: B256) -> Result<[u8; SIGNATURE_LENGTH], Error> {
    let recovery_id = match v {
        27..=30 => v - 27,
        31..=34 => v - 31,
        35..=38 => v - 35,
        0..=3 => v,
        _ => return Err(Error::UnsupportedRecoveryId(U256::from(v))),
    };

    let mut signature = [0u8; SIGNATURE_LENGTH];
    signature[0] = recovery_id;
    signature[1..33].copy_from_slice(r.as_slice());
    signature[33..].copy_from_slice(s.as_slice());
    Ok(signature)
}

/// Recovers the public key that produced `signature` over the prehashed message `hash`.
pub fn recover_public_key(
    hash: &B256,
    signature: &[u8; SIGNATURE_LENGTH],
) -> Result<K256PublicKey, Error> {
    let recovery_id = RecoveryId::from_byte(signature[0])
        .ok_or(Error::UnsupportedRecoveryId(U256::from(signature[0])))?;
    let signature = K256Signature::from_slice(&signature[1..]).map_err(Error::RecoveryFailure)?;

    let verify_key =
        K256VerifyingKey::recover_from_prehash(hash.as_slice(), &signature, recovery_id)
            .map_err(Error::RecoveryFailure)?;

    Ok(K256PublicKey::from(&verify_key))
}

/// Derives the account address of a public key: the last 20 bytes of the Keccak hash of
/// its uncompressed encoding, without the `0x04` tag.
pub fn public_key_to_address(public_key: &K256PublicKey) -> Address {
    let public_key = public_key.to_encoded_point(false);
    let public_key = public_key.as_bytes();
    debug_assert_eq!(public_key[0], 0x04);
    let hash = keccak(&public_key[1..]);

    Address::from_slice(&hash[12..])
}
