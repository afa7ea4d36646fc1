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

//! RLP encoding of [Transaction]s.
//!
//! The signed form is the list `[nonce, gas_price, gas_limit, to, value, data, v, r, s]`.
//! The signing preimage drops the signature and, if a chain id applies, appends
//! `[chain_id, 0, 0]` as required by EIP-155.

use alloy_primitives::{hex, Address, Bytes, B256, U256};
use alloy_rlp::{Decodable, Encodable, Header, EMPTY_STRING_CODE};
use log::debug;

use super::{Transaction, TransactionKind, TxSignature};
use crate::{keccak::keccak, Error, RlpBytes};

/// Number of list items in a signed legacy transaction.
pub const SIGNED_FIELD_COUNT: usize = 9;

impl Transaction {
    /// Length of the RLP payload of the six unsigned fields.
    fn fields_payload_length(&self, value: &U256) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + value.length()
            + self.data.length()
    }

    fn encode_fields(&self, value: &U256, out: &mut dyn alloy_rlp::BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        value.encode(out);
        self.data.encode(out);
    }

    /// Signing preimage for exactly the given chain id, ignoring the stored one.
    pub(crate) fn signing_payload(&self, chain_id: Option<U256>) -> Result<Vec<u8>, Error> {
        let value = self.value.ok_or(Error::MissingValue)?;

        let mut payload_length = self.fields_payload_length(&value);
        // append chain ID according to EIP-155 if present
        if let Some(chain_id) = chain_id {
            payload_length += chain_id.length() + 1 + 1;
        }

        let mut out =
            Vec::with_capacity(payload_length + alloy_rlp::length_of_length(payload_length));
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.encode_fields(&value, &mut out);
        if let Some(chain_id) = chain_id {
            chain_id.encode(&mut out);
            out.push(EMPTY_STRING_CODE);
            out.push(EMPTY_STRING_CODE);
        }
        Ok(out)
    }

    /// Encodes the signing preimage.
    ///
    /// The chain id is `chain_id` if given, else the explicit chain id of the transaction.
    /// With a chain id the result is the 9-item EIP-155 preimage, without one it is the
    /// 6-item pre-EIP-155 preimage.
    pub fn encode_for_signing(&self, chain_id: Option<U256>) -> Result<Vec<u8>, Error> {
        self.signing_payload(chain_id.or(self.chain_id))
    }

    /// Encodes the signed transaction: the six fields followed by `v`, `r` and `s`.
    pub fn encode_signed(&self) -> Result<Vec<u8>, Error> {
        let value = self.value.ok_or(Error::MissingValue)?;
        let TxSignature { v, r, s } = &self.signature;

        let payload_length =
            self.fields_payload_length(&value) + v.length() + r.length() + s.length();
        let mut out =
            Vec::with_capacity(payload_length + alloy_rlp::length_of_length(payload_length));
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.encode_fields(&value, &mut out);
        v.encode(&mut out);
        r.encode(&mut out);
        s.encode(&mut out);
        Ok(out)
    }

    /// Encodes either the signing preimage or the signed transaction.
    ///
    /// `chain_id` only matters for the preimage; see [Transaction::encode_for_signing].
    pub fn encode(&self, for_signature: bool, chain_id: Option<U256>) -> Result<Vec<u8>, Error> {
        if for_signature {
            self.encode_for_signing(chain_id)
        } else {
            self.encode_signed()
        }
    }

    /// Keccak hash of the signing preimage; this is what the signer signs.
    pub fn signing_hash(&self, chain_id: Option<U256>) -> Result<B256, Error> {
        Ok(keccak(self.encode_for_signing(chain_id)?))
    }

    /// Decodes a signed transaction. The input must hold exactly one 9-item list.
    pub fn decode(raw: &[u8]) -> Result<Self, Error> {
        Ok(Self::decode_bytes(raw)?)
    }

    /// Decodes a signed transaction from hex, with or without the `0x` prefix.
    pub fn from_raw_hex(raw: &str) -> Result<Self, Error> {
        let raw = hex::decode(raw.trim())?;
        Self::decode(&raw)
    }
}

/// A single item of the outer list, before interpretation.
struct RawField<'a> {
    list: bool,
    payload: &'a [u8],
}

impl<'a> RawField<'a> {
    fn decode(buf: &mut &'a [u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if buf.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        let (payload, rest) = buf.split_at(header.payload_length);
        *buf = rest;
        Ok(Self {
            list: header.list,
            payload,
        })
    }

    fn bytes(self) -> alloy_rlp::Result<&'a [u8]> {
        if self.list {
            return Err(alloy_rlp::Error::UnexpectedList);
        }
        Ok(self.payload)
    }

    /// Big-endian unsigned integer; the empty string is zero.
    fn uint(self) -> alloy_rlp::Result<U256> {
        let bytes = self.bytes()?;
        if bytes.is_empty() {
            return Ok(U256::ZERO);
        }
        U256::try_from_be_slice(bytes).ok_or(alloy_rlp::Error::Overflow)
    }

    fn kind(self) -> alloy_rlp::Result<TransactionKind> {
        let bytes = self.bytes()?;
        match bytes.len() {
            0 => Ok(TransactionKind::Create),
            20 => Ok(TransactionKind::Call(Address::from_slice(bytes))),
            len => {
                debug!("rejecting recipient of {len} bytes");
                Err(alloy_rlp::Error::Custom("recipient must be empty or 20 bytes"))
            }
        }
    }
}

/// Only fully signed transactions decode; the 6-item unsigned preimage does not.
/// The decoded transaction carries no explicit chain id.
impl Decodable for Transaction {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        let (mut payload, rest) = buf.split_at(header.payload_length);
        *buf = rest;

        let mut fields = Vec::with_capacity(SIGNED_FIELD_COUNT);
        while !payload.is_empty() {
            fields.push(RawField::decode(&mut payload)?);
        }
        let got = fields.len();
        let fields: [RawField<'_>; SIGNED_FIELD_COUNT] = fields.try_into().map_err(|_| {
            debug!("rejecting transaction list with {got} items");
            alloy_rlp::Error::ListLengthMismatch {
                expected: SIGNED_FIELD_COUNT,
                got,
            }
        })?;
        let [nonce, gas_price, gas_limit, to, value, data, v, r, s] = fields;

        Ok(Transaction {
            nonce: nonce.uint()?,
            gas_price: gas_price.uint()?,
            gas_limit: gas_limit.uint()?,
            to: to.kind()?,
            value: Some(value.uint()?),
            data: Bytes::copy_from_slice(data.bytes()?),
            signature: TxSignature {
                v: v.uint()?,
                r: r.uint()?,
                s: s.uint()?,
            },
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256};
    use hex_literal::hex;

    use super::*;

    // EIP-155 example transaction, nonce 9, chain id 1
    fn eip155_example() -> Transaction {
        Transaction::default()
            .with_nonce(U256::from(9))
            .with_gas_price(U256::from(20_000_000_000u64))
            .with_gas_limit(U256::from(21_000))
            .with_to(address!("3535353535353535353535353535353535353535"))
            .with_value(U256::from(1_000_000_000_000_000_000u64))
    }

    #[test]
    fn eip155_signing_preimage() {
        let tx = eip155_example();
        let expected = hex!("ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080");
        assert_eq!(tx.encode_for_signing(Some(U256::from(1))).unwrap(), expected);
        assert_eq!(
            tx.signing_hash(Some(U256::from(1))).unwrap(),
            b256!("daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53")
        );

        // the stored chain id is used when none is passed
        let tx = tx.with_chain_id(Some(U256::from(1)));
        assert_eq!(tx.encode(true, None).unwrap(), expected);
    }

    #[test]
    fn pre_eip155_signing_preimage() {
        let tx = eip155_example();
        let encoded = tx.encode_for_signing(None).unwrap();
        assert_eq!(
            encoded,
            hex!("e9098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080")
        );
        // six fields never decode
        assert!(matches!(
            Transaction::decode(&encoded),
            Err(Error::MalformedEncoding(alloy_rlp::Error::ListLengthMismatch {
                expected: 9,
                got: 6
            }))
        ));
    }

    #[test]
    fn explicit_chain_id_argument_wins() {
        let tx = eip155_example().with_chain_id(Some(U256::from(5)));
        let preimage = tx.encode_for_signing(Some(U256::from(1))).unwrap();
        assert_eq!(preimage[preimage.len() - 3..], [0x01, 0x80, 0x80]);
        let preimage = tx.encode_for_signing(None).unwrap();
        assert_eq!(preimage[preimage.len() - 3..], [0x05, 0x80, 0x80]);
    }

    #[test]
    fn signed_encoding() {
        let tx = eip155_example().with_signature(TxSignature {
            v: U256::from(37),
            r: U256::from_be_bytes(hex!("28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276")),
            s: U256::from_be_bytes(hex!("67cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83")),
        });
        let raw = hex!("f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83");
        assert_eq!(tx.encode_signed().unwrap(), raw);
        assert_eq!(tx.encode(false, Some(U256::from(5))).unwrap(), raw);
        assert_eq!(
            tx.hash().unwrap(),
            b256!("33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788")
        );
    }

    #[test]
    fn missing_value() {
        let tx = Transaction::default();
        assert!(matches!(tx.encode_signed(), Err(Error::MissingValue)));
        assert!(matches!(tx.encode_for_signing(None), Err(Error::MissingValue)));
        assert!(matches!(tx.encode(true, Some(U256::from(1))), Err(Error::MissingValue)));
    }

    #[test]
    fn roundtrip() {
        let tx = eip155_example()
            .with_data(hex!("deadbeef").to_vec())
            .with_signature(TxSignature {
                v: U256::from(38),
                r: U256::from(0x1234),
                s: U256::MAX,
            });
        let decoded = Transaction::decode(&tx.encode_signed().unwrap()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn roundtrip_create() {
        let tx = Transaction::default()
            .with_value(U256::ZERO)
            .with_data(hex!("6080604052").to_vec())
            .with_signature(TxSignature {
                v: U256::from(27),
                r: U256::from(1),
                s: U256::from(2),
            });
        let encoded = tx.encode_signed().unwrap();
        // nonce, gas price, gas limit, then the empty recipient
        assert_eq!(encoded[1..5], [0x80, 0x80, 0x80, 0x80]);

        let decoded = Transaction::decode(&encoded).unwrap();
        assert_eq!(decoded.to, TransactionKind::Create);
        assert_ne!(decoded.to, TransactionKind::Call(Address::ZERO));
        assert_eq!(decoded, tx);
    }

    #[test]
    fn decode_drops_explicit_chain_id() {
        let tx = eip155_example()
            .with_chain_id(Some(U256::from(1)))
            .with_signature(TxSignature {
                v: U256::from(37),
                r: U256::from(1),
                s: U256::from(1),
            });
        let decoded = Transaction::decode(&tx.encode_signed().unwrap()).unwrap();
        assert_eq!(decoded.intrinsic_chain_id(), None);
        assert_eq!(decoded.inferred_chain_id(), Some(U256::from(1)));
    }

    #[test]
    fn from_raw_hex() {
        let raw = "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";
        let with_prefix = Transaction::from_raw_hex(raw).unwrap();
        let without_prefix = Transaction::from_raw_hex(&raw[2..]).unwrap();
        assert_eq!(with_prefix, without_prefix);
        assert_eq!(with_prefix.signature.v, U256::from(37));
        assert!(matches!(Transaction::from_raw_hex("0xzz"), Err(Error::Hex(_))));
    }

    #[test]
    fn rejects_bad_recipient() {
        // recipient of 19 bytes
        let raw = alloy_rlp::encode(vec![
            Bytes::new(),
            Bytes::new(),
            Bytes::new(),
            Bytes::from(vec![0x35u8; 19]),
            Bytes::new(),
            Bytes::new(),
            Bytes::from(vec![27u8]),
            Bytes::from(vec![1u8]),
            Bytes::from(vec![1u8]),
        ]);
        assert!(matches!(
            Transaction::decode(&raw),
            Err(Error::MalformedEncoding(alloy_rlp::Error::Custom(_)))
        ));
    }

    #[test]
    fn rejects_wrong_arity() {
        let ten: Vec<Bytes> = vec![Bytes::new(); 10];
        assert!(matches!(
            Transaction::decode(&alloy_rlp::encode(ten)),
            Err(Error::MalformedEncoding(alloy_rlp::Error::ListLengthMismatch {
                expected: 9,
                got: 10
            }))
        ));
        let empty: Vec<Bytes> = Vec::new();
        assert!(Transaction::decode(&alloy_rlp::encode(empty)).is_err());
    }

    #[test]
    fn rejects_non_list_and_trailing_data() {
        assert!(matches!(
            Transaction::decode(&hex!("8401020304")),
            Err(Error::MalformedEncoding(alloy_rlp::Error::UnexpectedString))
        ));
        assert!(Transaction::decode(&[]).is_err());

        let tx = eip155_example().with_signature(TxSignature {
            v: U256::from(37),
            r: U256::from(1),
            s: U256::from(1),
        });
        let mut raw = tx.encode_signed().unwrap();
        raw.push(0x00);
        assert!(matches!(
            Transaction::decode(&raw),
            Err(Error::MalformedEncoding(alloy_rlp::Error::Custom("Trailing data")))
        ));
        raw.truncate(raw.len() - 2);
        assert!(Transaction::decode(&raw).is_err());
    }

    #[test]
    fn rejects_nested_list_and_oversized_integer() {
        // data replaced by a list
        let mut out = Vec::new();
        let items: Vec<Vec<u8>> = vec![
            alloy_rlp::encode(U256::ZERO),
            alloy_rlp::encode(U256::ZERO),
            alloy_rlp::encode(U256::ZERO),
            alloy_rlp::encode(TransactionKind::Create),
            alloy_rlp::encode(U256::ZERO),
            alloy_rlp::encode(Vec::<Bytes>::new()),
            alloy_rlp::encode(U256::from(27)),
            alloy_rlp::encode(U256::from(1)),
            alloy_rlp::encode(U256::from(1)),
        ];
        let payload: Vec<u8> = items.concat();
        Header {
            list: true,
            payload_length: payload.len(),
        }
        .encode(&mut out);
        out.extend_from_slice(&payload);
        assert!(matches!(
            Transaction::decode(&out),
            Err(Error::MalformedEncoding(alloy_rlp::Error::UnexpectedList))
        ));

        // 33-byte nonce
        let mut fields = vec![Bytes::new(); SIGNED_FIELD_COUNT];
        fields[0] = Bytes::from(vec![0x01u8; 33]);
        assert!(matches!(
            Transaction::decode(&alloy_rlp::encode(fields)),
            Err(Error::MalformedEncoding(alloy_rlp::Error::Overflow))
        ));
    }

    #[test]
    fn mainnet_legacy() {
        // Tx: 0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060
        let raw = hex!("f86780862d79883d2000825208945df9b87991262f6ba471f09758cde1c0fc1de734827a69801ca088ff6cf0fefd94db46111149ae4bfc179e9b94721fffd821d38d16464b3f71d0a045e0aff800961cfce805daef7016b9b675c137a6a41a548f7b60a3484c06a33a");
        let tx = Transaction::decode(&raw).unwrap();
        assert_eq!(tx.nonce, U256::ZERO);
        assert_eq!(tx.signature.v, U256::from(28));
        assert_eq!(tx.inferred_chain_id(), None);
        assert_eq!(tx.encode_signed().unwrap(), raw);

        assert_eq!(
            tx.hash().unwrap(),
            b256!("5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060")
        );
        assert_eq!(
            tx.sender().unwrap(),
            address!("a1e4380a3b1f749673e270229993ee55f35663b4")
        );
    }

    #[test]
    fn mainnet_eip155() {
        // Tx: 0x4540eb9c46b1654c26353ac3c65e56451f711926982ce1b02f15c50e7459caf7
        let raw = hex!("f870830834a08503c49bfa0483019a2894f0ee707731d1be239f9f482e1b2ea5384c0c426f8806df842eaa9fb8008026a0cadd790a37b78e5613c8cf44dc3002e3d7f06a5325d045963c708efe3f9fdf7aa01f63adb9a2d5e020c6aa0ff64695e25d7d9a780ed8471abe716d2dc0bf7d4259");
        let tx = Transaction::decode(&raw).unwrap();
        assert_eq!(tx.nonce, U256::from(537760));
        assert_eq!(tx.signature.v, U256::from(38));
        assert_eq!(tx.inferred_chain_id(), Some(U256::from(1)));

        assert_eq!(
            tx.tx_id().unwrap(),
            "0x4540eb9c46b1654c26353ac3c65e56451f711926982ce1b02f15c50e7459caf7"
        );
        assert_eq!(
            tx.sender().unwrap(),
            address!("974caa59e49682cda0ad2bbe82983419a2ecc400")
        );
    }
}
