use anyhow::Result;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip712::{Eip712, TypedData};
use ethers::types::{Address, H256, Signature};
use serde_json::json;

use crate::config::{CHAIN_ID, EXCHANGE_ADDRESS, EXCHANGE_NAME, EXCHANGE_VERSION};
use crate::domain::Order;
use crate::execution::errors::OrderError;

/// The fixed EIP-712 domain the exchange verifier checks orders against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: String,
}

impl Default for ExchangeDomain {
    fn default() -> Self {
        Self {
            name: EXCHANGE_NAME.to_string(),
            version: EXCHANGE_VERSION.to_string(),
            chain_id: CHAIN_ID,
            verifying_contract: EXCHANGE_ADDRESS.to_string(),
        }
    }
}

/// Holds the owner private key for the lifetime of the process and signs
/// canonical orders under the exchange domain.
#[derive(Debug, Clone)]
pub struct WalletSigner {
    wallet: LocalWallet,
}

impl WalletSigner {
    pub fn new(private_key: &str, chain_id: u64) -> Result<Self> {
        let wallet: LocalWallet = private_key.parse()?;
        Ok(Self {
            wallet: wallet.with_chain_id(chain_id),
        })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Signs the order's EIP-712 digest, returning the raw 65-byte r‖s‖v
    /// signature as 0x-hex.
    ///
    /// The exchange expects the raw form next to the explicit signatureType
    /// tag, not the signer-prefixed packed encoding (see
    /// [`packed_signature`]).
    pub fn sign_order(&self, order: &Order, domain: &ExchangeDomain) -> Result<String, OrderError> {
        let typed = order_typed_data(order, domain)?;
        let digest = typed.encode_eip712().map_err(OrderError::signing)?;
        let sig = self
            .wallet
            .sign_hash(H256::from(digest))
            .map_err(OrderError::signing)?;
        Ok(encode_signature(&sig))
    }
}

/// Builds the typed-data envelope the verifier reconstructs: domain separator
/// plus the fixed 12-field Order schema, in contract field order.
fn order_typed_data(order: &Order, domain: &ExchangeDomain) -> Result<TypedData, OrderError> {
    let typed_json = json!({
        "types": {
            "EIP712Domain": [
                {"name": "name", "type": "string"},
                {"name": "version", "type": "string"},
                {"name": "chainId", "type": "uint256"},
                {"name": "verifyingContract", "type": "address"}
            ],
            "Order": [
                {"name": "salt", "type": "uint256"},
                {"name": "maker", "type": "address"},
                {"name": "signer", "type": "address"},
                {"name": "taker", "type": "address"},
                {"name": "tokenId", "type": "uint256"},
                {"name": "makerAmount", "type": "uint256"},
                {"name": "takerAmount", "type": "uint256"},
                {"name": "expiration", "type": "uint256"},
                {"name": "nonce", "type": "uint256"},
                {"name": "feeRateBps", "type": "uint256"},
                {"name": "side", "type": "uint8"},
                {"name": "signatureType", "type": "uint8"}
            ]
        },
        "primaryType": "Order",
        "domain": {
            "name": domain.name,
            "version": domain.version,
            "chainId": domain.chain_id,
            "verifyingContract": domain.verifying_contract.to_ascii_lowercase(),
        },
        "message": {
            "salt": order.salt,
            "maker": format!("{:?}", order.maker),
            "signer": format!("{:?}", order.signer),
            "taker": format!("{:?}", order.taker),
            "tokenId": order.token_id,
            "makerAmount": order.maker_amount,
            "takerAmount": order.taker_amount,
            "expiration": order.expiration,
            "nonce": order.nonce,
            "feeRateBps": order.fee_rate_bps,
            "side": order.side.as_u8(),
            "signatureType": order.signature_type.as_u8(),
        }
    });

    serde_json::from_value(typed_json).map_err(OrderError::signing)
}

/// Packs r (32) + s (32) + v (1) into the 65-byte hex form the API expects.
fn encode_signature(sig: &Signature) -> String {
    let mut bytes = [0u8; 65];
    sig.r.to_big_endian(&mut bytes[0..32]);
    sig.s.to_big_endian(&mut bytes[32..64]);
    bytes[64] = sig.v as u8;
    format!("0x{}", hex::encode(bytes))
}

/// Signer-prefixed packed encoding: 20-byte signer address followed by the
/// raw signature. The submission path does not use this — the API takes the
/// raw signature plus the signatureType tag — but some contract-wallet
/// verifiers resolve the owner from this form.
pub fn packed_signature(signer: Address, raw_signature: &str) -> Result<String, OrderError> {
    let stripped = raw_signature.strip_prefix("0x").unwrap_or(raw_signature);
    let sig_bytes = hex::decode(stripped)
        .map_err(|_| OrderError::validation("signature", "not valid hex"))?;
    if sig_bytes.len() != 65 {
        return Err(OrderError::validation(
            "signature",
            format!("expected 65 bytes, got {}", sig_bytes.len()),
        ));
    }
    Ok(format!(
        "0x{}{}",
        hex::encode(signer.as_bytes()),
        hex::encode(sig_bytes)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time::{Clock, FixedClock};
    use crate::domain::Side;
    use crate::execution::builder::{build_order, OrderParams};

    const TEST_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe512961708279f2e3e8a5d4b8e3e974";

    fn signer() -> WalletSigner {
        WalletSigner::new(TEST_KEY, CHAIN_ID).unwrap()
    }

    fn order_at(millis: u128) -> Order {
        let clock = FixedClock { millis };
        build_order(
            &OrderParams::new(
                "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
                "987654321",
                "9900000000000000000",
                "10000000000000000000",
                Side::Sell,
            ),
            &clock,
        )
        .unwrap()
    }

    #[test]
    fn signing_is_deterministic() {
        let s = signer();
        let domain = ExchangeDomain::default();
        let order = order_at(1_700_000_000_000);
        let a = s.sign_order(&order, &domain).unwrap();
        let b = s.sign_order(&order, &domain).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("0x"));
        assert_eq!(a.len(), 2 + 130);
    }

    #[test]
    fn different_salt_different_signature() {
        let s = signer();
        let domain = ExchangeDomain::default();
        let a = s.sign_order(&order_at(1), &domain).unwrap();
        let b = s.sign_order(&order_at(2), &domain).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn different_domain_different_signature() {
        let s = signer();
        let order = order_at(1);
        let a = s.sign_order(&order, &ExchangeDomain::default()).unwrap();
        let other = ExchangeDomain {
            chain_id: 137,
            ..ExchangeDomain::default()
        };
        let b = s.sign_order(&order, &other).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn signature_recovers_to_signer() {
        let s = signer();
        let domain = ExchangeDomain::default();
        let order = order_at(42);
        let raw = s.sign_order(&order, &domain).unwrap();

        let typed = order_typed_data(&order, &domain).unwrap();
        let digest = H256::from(typed.encode_eip712().unwrap());
        let sig: Signature = raw.parse().unwrap();
        assert_eq!(sig.recover(digest).unwrap(), s.address());
    }

    #[test]
    fn packed_form_prefixes_the_signer() {
        let s = signer();
        let raw = s
            .sign_order(&order_at(7), &ExchangeDomain::default())
            .unwrap();
        let packed = packed_signature(s.address(), &raw).unwrap();
        assert_eq!(packed.len(), 2 + 40 + 130);
        assert!(packed[2..42].eq_ignore_ascii_case(&hex::encode(s.address().as_bytes())));
        assert!(packed.ends_with(raw.strip_prefix("0x").unwrap()));
    }

    #[test]
    fn packed_form_rejects_short_signatures() {
        let err = packed_signature(Address::zero(), "0x1234").unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation { field: "signature", .. }
        ));
    }

    #[test]
    fn clock_is_used_for_salt() {
        let clock = FixedClock { millis: 555 };
        assert_eq!(clock.now_millis(), 555);
        assert_eq!(order_at(555).salt, ethers::types::U256::from(555u64));
    }
}
