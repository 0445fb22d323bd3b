use std::fmt;
use std::str::FromStr;

use ethers::types::{Address, U256};

/// Order direction. Encoded as `0` / `1` in the signed struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(format!("side must be BUY or SELL, got {other:?}")),
        }
    }
}

/// Which user input drives the order volume: a share count priced through the
/// limit price, or a currency amount taken verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeMode {
    Shares,
    Amount,
}

impl FromStr for VolumeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SHARES" => Ok(VolumeMode::Shares),
            "AMOUNT" => Ok(VolumeMode::Amount),
            other => Err(format!("volume mode must be SHARES or AMOUNT, got {other:?}")),
        }
    }
}

/// Signature scheme variant tag understood by the exchange verifier.
///
/// Orders produced here always carry [`SignatureType::SafeOwner`]: the maker
/// is a contract wallet and the signature comes from its owner key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SignatureType {
    Eoa = 0,
    ProxyWallet = 1,
    SafeOwner = 2,
}

impl SignatureType {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

/// The canonical signable order record. Field set and ordering match the
/// exchange contract's `Order` struct; amounts are always 18-decimal base
/// units by the time they land here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub salt: U256,
    pub maker: Address,
    pub signer: Address,
    pub taker: Address,
    pub token_id: U256,
    pub maker_amount: U256,
    pub taker_amount: U256,
    pub expiration: U256,
    pub nonce: U256,
    pub fee_rate_bps: U256,
    pub side: Side,
    pub signature_type: SignatureType,
}

/// An [`Order`] plus its raw 65-byte EIP-712 signature as 0x-hex. Never
/// mutated after signing.
#[derive(Debug, Clone)]
pub struct SignedOrder {
    pub order: Order,
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
        assert!("hold".parse::<Side>().is_err());
    }

    #[test]
    fn side_wire_encoding() {
        assert_eq!(Side::Buy.as_u8(), 0);
        assert_eq!(Side::Sell.as_u8(), 1);
        assert_eq!(Side::Sell.as_str(), "SELL");
    }

    #[test]
    fn safe_owner_tag_is_two() {
        assert_eq!(SignatureType::SafeOwner.as_u8(), 2);
    }
}
