pub mod signer;

pub use signer::{ExchangeDomain, WalletSigner};
