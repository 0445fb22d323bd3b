pub mod order;
pub mod time;

pub use order::{Order, Side, SignatureType, SignedOrder, VolumeMode};
pub use time::{Clock, SystemClock};
