use log::{error, info};

pub fn log_rejection(reason: &str) {
    error!("❌ Rejected: {}", reason);
}

pub fn log_submitted(market_id: &str, side: &str, price: &str) {
    info!("📤 {} {} @ {}", side, market_id, price);
}

pub fn log_success(msg: &str) {
    info!("✅ {}", msg);
}
