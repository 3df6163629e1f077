use crate::signals::InterimGameSignals;
use crate::types::game_context::DiscountContext;

pub fn compute_discount(interim: &InterimGameSignals) -> DiscountContext {
    discount_from_percent(interim.appdetails.discount_percent)
}

pub fn discount_from_percent(raw_percent: i64) -> DiscountContext {
    let discount_percent = raw_percent.clamp(0, 100);
    DiscountContext {
        discount_percent,
        discount_signal: discount_percent as f64 / 100.0,
    }
}
