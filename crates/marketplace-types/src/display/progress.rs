//! Progress percentages for licenses and badge tiers.

use crate::models::{Badge, Product};

/// Share of licenses sold, as a whole percentage in `0..=100`.
///
/// `remaining` above `total` is clamped; a product without licenses is at 0.
pub fn license_progress(total: u32, remaining: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let sold = total - remaining.min(total);
    ((f64::from(sold) / f64::from(total)) * 100.0).round() as u32
}

/// [`license_progress`] rendered as `"NN%"`.
pub fn license_progress_label(total: u32, remaining: u32) -> String {
    format!("{}%", license_progress(total, remaining))
}

/// `"60 / 100 sold"`
pub fn sold_summary(product: &Product) -> String {
    format!("{} / {} sold", product.sold_licenses(), product.total_licenses)
}

/// Percentage of `amount` within a badge's `[min, max]` window.
///
/// Open-ended badges (no `max`) are complete as soon as `min` is reached.
pub fn badge_progress(badge: &Badge, amount: f64) -> u32 {
    let min = badge.min_amount;
    let Some(max) = badge.max_amount else {
        return if amount >= min { 100 } else { 0 };
    };
    if max <= min {
        return if amount >= min { 100 } else { 0 };
    }
    let ratio = ((amount - min) / (max - min)).clamp(0.0, 1.0);
    (ratio * 100.0).round() as u32
}
