//! Pure display derivations.
//!
//! Everything here maps backend-computed fields to labels, colours and
//! percentages. There is no transition logic and no I/O.

mod pagination;
mod progress;
mod stage;

pub use pagination::{Pagination, ELLIPSIS};
pub use progress::{badge_progress, license_progress, license_progress_label, sold_summary};
pub use stage::{resale_label, round_label, stage_badge, BadgeColor, StageBadge};
