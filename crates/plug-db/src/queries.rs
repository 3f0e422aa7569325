//! Database query functions organized by table.

pub mod analytics;
pub mod entrants;
pub mod referral_visits;
