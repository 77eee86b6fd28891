//! Cron jobs for automated tasks.
//!
//! Two schedulers run alongside the API: the expiry sweep (verification
//! attempts and abandoned close flows) and the shop status renamer. Both run
//! once a minute and log-and-continue on failure.

pub mod expiry;
pub mod shop_status;
