//! Shop status schedule and override.
//!
//! The shop's voice channel advertises whether the shop is currently open.
//! The effective status comes from a fixed weekly schedule in shop-local time
//! (Asia/Bangkok), unless an explicit override is set; the scheduler applies
//! the result to the channel name once a minute.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Channel name prefix; the effective status is appended, e.g.
/// `shop-status-open`.
pub const SHOP_CHANNEL_PREFIX: &str = "shop-status";

/// Whether the shop is open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopStatus {
    Open,
    Closed,
}

impl ShopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// The scheduled status for a given shop-local time.
///
/// Opening hours: Mon-Fri 17:00-21:00, Sat 13:00-20:00, Sun 08:30-20:00.
pub fn scheduled_status(now: DateTime<FixedOffset>) -> ShopStatus {
    let minutes = now.hour() * 60 + now.minute();

    let open = match now.weekday() {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => {
            (17 * 60..21 * 60).contains(&minutes)
        }
        Weekday::Sat => (13 * 60..20 * 60).contains(&minutes),
        Weekday::Sun => (8 * 60 + 30..20 * 60).contains(&minutes),
    };

    if open {
        ShopStatus::Open
    } else {
        ShopStatus::Closed
    }
}

/// Channel name for an effective status.
pub fn channel_name(status: ShopStatus) -> String {
    format!("{}-{}", SHOP_CHANNEL_PREFIX, status.as_str())
}

/// Service holding the manual shop status override.
///
/// Cheap to clone; the override is shared through `Arc`.
#[derive(Clone)]
pub struct ShopStatusService {
    manual_override: Arc<RwLock<Option<ShopStatus>>>,
}

impl ShopStatusService {
    /// Creates the service with no override set.
    pub fn new() -> Self {
        Self {
            manual_override: Arc::new(RwLock::new(None)),
        }
    }

    /// Forces the shop status regardless of the schedule.
    pub async fn set_override(&self, status: ShopStatus) {
        *self.manual_override.write().await = Some(status);
    }

    /// Clears the override; the schedule takes effect again.
    pub async fn clear_override(&self) {
        *self.manual_override.write().await = None;
    }

    /// Whether an override is currently set.
    pub async fn is_overridden(&self) -> bool {
        self.manual_override.read().await.is_some()
    }

    /// The effective status at the given shop-local time: the override when
    /// set, the schedule otherwise.
    pub async fn effective_status(&self, now: DateTime<FixedOffset>) -> ShopStatus {
        match *self.manual_override.read().await {
            Some(status) => status,
            None => scheduled_status(now),
        }
    }
}

impl Default for ShopStatusService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::server::util::clock::shop_offset;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        // 2026-08-03 is a Monday
        shop_offset()
            .with_ymd_and_hms(2026, 8, day, hour, minute, 0)
            .unwrap()
    }

    /// Tests the weekday opening boundaries.
    ///
    /// Expected: closed at 16:59, open from 17:00, closed again at 21:00
    #[test]
    fn weekday_boundaries() {
        assert_eq!(scheduled_status(at(3, 16, 59)), ShopStatus::Closed);
        assert_eq!(scheduled_status(at(3, 17, 0)), ShopStatus::Open);
        assert_eq!(scheduled_status(at(3, 20, 59)), ShopStatus::Open);
        assert_eq!(scheduled_status(at(3, 21, 0)), ShopStatus::Closed);
    }

    /// Tests the Saturday opening hours.
    ///
    /// Expected: open 13:00-19:59, closed outside
    #[test]
    fn saturday_boundaries() {
        assert_eq!(scheduled_status(at(8, 12, 59)), ShopStatus::Closed);
        assert_eq!(scheduled_status(at(8, 13, 0)), ShopStatus::Open);
        assert_eq!(scheduled_status(at(8, 19, 59)), ShopStatus::Open);
        assert_eq!(scheduled_status(at(8, 20, 0)), ShopStatus::Closed);
    }

    /// Tests the Sunday half-hour opening boundary.
    ///
    /// Expected: closed at 08:29, open from 08:30 until 20:00
    #[test]
    fn sunday_boundaries() {
        assert_eq!(scheduled_status(at(9, 8, 29)), ShopStatus::Closed);
        assert_eq!(scheduled_status(at(9, 8, 30)), ShopStatus::Open);
        assert_eq!(scheduled_status(at(9, 19, 59)), ShopStatus::Open);
        assert_eq!(scheduled_status(at(9, 20, 0)), ShopStatus::Closed);
    }

    /// Tests that the override wins over the schedule and can be cleared.
    ///
    /// Expected: forced open outside opening hours, schedule restored after
    /// clearing
    #[tokio::test]
    async fn override_beats_schedule() {
        let service = ShopStatusService::new();
        let closed_time = at(3, 6, 0);

        assert_eq!(service.effective_status(closed_time).await, ShopStatus::Closed);

        service.set_override(ShopStatus::Open).await;
        assert_eq!(service.effective_status(closed_time).await, ShopStatus::Open);
        assert!(service.is_overridden().await);

        service.clear_override().await;
        assert_eq!(service.effective_status(closed_time).await, ShopStatus::Closed);
        assert!(!service.is_overridden().await);
    }

    /// Tests the channel naming convention.
    ///
    /// Expected: `shop-status-open` / `shop-status-closed`
    #[test]
    fn channel_names_follow_status() {
        assert_eq!(channel_name(ShopStatus::Open), "shop-status-open");
        assert_eq!(channel_name(ShopStatus::Closed), "shop-status-closed");
    }
}
