use chrono::{DateTime, FixedOffset, Utc};

/// UTC offset of the shop's local timezone (Asia/Bangkok, no DST).
pub const SHOP_UTC_OFFSET_HOURS: i32 = 7;

/// Returns the shop's fixed UTC offset.
pub fn shop_offset() -> FixedOffset {
    // UTC+7 is always inside FixedOffset's valid range
    FixedOffset::east_opt(SHOP_UTC_OFFSET_HOURS * 3600).expect("valid fixed offset")
}

/// Converts a UTC timestamp into shop-local time.
pub fn to_shop_local(at: DateTime<Utc>) -> DateTime<FixedOffset> {
    at.with_timezone(&shop_offset())
}

/// Current time in the shop's local timezone.
pub fn shop_now() -> DateTime<FixedOffset> {
    to_shop_local(Utc::now())
}
