//! Test utilities and shared test helpers for HugBot.
//!
//! Fixtures and helpers used by unit and integration tests across the
//! workspace. Enabled through the `testing` feature.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a fixed timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Discord-related test utilities.
pub mod discord_fixtures {
    use crate::{ChannelId, UserId};

    /// The bot's own user ID in tests.
    pub fn bot_user_id() -> UserId {
        UserId(111111111111111111)
    }

    /// Create a test DM channel ID.
    pub fn test_channel_id() -> ChannelId {
        ChannelId(123456789012345678)
    }

    /// Create a test user ID.
    pub fn test_user_id() -> UserId {
        UserId(987654321098765432)
    }

    /// Create multiple test user IDs.
    pub fn test_user_ids(count: usize) -> Vec<UserId> {
        (0..count)
            .map(|i| UserId(100000000000000000 + i as u64))
            .collect()
    }
}

/// Property-based testing utilities using proptest.
#[cfg(any(test, feature = "proptest"))]
pub mod property_testing {
    use crate::UserId;
    use proptest::prelude::*;

    /// Strategy for generating valid Discord user IDs.
    pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
        (100000000000000000u64..=999999999999999999u64).prop_map(UserId)
    }

    /// Strategy for generating valid username strings.
    pub fn username_strategy() -> impl Strategy<Value = String> {
        r"[a-zA-Z0-9_]{3,32}".prop_map(|s| s.to_string())
    }
}
