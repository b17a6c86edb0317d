//! Timestamp formatting

use chrono::{DateTime, Utc};

/// Short human-readable form used by the game front ends (`18/10/2026 08:59`)
pub fn date_display(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y %H:%M").to_string()
}
