use chrono::NaiveDateTime;
use tracing::warn;

use crate::config::{LAST_UPDATED_DISPLAY_FORMAT, LAST_UPDATED_STORED_FORMAT};

/// Last refresh time as shown to the user. A value that does not parse is
/// passed through untouched instead of failing the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastUpdated {
    Formatted(String),
    RawFallback(String),
}

impl LastUpdated {
    pub fn from_raw(raw: &str) -> Self {
        match NaiveDateTime::parse_from_str(raw, LAST_UPDATED_STORED_FORMAT) {
            Ok(parsed) => {
                LastUpdated::Formatted(parsed.format(LAST_UPDATED_DISPLAY_FORMAT).to_string())
            }
            Err(e) => {
                warn!(raw = %raw, "last_updated is not a timestamp, showing raw value: {e}");
                LastUpdated::RawFallback(raw.to_string())
            }
        }
    }

    pub fn into_string(self) -> String {
        match self {
            LastUpdated::Formatted(s) | LastUpdated::RawFallback(s) => s,
        }
    }
}
