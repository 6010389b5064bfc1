use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const FULL_DAY_LABEL: &str = "Full Day";
const DEFAULT_REASON: &str = "No reason provided";

/// Either one half-hour slot or the whole day.
///
/// Stored as a string: `"Full Day"` or `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BlockSlot {
    FullDay,
    At(NaiveTime),
}

impl fmt::Display for BlockSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockSlot::FullDay => f.write_str(FULL_DAY_LABEL),
            BlockSlot::At(time) => write!(f, "{}", time.format("%H:%M")),
        }
    }
}

impl Serialize for BlockSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == FULL_DAY_LABEL {
            return Ok(BlockSlot::FullDay);
        }
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .map(BlockSlot::At)
            .map_err(|_| D::Error::custom(format!("invalid time slot: {raw}")))
    }
}

/// Composite key for the blocked-time map. Uniqueness and overwrite
/// semantics live here: inserting an existing key replaces the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockKey {
    pub date: NaiveDate,
    pub slot: BlockSlot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockedTime {
    pub id: String,
    pub date: NaiveDate,
    pub time: BlockSlot,
    pub reason: String,
    pub is_full_day: bool,
}

impl BlockedTime {
    pub fn new(date: NaiveDate, slot: BlockSlot, reason: &str) -> Self {
        let id = match slot {
            BlockSlot::FullDay => format!("{date}-full-day"),
            BlockSlot::At(time) => format!("{}-{}", date, time.format("%H:%M")),
        };
        let reason = if reason.trim().is_empty() {
            DEFAULT_REASON.to_string()
        } else {
            reason.to_string()
        };
        Self {
            id,
            date,
            time: slot,
            reason,
            is_full_day: matches!(slot, BlockSlot::FullDay),
        }
    }

    pub fn key(&self) -> BlockKey {
        BlockKey {
            date: self.date,
            slot: self.time,
        }
    }
}
