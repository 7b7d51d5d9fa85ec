//! Spreadsheet rows to per-character lock flags.
//!
//! Row 0 of the sheet is a header. Rows 1 through 24 line up with roster ids
//! 1 through 24; anything past that is ignored. A character is locked only
//! when its second cell reads exactly `TRUE`.

use std::collections::BTreeMap;
use std::fmt;

use banpick_roster::ROSTER_SIZE;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

const KEY_PREFIX: &str = "character";

pub fn character_key(id: u8) -> String {
    format!("{KEY_PREFIX}{id}")
}

fn parse_character_key(key: &str) -> Option<u8> {
    key.strip_prefix(KEY_PREFIX)?.parse().ok()
}

/// Lock flags for every roster slot, rebuilt from scratch on each read.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusMap([bool; ROSTER_SIZE]);

impl StatusMap {
    pub fn get(&self, id: u8) -> Option<bool> {
        let index = usize::from(id).checked_sub(1)?;
        self.0.get(index).copied()
    }

    /// Ids outside 1..=24 are ignored.
    pub fn set(&mut self, id: u8, checked: bool) {
        if let Some(slot) = usize::from(id)
            .checked_sub(1)
            .and_then(|index| self.0.get_mut(index))
        {
            *slot = checked;
        }
    }

    pub fn checked_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.0
            .iter()
            .zip(1u8..)
            .filter_map(|(checked, id)| checked.then_some(id))
    }
}

impl fmt::Debug for StatusMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.checked_ids()).finish()
    }
}

impl Serialize for StatusMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ROSTER_SIZE))?;
        for (checked, id) in self.0.iter().zip(1u8..) {
            map.serialize_entry(&character_key(id), checked)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatusMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        let mut status = StatusMap::default();
        for (key, checked) in raw {
            if let Some(id) = parse_character_key(&key) {
                status.set(id, checked);
            }
        }
        Ok(status)
    }
}

/// The formatted read returns the string `TRUE`; an unformatted read of a
/// checkbox returns a JSON boolean.
pub fn is_checked(cell: &Value) -> bool {
    match cell {
        Value::String(text) => text == "TRUE",
        Value::Bool(checked) => *checked,
        _ => false,
    }
}

pub fn status_from_rows(rows: &[Vec<Value>]) -> StatusMap {
    let mut status = StatusMap::default();
    for (row, id) in rows.iter().skip(1).take(ROSTER_SIZE).zip(1u8..) {
        status.set(id, row.get(1).is_some_and(is_checked));
    }
    status
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusResponse {
    pub status: StatusMap,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}
