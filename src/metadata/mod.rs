//! Metadata extraction from decoded replay event streams
//!
//! Reduces one ordered event sequence into [`MatchMetadata`]: the replay
//! times at which the game clock hit 0:00 and the post-game screen came up,
//! plus the name/slot mappings the match builder needs to relabel
//! combat-log-addressed data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prefix carried by hero units in the entity-state channel.
const HERO_UNIT_PREFIX: &str = "CDOTA_Unit_Hero_";

/// Prefix used by combat-log hero identifiers.
const COMBAT_LOG_PREFIX: &str = "npc_dota_hero_";

/// Game rules state: the clock reached 0:00 and play began.
const GAME_STATE_PLAYING: i64 = 5;

/// Game rules state: post game.
const GAME_STATE_POST_GAME: i64 = 6;

/// One timestamped record from the decoded event stream.
///
/// The decoder's entry shape varies by replay version, so fields an older
/// decoder may omit are optional and tags this extractor does not understand
/// deserialize to [`Entry::Unknown`] instead of failing the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Entry {
    /// Game rules state transition from the combat log channel.
    #[serde(rename = "DOTA_COMBATLOG_GAME_STATE")]
    GameState { time: i64, value: i64 },

    /// Per-tick entity-state sample for one player slot.
    #[serde(rename = "interval")]
    Interval {
        time: i64,
        #[serde(default)]
        hero_id: Option<u32>,
        #[serde(default)]
        unit: Option<String>,
        #[serde(default)]
        slot: Option<u8>,
    },

    /// Slot number (0-9) to playerslot (0-4, 128-132) assignment.
    #[serde(rename = "player_slot")]
    PlayerSlot { time: i64, key: u8, value: u8 },

    /// Any tag from a newer stream version; ignored.
    #[serde(other)]
    Unknown,
}

/// Structured metadata for one match, reduced from its event stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    /// Replay time at which the game clock was 0:00.
    pub game_zero: i64,
    /// Replay time of the transition to post game.
    pub game_end: i64,
    /// Combat-log hero identifier to slot. Holds up to two keys per hero
    /// because the combat log is inconsistent about camelCase flattening.
    pub hero_to_slot: HashMap<String, u8>,
    /// Slot number to canonical playerslot encoding.
    pub slot_to_playerslot: HashMap<u8, u8>,
}

impl MatchMetadata {
    /// Repeated transitions overwrite: the last matching one wins.
    fn apply_game_state(&mut self, time: i64, value: i64) {
        if value == GAME_STATE_PLAYING {
            self.game_zero = time;
        } else if value == GAME_STATE_POST_GAME {
            self.game_end = time;
        }
    }

    fn record_hero_slot(&mut self, unit: &str, slot: u8) {
        if let Some((plain, flattened)) = combat_log_names(unit) {
            self.hero_to_slot.insert(plain, slot);
            self.hero_to_slot.insert(flattened, slot);
        }
    }
}

/// Extract match metadata from an ordered event sequence.
///
/// Total over any input: unrecognized entry types are skipped, and entries
/// missing the fields their handler needs are skipped for that handler only.
/// Ordering by `time` is the caller's responsibility.
pub fn extract_metadata<I>(entries: I) -> MatchMetadata
where
    I: IntoIterator<Item = Entry>,
{
    let mut meta = MatchMetadata::default();
    for entry in entries {
        match entry {
            Entry::GameState { time, value } => meta.apply_game_state(time, value),
            Entry::Interval {
                hero_id: Some(_),
                unit: Some(unit),
                slot: Some(slot),
                ..
            } => meta.record_hero_slot(&unit, slot),
            // interval ticks for unresolved or non-hero units
            Entry::Interval { .. } => {}
            Entry::PlayerSlot { key, value, .. } => {
                meta.slot_to_playerslot.insert(key, value);
            }
            Entry::Unknown => {}
        }
    }
    meta
}

/// Derive both combat-log spellings of a hero unit name.
///
/// The combat log may or may not flatten camelCase with underscores, so the
/// slot is mapped under both the plain-lowercased suffix and the flattened
/// one. The suffix's first character is always uppercase and is lowercased
/// without a leading underscore. Returns `None` for units outside the hero
/// prefix.
fn combat_log_names(unit: &str) -> Option<(String, String)> {
    let suffix = unit.strip_prefix(HERO_UNIT_PREFIX)?;
    let plain = format!("{}{}", COMBAT_LOG_PREFIX, suffix.to_lowercase());

    let mut flattened = String::with_capacity(suffix.len() + 4);
    for (i, c) in suffix.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            flattened.push('_');
        }
        for lower in c.to_lowercase() {
            flattened.push(lower);
        }
    }
    Some((plain, format!("{}{}", COMBAT_LOG_PREFIX, flattened)))
}
