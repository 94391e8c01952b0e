//! Subtitle timeline navigation
//!
//! Pure algorithms over an ordered cue list: finding the adjacent or current
//! cue from a playback position and applying a global timing offset. Cue lists
//! are owned by the host; every operation here reads a slice and offset
//! application returns a fresh list.

use serde::{Deserialize, Serialize};

/// Milliseconds on the media clock (signed, offsets can move cues before zero)
pub type Timestamp = i64;

/// Zero-based subtitle track index
pub type TrackIndex = usize;

/// Offset change applied by a single fine-grained offset step
pub const OFFSET_STEP_MS: Timestamp = 100;

/// One subtitle entry
///
/// `start`/`end` are the displayed times with the current offset applied,
/// `original_start`/`original_end` are the source times and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub text: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub original_start: Timestamp,
    pub original_end: Timestamp,
    #[serde(default)]
    pub track: TrackIndex,
}

impl Cue {
    /// Create a cue with no offset applied
    pub fn new(text: impl Into<String>, start: Timestamp, end: Timestamp, track: TrackIndex) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            original_start: start,
            original_end: end,
            track,
        }
    }

    /// Offset currently applied to this cue
    pub fn offset(&self) -> Timestamp {
        self.start.saturating_sub(self.original_start)
    }

    /// Whether `time` falls inside `[start, end)`
    pub fn contains(&self, time: Timestamp) -> bool {
        self.start <= time && time < self.end
    }

    /// Both displayed timestamps are on the playable part of the clock
    pub fn is_seekable(&self) -> bool {
        self.start >= 0 && self.end >= 0
    }
}

/// Find the nearest cue before or after `time`
///
/// Forward returns the cue with the closest start strictly after `time`.
/// Backward looks at cues starting strictly before `time`; when the closest of
/// those is still playing at `time`, the cue listed before it is returned
/// instead, so "previous" skips the cue being watched. Ties keep the earliest
/// listed cue.
pub fn find_adjacent_cue(cues: &[Cue], time: Timestamp, forward: bool) -> Option<&Cue> {
    let mut adjacent: Option<usize> = None;
    let mut min_diff: Option<Timestamp> = None;

    for (i, cue) in cues.iter().enumerate() {
        let diff = if forward {
            cue.start.saturating_sub(time)
        } else {
            time.saturating_sub(cue.start)
        };

        if matches!(min_diff, Some(min) if min <= diff) {
            continue;
        }

        if forward && time < cue.start {
            min_diff = Some(diff);
            adjacent = Some(i);
        } else if !forward && time > cue.start {
            min_diff = Some(diff);
            adjacent = Some(if time < cue.end { i.saturating_sub(1) } else { i });
        }
    }

    adjacent.map(|i| &cues[i])
}

/// Find the cue playing at `time`
///
/// Cues with negative timestamps are ignored. When cues overlap the one that
/// started most recently wins.
pub fn current_cue(cues: &[Cue], time: Timestamp) -> Option<&Cue> {
    let mut current = None;
    let mut min_diff = Timestamp::MAX;

    for cue in cues.iter().filter(|c| c.is_seekable() && c.contains(time)) {
        let diff = time - cue.start;
        if diff < min_diff {
            current = Some(cue);
            min_diff = diff;
        }
    }

    current
}

/// Offset shared by the whole list, or zero for an empty list
pub fn current_offset(cues: &[Cue]) -> Timestamp {
    cues.first().map(Cue::offset).unwrap_or(0)
}

/// Return a copy of `cues` shifted by `offset` relative to the original times
pub fn apply_offset(cues: &[Cue], offset: Timestamp) -> Vec<Cue> {
    cues.iter()
        .map(|cue| Cue {
            start: cue.original_start.saturating_add(offset),
            end: cue.original_end.saturating_add(offset),
            ..cue.clone()
        })
        .collect()
}

/// Drop any applied offset
pub fn reset_offset(cues: &[Cue]) -> Vec<Cue> {
    apply_offset(cues, 0)
}

/// Move the current offset one step of `step` milliseconds
pub fn step_offset_by(cues: &[Cue], increase: bool, step: Timestamp) -> Vec<Cue> {
    let current = current_offset(cues);
    let offset = if increase {
        current.saturating_add(step)
    } else {
        current.saturating_sub(step)
    };
    apply_offset(cues, offset)
}

/// Move the current offset by [`OFFSET_STEP_MS`]
pub fn step_offset(cues: &[Cue], increase: bool) -> Vec<Cue> {
    step_offset_by(cues, increase, OFFSET_STEP_MS)
}

/// Offset that lines the adjacent cue's original start up with `time`
///
/// Returns `None` when there is no cue in that direction.
pub fn offset_to_adjacent_cue(cues: &[Cue], time: Timestamp, forward: bool) -> Option<Timestamp> {
    find_adjacent_cue(cues, time, forward).map(|cue| time.saturating_sub(cue.original_start))
}
