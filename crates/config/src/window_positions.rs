//! Remembered window frames, keyed by window id (usually the document path)

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::overridable::{KeyPolicy, OverridableSet};

pub const FILE_NAME: &str = "window_positions.json";

/// Entries not touched for this long are dropped on save
pub const DEFAULT_MAX_AGE_DAYS: i64 = 90;

/// Largest accepted max age, roughly a century
pub const MAX_AGE_DAYS_LIMIT: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub updated: DateTime<Utc>,
}

pub type WindowPositions = OverridableSet<WindowPosition>;

/// No built-in entries
pub fn factory() -> Arc<BTreeMap<String, WindowPosition>> {
    Arc::new(BTreeMap::new())
}

pub fn empty_window_positions() -> WindowPositions {
    OverridableSet::shared(factory(), KeyPolicy::Open)
}

/// Record where a window is, stamped with `now`
pub fn remember(positions: &mut WindowPositions, id: &str, frame: (i32, i32, u32, u32), now: DateTime<Utc>) {
    let (x, y, width, height) = frame;
    // Open set: `set` cannot fail
    let _ = positions.set(
        id,
        WindowPosition {
            x,
            y,
            width,
            height,
            updated: now,
        },
    );
}

/// Drop entries last updated before `now - max_age`. Returns how many went.
/// A cutoff before the earliest representable time keeps everything.
pub fn prune(positions: &mut WindowPositions, max_age: Duration, now: DateTime<Utc>) -> usize {
    let Some(cutoff) = now.checked_sub_signed(max_age) else {
        return 0;
    };
    let stale: Vec<String> = positions
        .iter()
        .filter(|(_, pos)| pos.updated < cutoff)
        .map(|(id, _)| id.clone())
        .collect();
    for id in &stale {
        positions.remove(id);
    }
    if !stale.is_empty() {
        log::debug!("pruned {} stale window positions", stale.len());
    }
    stale.len()
}
