/// Time-range preset resolution and persistence.
///
/// The dashboard's charts are scoped to a named preset (last 24 hours,
/// 7 days, 30 days) or an explicit custom date pair. Non-custom presets are
/// recomputed from "now" on every resolution so the same preset yields a
/// different absolute range each time it is used. The current selection is
/// persisted via `SelectionStore` and restored on construction.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{SelectionStore, StorageError};

// ---------------------------------------------------------------------------
// Presets and concrete ranges
// ---------------------------------------------------------------------------

/// Named time-range presets offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRangePreset {
    #[serde(rename = "24h")]
    Last24h,
    #[serde(rename = "7d")]
    Last7d,
    #[serde(rename = "30d")]
    Last30d,
    #[serde(rename = "custom")]
    Custom,
}

impl TimeRangePreset {
    /// Canonical short name, as used in cache keys and persisted selections.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRangePreset::Last24h => "24h",
            TimeRangePreset::Last7d => "7d",
            TimeRangePreset::Last30d => "30d",
            TimeRangePreset::Custom => "custom",
        }
    }
}

impl std::fmt::Display for TimeRangePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete calendar bounds produced by resolving a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The persisted selection: preset plus the last explicitly set custom pair.
/// Custom dates are retained even while a named preset is active, so
/// switching back to `custom` restores the previous pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeSelection {
    pub preset: TimeRangePreset,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Error)]
pub enum TimeRangeError {
    #[error("invalid custom range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("custom preset selected but no custom range was ever set")]
    NoCustomRange,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Holds the active selection for one storage key and persists every change.
#[derive(Debug)]
pub struct TimeRangeResolver {
    store: SelectionStore,
    storage_key: String,
    selection: TimeRangeSelection,
}

impl TimeRangeResolver {
    /// Restores the persisted selection for `storage_key`, falling back to
    /// `default_preset` when nothing was ever saved.
    pub fn restore(
        store: SelectionStore,
        storage_key: &str,
        default_preset: TimeRangePreset,
    ) -> Result<Self, TimeRangeError> {
        let selection = store
            .load::<TimeRangeSelection>(storage_key)?
            .unwrap_or(TimeRangeSelection {
                preset: default_preset,
                start_date: None,
                end_date: None,
            });
        Ok(Self {
            store,
            storage_key: storage_key.to_string(),
            selection,
        })
    }

    pub fn selection(&self) -> &TimeRangeSelection {
        &self.selection
    }

    pub fn preset(&self) -> TimeRangePreset {
        self.selection.preset
    }

    /// Switches to `preset` and persists the selection. Custom dates set
    /// earlier are kept so `custom` can be re-selected later.
    pub fn set_preset(&mut self, preset: TimeRangePreset) -> Result<(), TimeRangeError> {
        self.selection.preset = preset;
        self.persist()
    }

    /// Sets an explicit date pair and switches the preset to `custom`.
    ///
    /// A pair with `start > end` is rejected with `InvalidRange` and leaves
    /// both the in-memory and the persisted selection untouched. Swapping
    /// the values silently would guess at the user's intent.
    pub fn set_custom_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), TimeRangeError> {
        if start > end {
            return Err(TimeRangeError::InvalidRange { start, end });
        }
        self.selection.preset = TimeRangePreset::Custom;
        self.selection.start_date = Some(start);
        self.selection.end_date = Some(end);
        self.persist()
    }

    /// Resolves the current preset against an explicit `now`.
    ///
    /// Named presets span exactly their duration ending at `now`. A custom
    /// selection spans its stored dates inclusively, from midnight of the
    /// start date to the last second of the end date (UTC).
    pub fn resolve_at(&self, now: DateTime<Utc>) -> Result<TimeRange, TimeRangeError> {
        let range = match self.selection.preset {
            TimeRangePreset::Last24h => TimeRange {
                start: now - Duration::hours(24),
                end: now,
            },
            TimeRangePreset::Last7d => TimeRange {
                start: now - Duration::days(7),
                end: now,
            },
            TimeRangePreset::Last30d => TimeRange {
                start: now - Duration::days(30),
                end: now,
            },
            TimeRangePreset::Custom => {
                let (start, end) = match (self.selection.start_date, self.selection.end_date) {
                    (Some(s), Some(e)) => (s, e),
                    _ => return Err(TimeRangeError::NoCustomRange),
                };
                TimeRange {
                    start: start.and_time(NaiveTime::MIN).and_utc(),
                    end: end.and_time(NaiveTime::MIN).and_utc() + Duration::days(1)
                        - Duration::seconds(1),
                }
            }
        };
        Ok(range)
    }

    /// Resolves the current preset against the wall clock.
    pub fn resolve(&self) -> Result<TimeRange, TimeRangeError> {
        self.resolve_at(Utc::now())
    }

    fn persist(&self) -> Result<(), TimeRangeError> {
        self.store.save(&self.storage_key, &self.selection)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
