use std::collections::{BTreeMap, HashSet};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

use crate::model::id::TimeSlotId;

/// A fixed hour-long window `[start_hour, end_hour)` drawn from the shared catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeSlot {
    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.start_hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

/// Static registry of bookable time slots.
#[derive(Debug, Clone)]
pub struct TimeSlotCatalog {
    slots: BTreeMap<TimeSlotId, TimeSlot>,
}

impl TimeSlotCatalog {
    const FIRST_HOUR: u32 = 8;
    const LAST_HOUR: u32 = 23;

    pub fn new(slots: Vec<TimeSlot>) -> AppResult<Self> {
        let mut map = BTreeMap::new();
        for slot in slots {
            if slot.start_hour >= slot.end_hour || slot.end_hour > Self::LAST_HOUR {
                return Err(AppError::ValidationError(format!(
                    "time slot {} has an invalid hour range {}-{}",
                    slot.id, slot.start_hour, slot.end_hour
                )));
            }
            if map.insert(slot.id, slot).is_some() {
                return Err(AppError::ValidationError(format!(
                    "time slot id {} is registered twice",
                    slot.id
                )));
            }
        }
        Ok(Self { slots: map })
    }

    /// Daily grid 08-09 .. 22-23, ids 1..=15.
    pub fn standard() -> Self {
        let slots = (Self::FIRST_HOUR..Self::LAST_HOUR)
            .enumerate()
            .map(|(i, hour)| {
                (
                    TimeSlotId::new(i as i32 + 1),
                    TimeSlot {
                        id: TimeSlotId::new(i as i32 + 1),
                        start_hour: hour,
                        end_hour: hour + 1,
                    },
                )
            })
            .collect();
        Self { slots }
    }

    pub fn get(&self, id: TimeSlotId) -> Option<TimeSlot> {
        self.slots.get(&id).copied()
    }

    pub fn find_by_hours(&self, start_hour: u32, end_hour: u32) -> Option<TimeSlot> {
        self.slots
            .values()
            .find(|s| s.start_hour == start_hour && s.end_hour == end_hour)
            .copied()
    }

    pub fn all(&self) -> Vec<TimeSlot> {
        let mut slots: Vec<TimeSlot> = self.slots.values().copied().collect();
        slots.sort_by_key(|s| (s.start_hour, s.id));
        slots
    }

    // スケジュールに載せる時間枠の集合を検証し、開始時刻順に並べて返す
    pub fn resolve(&self, ids: &[TimeSlotId]) -> AppResult<Vec<TimeSlot>> {
        if ids.is_empty() {
            return Err(AppError::ValidationError(
                "a schedule needs at least one time slot".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let mut slots = Vec::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(*id) {
                return Err(AppError::ValidationError(format!(
                    "time slot {id} is listed more than once"
                )));
            }
            let slot = self.get(*id).ok_or_else(|| {
                AppError::ValidationError(format!("time slot {id} does not exist"))
            })?;
            slots.push(slot);
        }
        slots.sort_by_key(|s| (s.start_hour, s.id));
        Ok(slots)
    }
}

impl Default for TimeSlotCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
