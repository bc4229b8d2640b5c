pub mod booking;
pub mod schedule;

use kernel::model::{
    id::TimeSlotId,
    time_slot::{TimeSlot, TimeSlotCatalog},
};
use shared::error::{AppError, AppResult};

// slot_ids 列はカタログの ID だけを保持するので、読み出し時にカタログで解決する
pub(crate) fn resolve_slots(
    catalog: &TimeSlotCatalog,
    slot_ids: &[i32],
) -> AppResult<Vec<TimeSlot>> {
    let mut slots = slot_ids
        .iter()
        .map(|id| {
            catalog.get(TimeSlotId::new(*id)).ok_or_else(|| {
                AppError::ConversionEntityError(format!(
                    "stored time slot {id} is not in the catalog"
                ))
            })
        })
        .collect::<AppResult<Vec<_>>>()?;
    slots.sort_by_key(|s| (s.start_hour, s.id));
    Ok(slots)
}

pub(crate) fn slot_id_column(slots: &[TimeSlot]) -> Vec<i32> {
    slots.iter().map(|s| s.id.raw()).collect()
}
