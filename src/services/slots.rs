use crate::models::{Period, SlotGroup};

/// Buckets `HH:MM` strings into periods by hour.
///
/// Groups appear in first-encounter order and slots keep their relative order.
/// Strings whose hour is not a number land in `Other`; a blank hour counts as 0.
/// No dedup, no sorting.
pub fn group_slots_by_period(slots: &[String]) -> Vec<SlotGroup> {
    let mut groups: Vec<SlotGroup> = Vec::new();

    for slot in slots {
        let period = period_of(slot);
        match groups.iter_mut().find(|g| g.period == period) {
            Some(group) => group.slots.push(slot.clone()),
            None => groups.push(SlotGroup {
                period,
                label: period.label().to_string(),
                slots: vec![slot.clone()],
            }),
        }
    }

    groups
}

fn period_of(slot: &str) -> Period {
    let hour_part = slot.split(':').next().unwrap_or_default().trim();
    if hour_part.is_empty() {
        return Period::from_hour(0.0);
    }
    match hour_part.parse::<f64>() {
        Ok(hour) => Period::from_hour(hour),
        Err(_) => Period::Other,
    }
}
