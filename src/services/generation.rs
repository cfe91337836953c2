/// Monotonic request counter. Starting a fetch advances it; a result is applied
/// only if it carries the current value, so late responses from a superseded
/// selection are dropped.
#[derive(Debug, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}

/// Pending available-times fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub generation: u64,
    pub date: String,
    pub service_id: i64,
}

/// Pending professionals fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessionalQuery {
    pub generation: u64,
    pub service_id: i64,
}
