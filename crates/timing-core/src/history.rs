//! Elapsed-lap-time to track-position samples for the tracked car.

/// Number of slots; 2400 x 100 ms covers a lap of up to four minutes.
pub const HISTORY_SLOTS: usize = 2400;

/// Width of one slot in milliseconds.
pub const BUCKET_MS: u32 = 100;

/// Slot for `elapsed_ms`, or `None` past the end of the buffer.
pub fn bucket_index(elapsed_ms: u32) -> Option<usize> {
    let index = usize::try_from(elapsed_ms / BUCKET_MS).ok()?;
    (index < HISTORY_SLOTS).then_some(index)
}

/// Fixed-size table of track positions indexed by elapsed lap time.
///
/// Slots are overwritten as new laps pass through them and are not cleared
/// between laps, so after the first lap every slot holds the most recent
/// sample for that moment of the lap. A slot that was never written reads as
/// no sample.
#[derive(Debug, Clone)]
pub struct PositionHistoryBuffer {
    slots: Vec<Option<f32>>,
}

impl Default for PositionHistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionHistoryBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![None; HISTORY_SLOTS],
        }
    }

    /// Store `position_m` for `elapsed_ms`. Samples past the end are dropped.
    ///
    /// Returns whether the sample was stored.
    pub fn record(&mut self, elapsed_ms: u32, position_m: f32) -> bool {
        let Some(slot) = bucket_index(elapsed_ms).and_then(|i| self.slots.get_mut(i)) else {
            return false;
        };
        *slot = Some(position_m);
        true
    }

    /// Sample stored in slot `index`.
    pub fn slot(&self, index: usize) -> Option<f32> {
        self.slots.get(index).copied().flatten()
    }

    /// Sample covering `elapsed_ms`.
    pub fn position_at(&self, elapsed_ms: u32) -> Option<f32> {
        bucket_index(elapsed_ms).and_then(|i| self.slot(i))
    }

    /// Number of slots holding a sample.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Forget every sample, e.g. when a different car becomes tracked.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }
}
