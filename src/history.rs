use std::collections::VecDeque;

use crate::error::{ProfileError, Result};
use crate::Measurement;

/// Slots reserved on the first insert; later growth doubles.
pub const INITIAL_SLOTS: usize = 10;

/// What a bounded history does with a record that does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Keep what is there, discard the new measurement.
    #[default]
    DropNewest,
    /// Evict the first-recorded measurement. The summary reference moves with it.
    OverwriteOldest,
    /// Refuse with [`ProfileError::HistoryOverflow`].
    Fail,
}

/// Whether [`History::record`] kept the measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Stored,
    /// A full bounded history discarded it.
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capacity {
    /// Grow as needed. Running out of memory aborts the process.
    #[default]
    Unbounded,
    Bounded { slots: usize, overflow: Overflow },
}

/// Finished measurements in recording order, consumed by a summary.
#[derive(Debug, Default)]
pub struct History {
    entries: VecDeque<Measurement>,
    capacity: Capacity,
}

impl History {
    pub fn new(capacity: Capacity) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn record(&mut self, m: Measurement) -> Result<Recorded> {
        match self.capacity {
            Capacity::Unbounded => {
                if self.entries.capacity() == 0 {
                    self.entries.reserve(INITIAL_SLOTS);
                }
            }
            Capacity::Bounded { slots, overflow } if self.entries.len() >= slots => match overflow {
                Overflow::DropNewest => {
                    log::warn!("history full ({} slots), dropping {:?}", slots, m.title());
                    return Ok(Recorded::Dropped);
                }
                Overflow::OverwriteOldest => {
                    if let Some(old) = self.entries.pop_front() {
                        log::debug!("history full, evicting {:?}", old.title());
                    }
                    if slots == 0 {
                        return Ok(Recorded::Dropped);
                    }
                }
                Overflow::Fail => return Err(ProfileError::HistoryOverflow { capacity: slots }),
            },
            Capacity::Bounded { .. } => {}
        }
        self.entries.push_back(m);
        Ok(Recorded::Stored)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&Measurement> {
        self.entries.front()
    }

    pub fn last(&self) -> Option<&Measurement> {
        self.entries.back()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Measurement> {
        self.entries.iter()
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Remove every measurement, keeping the allocation for the next cycle.
    pub fn take(&mut self) -> Vec<Measurement> {
        self.entries.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Measurement;
    type IntoIter = std::collections::vec_deque::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
