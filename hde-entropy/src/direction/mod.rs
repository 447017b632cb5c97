// hde-entropy/src/direction/mod.rs
use crate::entropy::binary_entropy;

/// Relative position of a head with respect to its dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The head occurs earlier in the sentence than the dependent.
    HeadBefore,
    /// The head occurs later in the sentence than the dependent.
    HeadAfter,
}

impl Direction {
    /// Classifies a dependency from the 1-based positions of dependent and head.
    ///
    /// Returns `None` for a self loop (equal positions), which has no direction.
    pub fn classify(dependent: u32, head: u32) -> Option<Self> {
        match head.cmp(&dependent) {
            core::cmp::Ordering::Less => Some(Direction::HeadBefore),
            core::cmp::Ordering::Greater => Some(Direction::HeadAfter),
            core::cmp::Ordering::Equal => None,
        }
    }
}

/// Head-before / head-after tallies for one conditioning key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionCount {
    pub head_before: u64,
    pub head_after: u64,
}

impl DirectionCount {
    pub fn new(head_before: u64, head_after: u64) -> Self {
        Self { head_before, head_after }
    }

    pub fn record(&mut self, direction: Direction) {
        match direction {
            Direction::HeadBefore => self.head_before += 1,
            Direction::HeadAfter => self.head_after += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.head_before + self.head_after
    }

    /// Share of observations in which the head follows the dependent.
    pub fn head_after_ratio(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.head_after as f64 / total as f64),
        }
    }

    /// Binary entropy of the direction distribution, in bits.
    ///
    /// Undefined (`None`) when nothing has been recorded.
    pub fn entropy(&self) -> Option<f64> {
        self.head_after_ratio().map(binary_entropy)
    }
}
