//! Transition priorities.
//!
//! Any `Ord` type can serve as a priority. Lower values fire first: once a
//! transition of some priority fires for a source state, transitions of lower
//! priority from that state are not considered in the same round.

use serde::{Deserialize, Serialize};

/// A ready-made five level priority scale.
///
/// Variants are declared from highest to lowest priority, so the derived
/// ordering puts `Highest` first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Highest,
    High,
    #[default]
    Normal,
    Low,
    Lowest,
}

/// Hands out priorities of decreasing rank in declaration order.
///
/// Using `u32` priorities drawn from a sequence makes a machine
/// deterministic: a transition declared earlier always outranks one declared
/// later. The counter is an explicit value scoped to one build session.
///
/// # Example
///
/// ```rust
/// use polystate::core::PrioritySequence;
///
/// let mut sequence = PrioritySequence::new();
/// let first = sequence.next_priority();
/// let second = sequence.next_priority();
/// assert!(first < second);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PrioritySequence {
    next: u32,
}

impl PrioritySequence {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Start counting at `first`.
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// The next priority, lower in rank than every priority handed out before.
    pub fn next_priority(&mut self) -> u32 {
        let priority = self.next;
        self.next = self.next.saturating_add(1);
        priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_sorts_first() {
        let mut priorities = vec![
            Priority::Lowest,
            Priority::Normal,
            Priority::Highest,
            Priority::Low,
            Priority::High,
        ];
        priorities.sort();

        assert_eq!(
            priorities,
            vec![
                Priority::Highest,
                Priority::High,
                Priority::Normal,
                Priority::Low,
                Priority::Lowest
            ]
        );
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn priority_serializes_correctly() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        let deserialized: Priority = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Priority::High);
    }

    #[test]
    fn sequence_is_strictly_increasing() {
        let mut sequence = PrioritySequence::starting_at(10);
        assert_eq!(sequence.next_priority(), 10);
        assert_eq!(sequence.next_priority(), 11);
        assert_eq!(sequence.next_priority(), 12);
    }

    #[test]
    fn sequence_saturates() {
        let mut sequence = PrioritySequence::starting_at(u32::MAX);
        assert_eq!(sequence.next_priority(), u32::MAX);
        assert_eq!(sequence.next_priority(), u32::MAX);
    }
}
