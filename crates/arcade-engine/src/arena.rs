//! Index-stable entity storage with mark-then-compact removal.
//!
//! Games keep their coins, obstacles, and particles in an [`Arena`]. Removal
//! never happens while iterating: a pass marks entries dead through
//! [`SlotMut::kill`], and a later [`Arena::compact`] drops them in one sweep.
//! Indices handed out by [`Arena::push`] stay valid until the next compaction.
//! [`Arena::len`] counts live entries and is current after every kill.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::ops::{Deref, DerefMut};

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Slot<T> {
    value: T,
    alive: bool,
}

/// Mutable view of one live entry during iteration.
///
/// Dereferences to the value. Calling [`kill`](Self::kill) marks the entry
/// for removal at the next [`Arena::compact`]; the value stays readable until
/// then.
pub struct SlotMut<'a, T> {
    index: usize,
    value: &'a mut T,
    alive: &'a mut bool,
    // Shared by every slot of one `iter_mut` pass.
    live: &'a Cell<usize>,
}

impl<T> SlotMut<'_, T> {
    /// Mark this entry dead and drop it from the arena's live count.
    /// Idempotent.
    pub fn kill(&mut self) {
        if *self.alive {
            *self.alive = false;
            self.live.set(self.live.get() - 1);
        }
    }

    /// Whether the entry is still live (not yet killed in this pass).
    pub fn is_alive(&self) -> bool {
        *self.alive
    }

    /// Stable index of this entry.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Deref for SlotMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
    }
}

impl<T> DerefMut for SlotMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// A vector of entries with tombstones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// Append a live entry and return its index.
    pub fn push(&mut self, value: T) -> usize {
        self.slots.push(Slot { value, alive: true });
        self.live += 1;
        self.slots.len() - 1
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots including tombstones awaiting compaction.
    pub fn capacity_used(&self) -> usize {
        self.slots.len()
    }

    /// Live entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots
            .get(index)
            .filter(|slot| slot.alive)
            .map(|slot| &slot.value)
    }

    /// Mutable live entry at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots
            .get_mut(index)
            .filter(|slot| slot.alive)
            .map(|slot| &mut slot.value)
    }

    /// Mark the entry at `index` dead. Returns `false` if it was not live.
    pub fn kill(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.alive => {
                slot.alive = false;
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    /// Iterate live entries.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots
            .iter()
            .filter(|slot| slot.alive)
            .map(|slot| &slot.value)
    }

    /// Iterate live entries mutably, with the ability to mark them dead.
    ///
    /// Entries killed during this pass are not visited again by later passes
    /// and leave [`len`](Self::len) right away, but their slots stay in place
    /// until [`compact`](Self::compact).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = SlotMut<'_, T>> {
        let live = Cell::from_mut(&mut self.live);
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(move |(index, slot)| {
                let Slot { value, alive } = slot;
                SlotMut {
                    index,
                    value,
                    alive,
                    live,
                }
            })
    }

    /// Mark every live entry matching `pred` dead.
    pub fn kill_where(&mut self, mut pred: impl FnMut(&T) -> bool) {
        for mut slot in self.iter_mut() {
            if pred(&*slot) {
                slot.kill();
            }
        }
    }

    /// Drop tombstones. Invalidates previously returned indices.
    ///
    /// Returns the number of entries removed.
    pub fn compact(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.alive);
        self.live = self.slots.len();
        before - self.live
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.live = 0;
    }
}

impl<T> FromIterator<T> for Arena<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arena = Arena::new();
        for value in iter {
            arena.push(value);
        }
        arena
    }
}

impl<T> Extend<T> for Arena<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_stable_indices() {
        let mut arena = Arena::new();
        let a = arena.push("a");
        let b = arena.push("b");
        let c = arena.push("c");
        assert_eq!((a, b, c), (0, 1, 2));

        assert!(arena.kill(b));
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), None);
        assert_eq!(arena.get(c), Some(&"c"));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.capacity_used(), 3);
    }

    #[test]
    fn double_kill_is_reported() {
        let mut arena = Arena::new();
        let a = arena.push(1);
        assert!(arena.kill(a));
        assert!(!arena.kill(a));
        assert!(!arena.kill(99));
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn kill_during_iteration_then_compact() {
        let mut arena: Arena<i32> = (0..10).collect();
        for mut slot in arena.iter_mut() {
            *slot *= 10;
            if *slot % 20 == 0 {
                slot.kill();
            }
        }
        // Killed entries are still in place until compaction.
        assert_eq!(arena.capacity_used(), 10);
        let removed = arena.compact();
        assert_eq!(removed, 5);
        assert_eq!(arena.iter().copied().collect::<Vec<_>>(), vec![10, 30, 50, 70, 90]);
    }

    #[test]
    fn len_tracks_kills_made_during_iteration() {
        let mut arena: Arena<i32> = (0..6).collect();
        for mut slot in arena.iter_mut() {
            if *slot % 3 == 0 {
                slot.kill();
                slot.kill();
            }
        }
        assert_eq!(arena.len(), 4);
        assert_eq!(arena.capacity_used(), 6);

        let mut slots: Vec<_> = arena.iter_mut().collect();
        for slot in &mut slots {
            slot.kill();
        }
        drop(slots);
        assert!(arena.is_empty());
        assert_eq!(arena.compact(), 6);
        assert!(arena.is_empty());
    }

    #[test]
    fn killed_entries_are_skipped_by_later_passes() {
        let mut arena: Arena<i32> = (0..4).collect();
        arena.kill_where(|v| *v < 2);
        assert_eq!(arena.len(), 2);
        let visited: Vec<usize> = arena.iter_mut().map(|slot| slot.index()).collect();
        assert_eq!(visited, vec![2, 3]);
    }

    #[test]
    fn get_mut_ignores_dead_entries() {
        let mut arena = Arena::new();
        let i = arena.push(5);
        *arena.get_mut(i).unwrap() += 1;
        assert_eq!(arena.get(i), Some(&6));
        arena.kill(i);
        assert!(arena.get_mut(i).is_none());
    }

    #[test]
    fn clear_empties_everything() {
        let mut arena: Arena<u8> = (0..3).collect();
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.capacity_used(), 0);
    }
}
