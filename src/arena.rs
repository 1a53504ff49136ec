//! Slot arena with stable indices.
//!
//! Matrix cells never move once allocated: the doubly-linked rings of the matrix store
//! arena indices instead of pointers, so an index stays valid for the whole lifetime of
//! the arena (until the tail holding it is released). Released slots are recycled by
//! later allocations, which keeps the storage compact when a matrix is cleared and
//! refilled.
use std::cmp::min;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    occupied: bool,
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    data: Vec<Entry<T>>,
    /// Index of the first *possibly* free (non-occupied) slot.
    min_free: usize,
    /// Number of occupied slots.
    real_size: usize,
}

impl<T> Arena<T> {
    /// Create an empty arena with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            min_free: 0,
            real_size: 0,
        }
    }

    /// Get the number of occupied slots.
    pub fn real_size(&self) -> usize {
        self.real_size
    }

    fn is_occupied(&self, index: usize) -> bool {
        index < self.data.len() && self.data[index].occupied
    }

    /// Store `value` in the first free slot and return its index.
    pub fn alloc(&mut self, value: T) -> usize {
        let index = (self.min_free..self.data.len()).find(|&i| !self.data[i].occupied);
        let index = match index {
            Some(i) => {
                self.data[i] = Entry { value, occupied: true };
                i
            }
            None => {
                self.data.push(Entry { value, occupied: true });
                self.data.len() - 1
            }
        };

        self.min_free = index + 1;
        self.real_size += 1;

        index
    }

    /// Release every slot at index `start` or above.
    ///
    /// Values stay in place until their slot is reallocated.
    pub fn free_from(&mut self, start: usize) {
        for i in start..self.data.len() {
            if self.data[i].occupied {
                self.data[i].occupied = false;
                self.real_size -= 1;
            }
        }
        self.min_free = min(self.min_free, start);
    }
}

impl<T> Index<usize> for Arena<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(self.is_occupied(index), "Slot {} is not occupied", index);
        &self.data[index].value
    }
}

impl<T> IndexMut<usize> for Arena<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        debug_assert!(self.is_occupied(index), "Slot {} is not occupied", index);
        &mut self.data[index].value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc() {
        let mut arena = Arena::with_capacity(2);
        assert_eq!(arena.alloc(10), 0);
        assert_eq!(arena.alloc(20), 1);
        assert_eq!(arena.alloc(30), 2);
        assert_eq!(arena.real_size(), 3);
        assert_eq!(arena[1], 20);
    }

    #[test]
    fn test_free_from_and_reuse() {
        let mut arena = Arena::with_capacity(6);
        for i in 0..6 {
            arena.alloc(i);
        }
        arena.free_from(2);
        assert_eq!(arena.real_size(), 2);
        assert!(!arena.is_occupied(2));

        // Released slots are recycled before the arena grows.
        assert_eq!(arena.alloc(100), 2);
        assert_eq!(arena.alloc(200), 3);
        assert_eq!(arena[0], 0);
        assert_eq!(arena[2], 100);
        assert_eq!(arena.real_size(), 4);
        assert_eq!(arena.data.len(), 6);
    }

    #[test]
    fn test_free_from_everything() {
        let mut arena = Arena::with_capacity(0);
        arena.alloc('a');
        arena.alloc('b');
        arena.free_from(0);
        assert_eq!(arena.real_size(), 0);
        assert_eq!(arena.alloc('c'), 0);
    }
}
