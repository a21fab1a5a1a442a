/*!
 * Ready Queue
 * Bounded circular FIFO of jobs awaiting or returning from execution
 */

use crate::core::errors::{SchedulerError, SchedulerResult};

/// Fixed-capacity circular queue
///
/// `front` and `rear` wrap modulo capacity; `len` is tracked separately so
/// empty (`len == 0`) and full (`len == capacity`) never share a state.
/// The queue also carries the completed-job counter of the running pass.
#[derive(Debug)]
pub struct ReadyQueue<T> {
    slots: Box<[Option<T>]>,
    front: usize,
    rear: usize,
    len: usize,
    completed: usize,
}

impl<T> ReadyQueue<T> {
    /// Create an empty queue; a zero capacity rejects every enqueue
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            front: 0,
            rear: 0,
            len: 0,
            completed: 0,
        }
    }

    /// Append at the tail
    pub fn enqueue(&mut self, item: T) -> SchedulerResult<()> {
        if self.is_full() {
            return Err(SchedulerError::QueueFull {
                capacity: self.capacity(),
            });
        }

        self.slots[self.rear] = Some(item);
        self.rear = (self.rear + 1) % self.capacity();
        self.len += 1;
        Ok(())
    }

    /// Remove and return the head
    pub fn dequeue(&mut self) -> SchedulerResult<T> {
        if self.is_empty() {
            return Err(SchedulerError::QueueEmpty);
        }

        let item = self.slots[self.front].take();
        self.front = (self.front + 1) % self.capacity();
        self.len -= 1;
        item.ok_or(SchedulerError::QueueEmpty)
    }

    /// Peek at the head
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            self.slots[self.front].as_ref()
        }
    }

    /// Drop every queued item and zero the completed counter
    ///
    /// Only called between passes.
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.front = 0;
        self.rear = 0;
        self.len = 0;
        self.completed = 0;
    }

    /// Iterate from head to tail
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        (0..self.len).filter_map(move |offset| self.slots[(self.front + offset) % capacity].as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Jobs reported finished during the current pass
    #[inline]
    pub fn completed(&self) -> usize {
        self.completed
    }

    #[inline]
    pub(crate) fn mark_completed(&mut self) {
        self.completed += 1;
    }
}
