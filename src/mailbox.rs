//! Single-slot, newest-value-wins mailbox.
//!
//! A [`Mailbox`] holds at most one pending value. Sending never blocks and
//! never fails: a new value silently replaces whatever was still unread.
//! Receiving is a zero-timeout poll that empties the slot.
//!
//! This is the channel between the counter and each digit renderer. The
//! renderers only ever care about the latest count, so dropping stale values
//! is the contract, not an accident of queue capacity.
//!
//! # Example
//!
//! ```rust
//! use rs_sevseg::Mailbox;
//!
//! let mailbox = Mailbox::new();
//! mailbox.send(1u16);
//! mailbox.send(2u16); // 1 is gone
//!
//! assert_eq!(mailbox.peek(), Some(2));
//! assert_eq!(mailbox.try_receive(), Some(2));
//! assert_eq!(mailbox.try_receive(), None);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Single-slot mailbox with overwrite-on-send semantics.
///
/// # Thread Safety
///
/// The slot is guarded by a `Mutex` held only for the duration of a swap,
/// so a send and a receive are each atomic with respect to the other. Share
/// it with `Arc<Mailbox<T>>` between one producer and one consumer.
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Mailbox<T> {
    /// Creates an empty mailbox.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Publishes `value`, replacing any unread value.
    ///
    /// Returns the value that was discarded, if there was one.
    pub fn send(&self, value: T) -> Option<T> {
        self.lock().replace(value)
    }

    /// Takes the pending value, leaving the slot empty.
    ///
    /// Returns `None` when nothing was sent since the last receive.
    pub fn try_receive(&self) -> Option<T> {
        self.lock().take()
    }

    /// Returns true if a value is waiting to be received.
    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        // A panic while holding the lock cannot leave the slot half-written.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Mailbox<T> {
    /// Returns a copy of the pending value without consuming it.
    pub fn peek(&self) -> Option<T> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn new_mailbox_is_empty() {
        let mailbox: Mailbox<u16> = Mailbox::new();
        assert!(!mailbox.is_pending());
        assert_eq!(mailbox.try_receive(), None);
        assert_eq!(mailbox.peek(), None);
    }

    #[test]
    fn newest_value_wins() {
        let mailbox = Mailbox::new();
        assert_eq!(mailbox.send(1), None);
        assert_eq!(mailbox.send(2), Some(1));

        assert_eq!(mailbox.try_receive(), Some(2));
        assert_eq!(mailbox.try_receive(), None);
    }

    #[test]
    fn receive_empties_slot() {
        let mailbox = Mailbox::new();
        mailbox.send(7);
        assert!(mailbox.is_pending());

        assert_eq!(mailbox.try_receive(), Some(7));
        assert!(!mailbox.is_pending());
    }

    #[test]
    fn peek_does_not_consume() {
        let mailbox = Mailbox::new();
        mailbox.send(42);

        assert_eq!(mailbox.peek(), Some(42));
        assert_eq!(mailbox.peek(), Some(42));
        assert_eq!(mailbox.try_receive(), Some(42));
        assert_eq!(mailbox.peek(), None);
    }

    #[test]
    fn send_after_receive_refills() {
        let mailbox = Mailbox::new();
        mailbox.send(1);
        mailbox.try_receive();
        mailbox.send(2);
        assert_eq!(mailbox.try_receive(), Some(2));
    }

    #[test]
    fn receiver_never_sees_older_than_last_send() {
        let mailbox = Arc::new(Mailbox::new());
        let producer = {
            let mailbox = Arc::clone(&mailbox);
            thread::spawn(move || {
                for value in 0..10_000u32 {
                    mailbox.send(value);
                }
            })
        };

        let mut last = None;
        while !producer.is_finished() {
            if let Some(value) = mailbox.try_receive() {
                if let Some(prev) = last {
                    assert!(value > prev, "went backwards: {} after {}", value, prev);
                }
                last = Some(value);
            }
        }
        producer.join().unwrap();

        // Whatever is left is the final value, or it was already taken.
        let final_value = mailbox.try_receive().or(last);
        assert_eq!(final_value, Some(9_999));
    }
}
