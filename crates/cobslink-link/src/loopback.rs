use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::traits::ByteLink;

/// One end of an in-memory byte link.
///
/// Bytes written to one end become pollable on the other. Useful for
/// tests and demos where both ends of the line live in one process; no
/// real device required.
#[derive(Debug)]
pub struct Loopback {
    incoming: Arc<Mutex<VecDeque<u8>>>,
    outgoing: Arc<Mutex<VecDeque<u8>>>,
}

impl Loopback {
    /// Create a cross-connected pair of link ends.
    pub fn pair() -> (Loopback, Loopback) {
        let a_to_b = Arc::new(Mutex::new(VecDeque::new()));
        let b_to_a = Arc::new(Mutex::new(VecDeque::new()));

        let a = Loopback {
            incoming: Arc::clone(&b_to_a),
            outgoing: Arc::clone(&a_to_b),
        };
        let b = Loopback {
            incoming: a_to_b,
            outgoing: b_to_a,
        };
        (a, b)
    }

    /// Number of bytes queued toward this end but not yet polled.
    pub fn pending(&self) -> usize {
        lock(&self.incoming).len()
    }
}

impl ByteLink for Loopback {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        Ok(lock(&self.incoming).pop_front())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        lock(&self.outgoing).extend(bytes.iter().copied());
        Ok(())
    }
}

// A poisoned queue only means some other test thread panicked while
// holding the lock; the byte queue itself is still coherent.
fn lock(queue: &Arc<Mutex<VecDeque<u8>>>) -> std::sync::MutexGuard<'_, VecDeque<u8>> {
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_cross_between_ends() {
        let (mut a, mut b) = Loopback::pair();

        a.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(b.pending(), 3);
        assert_eq!(b.poll_byte().unwrap(), Some(1));
        assert_eq!(b.poll_byte().unwrap(), Some(2));
        assert_eq!(b.poll_byte().unwrap(), Some(3));
        assert_eq!(b.poll_byte().unwrap(), None);

        b.write_all(&[9]).unwrap();
        assert_eq!(a.poll_byte().unwrap(), Some(9));
        assert_eq!(a.poll_byte().unwrap(), None);
    }

    #[test]
    fn directions_are_independent() {
        let (mut a, mut b) = Loopback::pair();

        a.write_all(&[0x11]).unwrap();
        b.write_all(&[0x22]).unwrap();

        assert_eq!(a.poll_byte().unwrap(), Some(0x22));
        assert_eq!(b.poll_byte().unwrap(), Some(0x11));
    }
}
