//! Bridging sequences into `std` iteration.
//!
//! [`SeqIter`] adapts a cursor to `std::iter::Iterator`, producing
//! `Result<T, Fault>` items. The adapter owns the cursor it wraps and
//! early-exits it on drop: a `for` loop is specified over the sequence, so
//! the loop owns cursor creation, and with it the obligation to finalize on
//! early loop exit. Breaking out of the loop drops the adapter, which
//! releases the producer's resource.
//!
//! # Examples
//!
//! ```rust
//! use sequent::prelude::*;
//!
//! let numbers = of([1, 2, 3]);
//! let mut seen = Vec::new();
//! for value in numbers.iter() {
//!     let value = value.unwrap();
//!     if value == 3 {
//!         break; // the adapter's drop early-exits the cursor
//!     }
//!     seen.push(value);
//! }
//! assert_eq!(seen, vec![1, 2]);
//! ```

use crate::{cursor::Cursor, fault::Fault, state::State, step::Step};

/// Iterator adapter over a [`Cursor`].
///
/// Produces `Ok(value)` per produced value; a fault is produced once as
/// `Err(..)` and the iterator is fused afterwards. Dropping the adapter
/// early-exits the cursor.
pub struct SeqIter<C: Cursor> {
    cursor: C,
    finished: bool,
}

impl<C: Cursor> SeqIter<C> {
    /// Wrap a cursor. Usually reached through
    /// [`Sequence::iter`](crate::Sequence::iter).
    pub fn new(cursor: C) -> Self {
        SeqIter {
            cursor,
            finished: false,
        }
    }

    /// `true` once the underlying cursor reported done or faulted.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Lifecycle state of the wrapped cursor.
    pub fn state(&self) -> State {
        self.cursor.state()
    }
}

impl<C: Cursor> Iterator for SeqIter<C> {
    type Item = Result<C::Item, Fault>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.cursor.advance() {
            Ok(Step::Next(value)) => Some(Ok(value)),
            Ok(Step::Done) => {
                self.finished = true;
                None
            }
            Err(fault) => {
                self.finished = true;
                Some(Err(fault))
            }
        }
    }
}

impl<C: Cursor> Drop for SeqIter<C> {
    fn drop(&mut self) {
        self.cursor.early_exit();
    }
}
