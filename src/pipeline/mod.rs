//! Sequence-to-sequence transforms.
//!
//! Every combinator here is a transform at the [`Sequence`](crate::Sequence)
//! level, never the cursor level, so composing them cannot break the
//! freshness guarantee: a combinator node owns its upstream sequence and a
//! cloneable function, and `iterate()` re-invokes the upstream factory.
//!
//! The combinator cursors mirror the producer lifecycle and forward
//! `early_exit()`/`fault()` depth-first through every cursor they hold.

mod filter;
mod flat;
mod map;
mod take;

pub use filter::{filter, Filter, FilterCursor};
pub use flat::{flat_map, FlatMap, FlatMapCursor, Strategy};
pub use map::{map, Map, MapCursor};
pub use take::{take, take_while, Take, TakeCursor, TakeWhile, TakeWhileCursor};
