//! Constructors for sequences.
//!
//! This module provides the entry points of a pipeline: [`of`] and
//! [`from_iter`] replay cloneable data, [`empty`] produces nothing, and
//! [`produce`] builds a sequence from a producer factory, allocating a fresh
//! producer on every [`iterate`](crate::Sequence::iterate) call.

mod generate;
mod values;

pub use generate::{produce, Generate};
pub use values::{empty, from_iter, of, FromIter, IterProducer, Values};
