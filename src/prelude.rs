//! Commonly used imports
//!
//! Use `use sequent::prelude::*;` for quick access to the most common types
//! and functions.

// Core types
pub use crate::{BoxError, Fault, State, Step};

// The three contracts
pub use crate::{Cursor, Producer, Sequence};

// The producer-backed cursor
pub use crate::Run;

// Most common constructors
pub use crate::producer::from_fn;
pub use crate::source::{empty, from_iter, of, produce};

// Flattening policy
pub use crate::pipeline::Strategy;

// Std-iteration bridge
pub use crate::SeqIter;
