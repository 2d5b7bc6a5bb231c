//! # Sequent: Composable Lazy Sequences with Guaranteed Finalization
//!
//! Build stream-processing pipelines by chaining combinators over lazy
//! sequences, with the guarantee that any scarce resource a sequence body
//! holds — file handle, socket, cursor — is released exactly once, even when
//! a consumer stops iterating early.
//!
//! ## Core Traits
//!
//! - **[`Sequence`]**: an immutable, repeatable factory; every
//!   [`iterate()`](Sequence::iterate) mints a fresh cursor
//! - **[`Cursor`]**: the stateful handle to one run; advance it, early-exit
//!   it, or inject a fault into it
//! - **[`Producer`]**: the resumable body that emits values and registers
//!   its cleanup
//!
//! ## Key Features
//!
//! - **Composable**: chain `.map()`, `.filter()`, `.take_while()`,
//!   `.concat_map()` without losing the finalization guarantee
//! - **Early exit is free**: `take`/`take_while` release their upstream the
//!   moment they stop; terminal consumers release on short-circuit
//! - **Deterministic teardown**: one cleanup action per run, on every exit
//!   path — natural end, early exit, or fault
//!
//! ## Example
//!
//! ```rust
//! use sequent::prelude::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let open = Rc::new(Cell::new(0));
//! let handles = Rc::clone(&open);
//!
//! // A sequence body that holds a "file handle" while it runs.
//! let lines = produce(move || {
//!     handles.set(handles.get() + 1); // acquire
//!     let release = Rc::clone(&handles);
//!     let mut line = 0;
//!     from_fn(move || {
//!         line += 1;
//!         Ok(Step::Next(line))
//!     })
//!     .guard(move || release.set(release.get() - 1)) // release
//! });
//!
//! // Take a prefix of an endless sequence; nothing to finalize by hand.
//! let first = lines.take(3).to_vec().unwrap();
//! assert_eq!(first, vec![1, 2, 3]);
//! assert_eq!(open.get(), 0);
//! ```
//!
//! ## Common Functions
//!
//! **Building Sequences:**
//! - [`of(values)`](source::of) - a sequence over owned values
//! - [`from_iter(source)`](source::from_iter) - re-expose a cloneable iterator
//! - [`produce(factory)`](source::produce) - a fresh producer per run
//!
//! **Consuming:**
//! - [`to_vec()`](Sequence::to_vec), [`fold()`](Sequence::fold),
//!   [`any()`](Sequence::any), [`find()`](Sequence::find) - eager terminal
//!   consumers that release the cursor when they stop early
//! - [`iter()`](Sequence::iter) - a `std` iterator that early-exits on drop

mod fault;
mod state;
mod step;

pub mod cursor;
pub mod iter;
pub mod pipeline;
pub mod prelude;
pub mod producer;
pub mod sequence;
pub mod source;

pub use cursor::{Cursor, Run};
pub use fault::{BoxError, Fault};
pub use iter::SeqIter;
pub use producer::Producer;
pub use sequence::{Boxed, Sequence};
pub use state::State;
pub use step::Step;
