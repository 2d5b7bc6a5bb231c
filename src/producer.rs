//! Core trait for resumable sequence bodies.
//!
//! This module defines the [`Producer`] trait, the contract a sequence body
//! implements. A producer is a computation that can park at yield points,
//! handing one value per [`resume`](Producer::resume) to whatever drives it,
//! and that registers its teardown in [`finalize`](Producer::finalize).
//!
//! A producer owns its side effects: if it opens a file, socket, or cursor,
//! it alone releases it, and `finalize` is where that happens. Because
//! `finalize` returns `()`, teardown cannot yield another value, which is
//! what keeps early exit bounded.
//!
//! # Examples
//!
//! ```rust
//! use sequent::prelude::*;
//!
//! let mut countdown = 3;
//! let mut producer = from_fn(move || {
//!     if countdown == 0 {
//!         return Ok(Step::Done);
//!     }
//!     countdown -= 1;
//!     Ok(Step::Next(countdown))
//! });
//! assert_eq!(producer.resume().unwrap(), Step::Next(2));
//! ```

use std::{
    cell::RefCell,
    rc::Rc,
    sync::{Arc, Mutex},
};

use crate::{fault::BoxError, step::Step};

/// A resumable computation that emits values and owns a scarce resource for
/// the lifetime of one run.
///
/// Each call to [`resume`](Producer::resume) runs the body to its next yield
/// point (`Ok(Step::Next(..))`), its natural end (`Ok(Step::Done)`), or a
/// raised error. [`finalize`](Producer::finalize) is the registered cleanup
/// action; the driving cursor guarantees it runs exactly once, on every exit
/// path.
///
/// Implementations must tolerate `finalize` never being interleaved with
/// `resume`: the cursor only finalizes once it will never resume again.
pub trait Producer {
    /// Type of the values this producer emits.
    type Item;

    /// Run the body until its next suspension or exit.
    fn resume(&mut self) -> Result<Step<Self::Item>, BoxError>;

    /// The cleanup action. Runs on natural completion, early exit, and fault.
    ///
    /// The default does nothing; producers holding a resource override this
    /// or attach teardown with [`guard`](Producer::guard).
    fn finalize(&mut self) {}

    /// Attach a cleanup closure that runs when this producer is finalized.
    ///
    /// The closure runs at most once, after the inner producer's own
    /// `finalize`.
    ///
    /// ```rust
    /// use sequent::prelude::*;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let released = Rc::new(Cell::new(false));
    /// let flag = Rc::clone(&released);
    /// let mut count = 0;
    /// let producer = from_fn(move || {
    ///     count += 1;
    ///     Ok(Step::Next(count))
    /// })
    /// .guard(move || flag.set(true));
    ///
    /// let mut run = Run::new(producer);
    /// assert_eq!(run.advance().unwrap(), Step::Next(1));
    /// run.early_exit();
    /// assert!(released.get());
    /// ```
    fn guard<F>(self, cleanup: F) -> Guarded<Self, F>
    where
        Self: Sized,
        F: FnOnce(),
    {
        Guarded {
            inner: self,
            cleanup: Some(cleanup),
        }
    }

    fn boxed(self) -> Box<dyn Producer<Item = Self::Item>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// A producer built from a closure. Created via [`from_fn`].
pub struct FromFn<F>(F);

impl<T, F> Producer for FromFn<F>
where
    F: FnMut() -> Result<Step<T>, BoxError>,
{
    type Item = T;

    fn resume(&mut self) -> Result<Step<T>, BoxError> {
        (self.0)()
    }
}

/// Create a producer from a closure.
///
/// The closure is the body: each call is one resumption, returning the next
/// value, `Done`, or an error. Pair with [`Producer::guard`] to register
/// teardown.
///
/// ```rust
/// use sequent::prelude::*;
///
/// let mut remaining = vec![3, 2, 1];
/// let mut producer = from_fn(move || Ok(Step::from(remaining.pop())));
/// assert_eq!(producer.resume().unwrap(), Step::Next(1));
/// assert_eq!(producer.resume().unwrap(), Step::Next(2));
/// assert_eq!(producer.resume().unwrap(), Step::Next(3));
/// assert_eq!(producer.resume().unwrap(), Step::Done);
/// ```
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: FnMut() -> Result<Step<T>, BoxError>,
{
    FromFn(f)
}

/// A producer with an attached cleanup closure.
///
/// Created via [`Producer::guard`]. The closure runs at most once, when the
/// producer is finalized.
pub struct Guarded<P, F> {
    inner: P,
    cleanup: Option<F>,
}

impl<P, F> Producer for Guarded<P, F>
where
    P: Producer,
    F: FnOnce(),
{
    type Item = P::Item;

    fn resume(&mut self) -> Result<Step<P::Item>, BoxError> {
        self.inner.resume()
    }

    fn finalize(&mut self) {
        self.inner.finalize();
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl<P: Producer + ?Sized> Producer for Box<P> {
    type Item = P::Item;

    fn resume(&mut self) -> Result<Step<P::Item>, BoxError> {
        (**self).resume()
    }

    fn finalize(&mut self) {
        (**self).finalize();
    }
}

impl<P> Producer for Option<P>
where
    P: Producer,
{
    type Item = P::Item;

    fn resume(&mut self) -> Result<Step<P::Item>, BoxError> {
        match self {
            Some(producer) => producer.resume(),
            None => Ok(Step::Done),
        }
    }

    fn finalize(&mut self) {
        if let Some(producer) = self {
            producer.finalize();
        }
    }
}

impl<L, R> Producer for either::Either<L, R>
where
    L: Producer,
    R: Producer<Item = L::Item>,
{
    type Item = L::Item;

    fn resume(&mut self) -> Result<Step<L::Item>, BoxError> {
        match self {
            either::Either::Left(left) => left.resume(),
            either::Either::Right(right) => right.resume(),
        }
    }

    fn finalize(&mut self) {
        match self {
            either::Either::Left(left) => left.finalize(),
            either::Either::Right(right) => right.finalize(),
        }
    }
}

impl<C> Producer for Rc<RefCell<C>>
where
    C: Producer,
{
    type Item = C::Item;

    fn resume(&mut self) -> Result<Step<C::Item>, BoxError> {
        self.as_ref().borrow_mut().resume()
    }

    fn finalize(&mut self) {
        self.as_ref().borrow_mut().finalize();
    }
}

impl<C> Producer for Arc<Mutex<C>>
where
    C: Producer,
{
    type Item = C::Item;

    fn resume(&mut self) -> Result<Step<C::Item>, BoxError> {
        match self.lock() {
            Ok(mut producer) => producer.resume(),
            Err(_) => Err("producer lock was poisoned".into()),
        }
    }

    fn finalize(&mut self) {
        if let Ok(mut producer) = self.lock() {
            producer.finalize();
        }
    }
}
