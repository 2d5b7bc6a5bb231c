//! The stateful handle for one run of a sequence producer.
//!
//! This module defines the [`Cursor`] trait and [`Run`], the producer-backed
//! cursor that implements the lifecycle state machine. A cursor exclusively
//! owns one producer instance, and with it the producer's scarce resource,
//! for exactly one run. Cursors are never shared between consumers; the
//! shareable entity is the [`Sequence`](crate::Sequence) that minted them.
//!
//! # Lifecycle
//!
//! [`advance`](Cursor::advance) resumes the producer to its next suspension
//! or exit. [`early_exit`](Cursor::early_exit) behaves as though the body
//! returned at its current suspension point: cleanup runs, and the cursor
//! transitions to [`State::Returned`]. [`fault`](Cursor::fault) injects an
//! error the same way. All three terminal states are absorbing — a cursor
//! that has been torn down can never resume its body, so a stale reference
//! cannot resurrect a released resource.

use tracing::trace;

use crate::{
    fault::{BoxError, Fault},
    producer::Producer,
    state::State,
    step::Step,
};

/// Stateful handle to one run of a sequence producer.
///
/// Combinator cursors implement this trait by wrapping one or more upstream
/// cursors and forwarding lifecycle operations depth-first: every inner
/// cursor currently owned, then the upstream cursor.
pub trait Cursor {
    /// Type of the values this cursor produces.
    type Item;

    /// Resume the producer until its next suspension or exit.
    ///
    /// On a terminal cursor this is a no-op that reports `Done`; it never
    /// re-enters the body.
    fn advance(&mut self) -> Result<Step<Self::Item>, Fault>;

    /// Force the producer to exit at its current suspension point.
    ///
    /// Runs the cleanup action and transitions to [`State::Returned`].
    /// Idempotent: on a terminal cursor this has no further side effect.
    fn early_exit(&mut self);

    /// Inject an error at the current suspension point.
    ///
    /// Runs the cleanup action, transitions to [`State::Faulted`], and hands
    /// back the [`Fault`] for the caller to propagate. On a terminal cursor
    /// no further side effect occurs.
    fn fault(&mut self, error: BoxError) -> Fault;

    /// The cursor's current lifecycle state.
    fn state(&self) -> State;
}

/// The producer-backed cursor: owns a [`Producer`] and drives its state
/// machine for one run.
///
/// `Run` also early-exits on drop. Cleanup is idempotent at the cursor
/// level, so a run that was already terminal is unaffected, and one that was
/// abandoned mid-iteration still releases its resource exactly once.
///
/// # Examples
///
/// ```rust
/// use sequent::prelude::*;
///
/// let mut n = 0;
/// let mut run = Run::new(from_fn(move || {
///     n += 1;
///     if n <= 2 { Ok(Step::Next(n)) } else { Ok(Step::Done) }
/// }));
///
/// assert_eq!(run.state(), State::Created);
/// assert_eq!(run.advance().unwrap(), Step::Next(1));
/// assert_eq!(run.state(), State::Suspended);
/// run.early_exit();
/// assert_eq!(run.state(), State::Returned);
/// assert_eq!(run.advance().unwrap(), Step::Done);
/// ```
pub struct Run<P: Producer> {
    producer: P,
    state: State,
}

impl<P: Producer> Run<P> {
    /// Bind a fresh producer to a new cursor in [`State::Created`].
    pub fn new(producer: P) -> Self {
        Run {
            producer,
            state: State::Created,
        }
    }
}

impl<P: Producer> Cursor for Run<P> {
    type Item = P::Item;

    fn advance(&mut self) -> Result<Step<P::Item>, Fault> {
        if self.state.is_terminal() {
            return Ok(Step::Done);
        }
        self.state = State::Running;
        match self.producer.resume() {
            Ok(Step::Next(value)) => {
                self.state = State::Suspended;
                Ok(Step::Next(value))
            }
            Ok(Step::Done) => {
                self.producer.finalize();
                self.state = State::Completed;
                Ok(Step::Done)
            }
            Err(error) => {
                trace!(error = %error, "producer faulted; running cleanup");
                self.producer.finalize();
                self.state = State::Faulted;
                Err(Fault::Producer(error))
            }
        }
    }

    fn early_exit(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        trace!(state = ?self.state, "early exit; running cleanup");
        self.producer.finalize();
        self.state = State::Returned;
    }

    fn fault(&mut self, error: BoxError) -> Fault {
        if !self.state.is_terminal() {
            trace!("consumer fault injected; running cleanup");
            self.producer.finalize();
            self.state = State::Faulted;
        }
        Fault::Consumer(error)
    }

    fn state(&self) -> State {
        self.state
    }
}

impl<P: Producer> Drop for Run<P> {
    fn drop(&mut self) {
        self.early_exit();
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    fn advance(&mut self) -> Result<Step<C::Item>, Fault> {
        (**self).advance()
    }

    fn early_exit(&mut self) {
        (**self).early_exit();
    }

    fn fault(&mut self, error: BoxError) -> Fault {
        (**self).fault(error)
    }

    fn state(&self) -> State {
        (**self).state()
    }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    type Item = C::Item;

    fn advance(&mut self) -> Result<Step<C::Item>, Fault> {
        (**self).advance()
    }

    fn early_exit(&mut self) {
        (**self).early_exit();
    }

    fn fault(&mut self, error: BoxError) -> Fault {
        (**self).fault(error)
    }

    fn state(&self) -> State {
        (**self).state()
    }
}

impl<L, R> Cursor for either::Either<L, R>
where
    L: Cursor,
    R: Cursor<Item = L::Item>,
{
    type Item = L::Item;

    fn advance(&mut self) -> Result<Step<L::Item>, Fault> {
        match self {
            either::Either::Left(left) => left.advance(),
            either::Either::Right(right) => right.advance(),
        }
    }

    fn early_exit(&mut self) {
        match self {
            either::Either::Left(left) => left.early_exit(),
            either::Either::Right(right) => right.early_exit(),
        }
    }

    fn fault(&mut self, error: BoxError) -> Fault {
        match self {
            either::Either::Left(left) => left.fault(error),
            either::Either::Right(right) => right.fault(error),
        }
    }

    fn state(&self) -> State {
        match self {
            either::Either::Left(left) => left.state(),
            either::Either::Right(right) => right.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::from_fn;
    use std::cell::Cell;
    use std::rc::Rc;

    fn releases(counter: &Rc<Cell<i32>>) -> impl Producer<Item = i32> {
        counter.set(counter.get() + 1);
        let counter = Rc::clone(counter);
        let mut n = 0;
        from_fn(move || {
            n += 1;
            if n <= 3 {
                Ok(Step::Next(n))
            } else {
                Ok(Step::Done)
            }
        })
        .guard(move || counter.set(counter.get() - 1))
    }

    #[test]
    fn test_natural_completion_runs_cleanup_once() {
        let counter = Rc::new(Cell::new(0));
        let mut run = Run::new(releases(&counter));

        assert_eq!(run.advance().unwrap(), Step::Next(1));
        assert_eq!(run.advance().unwrap(), Step::Next(2));
        assert_eq!(run.advance().unwrap(), Step::Next(3));
        assert_eq!(counter.get(), 1);
        assert_eq!(run.advance().unwrap(), Step::Done);
        assert_eq!(run.state(), State::Completed);
        assert_eq!(counter.get(), 0);

        // Terminal advance is a no-op and never re-runs cleanup.
        assert_eq!(run.advance().unwrap(), Step::Done);
        run.early_exit();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_early_exit_is_idempotent() {
        let counter = Rc::new(Cell::new(0));
        let mut run = Run::new(releases(&counter));

        assert_eq!(run.advance().unwrap(), Step::Next(1));
        run.early_exit();
        run.early_exit();
        assert_eq!(run.state(), State::Returned);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_advance_after_early_exit_never_resumes() {
        let resumed = Rc::new(Cell::new(0));
        let calls = Rc::clone(&resumed);
        let mut run = Run::new(from_fn(move || {
            calls.set(calls.get() + 1);
            Ok(Step::Next(()))
        }));

        assert_eq!(run.advance().unwrap(), Step::Next(()));
        run.early_exit();
        assert_eq!(run.advance().unwrap(), Step::Done);
        assert_eq!(run.advance().unwrap(), Step::Done);
        assert_eq!(resumed.get(), 1);
    }

    #[test]
    fn test_early_exit_from_created_runs_cleanup() {
        let counter = Rc::new(Cell::new(0));
        let mut run = Run::new(releases(&counter));

        run.early_exit();
        assert_eq!(run.state(), State::Returned);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_producer_fault_runs_cleanup_and_parks() {
        let counter = Rc::new(Cell::new(0));
        counter.set(counter.get() + 1);
        let release = Rc::clone(&counter);
        let mut n = 0;
        let mut run = Run::new(
            from_fn(move || {
                n += 1;
                if n == 1 {
                    Ok(Step::Next(n))
                } else {
                    Err("wire tripped".into())
                }
            })
            .guard(move || release.set(release.get() - 1)),
        );

        assert_eq!(run.advance().unwrap(), Step::Next(1));
        let fault = run.advance().unwrap_err();
        assert!(fault.is_producer());
        assert_eq!(run.state(), State::Faulted);
        assert_eq!(counter.get(), 0);
        assert_eq!(run.advance().unwrap(), Step::Done);
    }

    #[test]
    fn test_consumer_fault_injection() {
        let counter = Rc::new(Cell::new(0));
        let mut run = Run::new(releases(&counter));

        assert_eq!(run.advance().unwrap(), Step::Next(1));
        let fault = run.fault("told to stop".into());
        assert!(fault.is_consumer());
        assert_eq!(run.state(), State::Faulted);
        assert_eq!(counter.get(), 0);
        assert_eq!(run.advance().unwrap(), Step::Done);
    }

    #[test]
    fn test_drop_backstops_cleanup() {
        let counter = Rc::new(Cell::new(0));
        {
            let mut run = Run::new(releases(&counter));
            assert_eq!(run.advance().unwrap(), Step::Next(1));
            assert_eq!(counter.get(), 1);
        }
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_boxed_cursor_delegates() {
        let counter = Rc::new(Cell::new(0));
        let mut boxed: Box<dyn Cursor<Item = i32>> = Box::new(Run::new(releases(&counter)));

        assert_eq!(boxed.advance().unwrap(), Step::Next(1));
        boxed.early_exit();
        assert_eq!(boxed.state(), State::Returned);
        assert_eq!(counter.get(), 0);
    }
}
