//! Flattening nested sequences.
//!
//! [`FlatMap`] projects each upstream value to an inner sequence and
//! linearizes the results under a [`Strategy`]. `Concat` is the lazy-pull
//! default: one inner cursor at a time, exhausted in source order. `Merge`
//! holds a pool of inner cursors and rotates it cooperatively, so inner
//! values interleave in arrival order.
//!
//! Early exit is where flattening earns its keep: a half-drained inner
//! cursor holds exactly the kind of resource this crate exists to release,
//! so `early_exit()` forwards to every inner cursor currently owned, then to
//! the upstream cursor.

use std::collections::VecDeque;

use tracing::trace;

use crate::{
    cursor::Cursor,
    fault::{BoxError, Fault},
    sequence::Sequence,
    state::State,
    step::Step,
};

/// How [`FlatMap`] linearizes inner sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Exhaust each inner sequence, in the order its outer element arrived,
    /// before moving to the next. Deterministic source order; the only valid
    /// strategy for purely lazily-pulled sequences.
    #[default]
    Concat,
    /// Interleave inner sequences, yielding whichever inner value becomes
    /// available first. Order is arrival order under the driving scheduler:
    /// the pool is rotated round-robin and admits at most one new inner
    /// sequence per drive, so each inner cursor is advanced by exactly one
    /// logical driver.
    Merge,
}

/// Projects each upstream value to an inner sequence and flattens the
/// results under a [`Strategy`].
#[derive(Clone)]
pub struct FlatMap<S, F> {
    upstream: S,
    project: F,
    strategy: Strategy,
}

/// Create a flattening sequence over `upstream` with an explicit strategy.
///
/// # Examples
///
/// ```
/// use sequent::prelude::*;
/// use sequent::pipeline::flat_map;
///
/// let nested = of([vec![1, 2], vec![3]]);
/// let flat = flat_map(nested, |values| of(values), Strategy::Concat);
/// assert_eq!(flat.to_vec().unwrap(), vec![1, 2, 3]);
/// ```
pub fn flat_map<S, Q, F>(upstream: S, project: F, strategy: Strategy) -> FlatMap<S, F>
where
    S: Sequence,
    Q: Sequence,
    F: FnMut(S::Item) -> Q + Clone,
{
    FlatMap {
        upstream,
        project,
        strategy,
    }
}

impl<S, Q, F> Sequence for FlatMap<S, F>
where
    S: Sequence,
    Q: Sequence,
    F: FnMut(S::Item) -> Q + Clone,
{
    type Item = Q::Item;
    type Cursor = FlatMapCursor<S::Cursor, F, Q::Cursor>;

    fn iterate(&self) -> Self::Cursor {
        FlatMapCursor {
            upstream: self.upstream.iterate(),
            project: self.project.clone(),
            pool: VecDeque::new(),
            upstream_done: false,
            strategy: self.strategy,
            state: State::Created,
        }
    }
}

/// Cursor for [`FlatMap`]: owns the upstream cursor plus every inner cursor
/// currently being drained.
pub struct FlatMapCursor<C, F, D> {
    upstream: C,
    project: F,
    pool: VecDeque<D>,
    upstream_done: bool,
    strategy: Strategy,
    state: State,
}

impl<C: Cursor, F, D: Cursor> FlatMapCursor<C, F, D> {
    /// Release every cursor this node owns, inner cursors first.
    fn release_all(&mut self) {
        for mut inner in self.pool.drain(..) {
            inner.early_exit();
        }
        self.upstream.early_exit();
    }
}

impl<C, Q, F> Cursor for FlatMapCursor<C, F, Q::Cursor>
where
    C: Cursor,
    Q: Sequence,
    F: FnMut(C::Item) -> Q,
{
    type Item = Q::Item;

    fn advance(&mut self) -> Result<Step<Q::Item>, Fault> {
        if self.state.is_terminal() {
            return Ok(Step::Done);
        }
        self.state = State::Running;
        let step = match self.strategy {
            Strategy::Concat => loop {
                if let Some(mut front) = self.pool.pop_front() {
                    match front.advance() {
                        Ok(Step::Next(value)) => {
                            self.pool.push_front(front);
                            break Ok(Step::Next(value));
                        }
                        // The inner sequence ran dry; its cleanup already ran.
                        Ok(Step::Done) => {}
                        Err(fault) => {
                            self.release_all();
                            break Err(fault);
                        }
                    }
                } else if self.upstream_done {
                    break Ok(Step::Done);
                } else {
                    match self.upstream.advance() {
                        Ok(Step::Next(value)) => {
                            let inner = (self.project)(value).iterate();
                            self.pool.push_back(inner);
                        }
                        Ok(Step::Done) => self.upstream_done = true,
                        Err(fault) => {
                            self.release_all();
                            break Err(fault);
                        }
                    }
                }
            },
            Strategy::Merge => 'merge: loop {
                if !self.upstream_done {
                    match self.upstream.advance() {
                        Ok(Step::Next(value)) => {
                            let inner = (self.project)(value).iterate();
                            self.pool.push_back(inner);
                        }
                        Ok(Step::Done) => self.upstream_done = true,
                        Err(fault) => {
                            self.release_all();
                            break Err(fault);
                        }
                    }
                }
                // One rotation: each inner either yields (and goes to the
                // back of the pool) or is dropped as exhausted.
                while let Some(mut inner) = self.pool.pop_front() {
                    match inner.advance() {
                        Ok(Step::Next(value)) => {
                            self.pool.push_back(inner);
                            break 'merge Ok(Step::Next(value));
                        }
                        Ok(Step::Done) => {}
                        Err(fault) => {
                            self.release_all();
                            break 'merge Err(fault);
                        }
                    }
                }
                if self.upstream_done && self.pool.is_empty() {
                    break Ok(Step::Done);
                }
            },
        };
        self.state = match &step {
            Ok(Step::Next(_)) => State::Suspended,
            Ok(Step::Done) => State::Completed,
            Err(_) => State::Faulted,
        };
        step
    }

    fn early_exit(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        trace!(inners = self.pool.len(), "early exit; releasing inner cursors");
        self.release_all();
        self.state = State::Returned;
    }

    fn fault(&mut self, error: BoxError) -> Fault {
        if self.state.is_terminal() {
            return Fault::Consumer(error);
        }
        let fault = match self.pool.pop_front() {
            // Inject into the inner cursor currently suspended, then release
            // its siblings and the upstream.
            Some(mut inner) => inner.fault(error),
            None => self.upstream.fault(error),
        };
        self.release_all();
        self.state = State::Faulted;
        fault
    }

    fn state(&self) -> State {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::of;

    #[test]
    fn test_concat_preserves_source_order() {
        let nested = of([vec![1, 2], vec![3], vec![], vec![4, 5]]);
        let flat = flat_map(nested, |values| of(values), Strategy::Concat);
        assert_eq!(flat.to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_concat_over_empty_upstream() {
        let nested = of(Vec::<Vec<i32>>::new());
        let flat = flat_map(nested, |values| of(values), Strategy::Concat);
        assert_eq!(flat.to_vec().unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_merge_interleaves_in_rotation_order() {
        let nested = of([vec![1, 2, 3], vec![10, 20], vec![100]]);
        let flat = flat_map(nested, |values| of(values), Strategy::Merge);
        assert_eq!(flat.to_vec().unwrap(), vec![1, 2, 10, 3, 100, 20]);
    }

    #[test]
    fn test_merge_over_empty_inners() {
        let nested = of([vec![], vec![7], vec![]]);
        let flat = flat_map(nested, |values| of(values), Strategy::Merge);
        assert_eq!(flat.to_vec().unwrap(), vec![7]);
    }

    #[test]
    fn test_early_exit_releases_inner_and_upstream() {
        let nested = of([vec![1, 2, 3], vec![4]]);
        let flat = flat_map(nested, |values| of(values), Strategy::Concat);
        let mut cursor = flat.iterate();

        assert_eq!(cursor.advance().unwrap(), Step::Next(1));
        cursor.early_exit();
        assert_eq!(cursor.state(), State::Returned);
        assert_eq!(cursor.advance().unwrap(), Step::Done);
        cursor.early_exit();
        assert_eq!(cursor.state(), State::Returned);
    }

    #[test]
    fn test_flat_map_is_repeatable() {
        let nested = of([vec![1], vec![2]]);
        let flat = flat_map(nested, |values| of(values), Strategy::Concat);
        assert_eq!(flat.to_vec().unwrap(), vec![1, 2]);
        assert_eq!(flat.to_vec().unwrap(), vec![1, 2]);
    }
}
