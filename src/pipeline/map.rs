use crate::{
    cursor::Cursor,
    fault::{BoxError, Fault},
    sequence::Sequence,
    state::State,
    step::Step,
};

/// Applies a function to every value of the upstream sequence.
///
/// Lifecycle operations forward directly to the upstream cursor; `Map` adds
/// no policy of its own.
#[derive(Clone)]
pub struct Map<S, F> {
    upstream: S,
    f: F,
}

/// Create a sequence that applies `f` to every upstream value.
///
/// # Examples
///
/// ```
/// use sequent::prelude::*;
/// use sequent::pipeline::map;
///
/// let doubled = map(of([1, 2, 3]), |x| x * 2);
/// assert_eq!(doubled.to_vec().unwrap(), vec![2, 4, 6]);
/// ```
pub fn map<S, U, F>(upstream: S, f: F) -> Map<S, F>
where
    S: Sequence,
    F: FnMut(S::Item) -> U + Clone,
{
    Map { upstream, f }
}

impl<S, U, F> Sequence for Map<S, F>
where
    S: Sequence,
    F: FnMut(S::Item) -> U + Clone,
{
    type Item = U;
    type Cursor = MapCursor<S::Cursor, F>;

    fn iterate(&self) -> Self::Cursor {
        MapCursor {
            upstream: self.upstream.iterate(),
            f: self.f.clone(),
        }
    }
}

/// Cursor for [`Map`]: wraps the upstream cursor, transforming each value it
/// produces.
pub struct MapCursor<C, F> {
    upstream: C,
    f: F,
}

impl<C, U, F> Cursor for MapCursor<C, F>
where
    C: Cursor,
    F: FnMut(C::Item) -> U,
{
    type Item = U;

    fn advance(&mut self) -> Result<Step<U>, Fault> {
        Ok(self.upstream.advance()?.map(&mut self.f))
    }

    fn early_exit(&mut self) {
        self.upstream.early_exit();
    }

    fn fault(&mut self, error: BoxError) -> Fault {
        self.upstream.fault(error)
    }

    fn state(&self) -> State {
        self.upstream.state()
    }
}
