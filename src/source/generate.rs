use crate::{cursor::Run, producer::Producer, sequence::Sequence};

/// A sequence backed by a producer factory. Created via [`produce`].
///
/// The factory is the iterate function: a pure function of no external
/// state, called once per `iterate()`, so every cursor owns a brand-new
/// producer and the resource it acquires.
#[derive(Clone)]
pub struct Generate<F> {
    factory: F,
}

/// Create a sequence from a producer factory.
///
/// This is how resource-holding sequences are built: acquire in the factory
/// (or in the body before its first yield), release in the producer's
/// cleanup. Restarting the sequence — by a consumer, or by a combinator
/// built on the freshness guarantee — is just another factory call.
///
/// # Examples
///
/// ```
/// use sequent::prelude::*;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let open = Rc::new(Cell::new(0));
/// let handles = Rc::clone(&open);
/// let lines = produce(move || {
///     handles.set(handles.get() + 1); // acquire
///     let release = Rc::clone(&handles);
///     let mut line = 0;
///     from_fn(move || {
///         line += 1;
///         Ok(Step::Next(line))
///     })
///     .guard(move || release.set(release.get() - 1)) // release
/// });
///
/// // Early termination frees the handle without manual finalization.
/// assert_eq!(lines.take(3).to_vec().unwrap(), vec![1, 2, 3]);
/// assert_eq!(open.get(), 0);
/// ```
pub fn produce<P, F>(factory: F) -> Generate<F>
where
    F: Fn() -> P,
    P: Producer,
{
    Generate { factory }
}

impl<P, F> Sequence for Generate<F>
where
    F: Fn() -> P,
    P: Producer,
{
    type Item = P::Item;
    type Cursor = Run<P>;

    fn iterate(&self) -> Self::Cursor {
        Run::new((self.factory)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use crate::producer::from_fn;
    use crate::step::Step;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_each_iterate_gets_a_fresh_producer() {
        let counting = produce(|| {
            let mut n = 0;
            from_fn(move || {
                n += 1;
                Ok(Step::Next(n))
            })
        });

        let mut first = counting.iterate();
        let mut second = counting.iterate();

        assert_eq!(first.advance().unwrap(), Step::Next(1));
        assert_eq!(first.advance().unwrap(), Step::Next(2));
        // The second cursor starts from scratch.
        assert_eq!(second.advance().unwrap(), Step::Next(1));
    }

    #[test]
    fn test_factory_acquisition_is_per_cursor() {
        let acquired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&acquired);
        let resourceful = produce(move || {
            counter.set(counter.get() + 1);
            let release = Rc::clone(&counter);
            from_fn(move || Ok(Step::<i32>::Done)).guard(move || release.set(release.get() - 1))
        });

        let one = resourceful.iterate();
        let two = resourceful.iterate();
        assert_eq!(acquired.get(), 2);
        drop(one);
        drop(two);
        assert_eq!(acquired.get(), 0);
    }
}
