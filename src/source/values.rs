use crate::{cursor::Run, fault::BoxError, producer::Producer, sequence::Sequence, step::Step};

/// A producer that drains a standard iterator.
///
/// This is the adapter that lets plain data act as a sequence body: each
/// resumption takes one value from the iterator, and exhaustion is natural
/// completion.
pub struct IterProducer<I>(I);

impl<I: Iterator> IterProducer<I> {
    /// Wrap a standard iterator as a producer.
    pub fn new(iter: I) -> Self {
        IterProducer(iter)
    }
}

impl<I: Iterator> Producer for IterProducer<I> {
    type Item = I::Item;

    fn resume(&mut self) -> Result<Step<I::Item>, BoxError> {
        Ok(self.0.next().into())
    }
}

/// A sequence over an owned list of values. Created via [`of`].
///
/// Every `iterate()` replays a private copy of the values, so two cursors
/// never observe each other.
#[derive(Debug, Clone)]
pub struct Values<T> {
    items: Vec<T>,
}

/// Create a sequence over the given values.
///
/// # Examples
///
/// ```
/// use sequent::prelude::*;
///
/// let numbers = of([1, 2, 3]);
/// assert_eq!(numbers.to_vec().unwrap(), vec![1, 2, 3]);
/// // A sequence is a repeatable factory, not a one-shot run.
/// assert_eq!(numbers.to_vec().unwrap(), vec![1, 2, 3]);
/// ```
pub fn of<T: Clone>(values: impl IntoIterator<Item = T>) -> Values<T> {
    Values {
        items: values.into_iter().collect(),
    }
}

impl<T: Clone> Sequence for Values<T> {
    type Item = T;
    type Cursor = Run<IterProducer<std::vec::IntoIter<T>>>;

    fn iterate(&self) -> Self::Cursor {
        Run::new(IterProducer::new(self.items.clone().into_iter()))
    }
}

/// A sequence re-exposing another convertible source. Created via
/// [`from_iter`].
#[derive(Debug, Clone)]
pub struct FromIter<I> {
    source: I,
}

/// Create a sequence from any cloneable `IntoIterator`.
///
/// The source is cloned on every `iterate()`, which is what makes the
/// resulting sequence repeatable.
///
/// # Examples
///
/// ```
/// use sequent::prelude::*;
///
/// let squares = from_iter((1..4).map(|x| x * x));
/// assert_eq!(squares.to_vec().unwrap(), vec![1, 4, 9]);
/// ```
pub fn from_iter<I>(source: I) -> FromIter<I>
where
    I: IntoIterator + Clone,
{
    FromIter { source }
}

impl<I> Sequence for FromIter<I>
where
    I: IntoIterator + Clone,
{
    type Item = I::Item;
    type Cursor = Run<IterProducer<I::IntoIter>>;

    fn iterate(&self) -> Self::Cursor {
        Run::new(IterProducer::new(self.source.clone().into_iter()))
    }
}

/// Create a sequence that produces nothing.
pub fn empty<T>() -> FromIter<std::iter::Empty<T>> {
    from_iter(std::iter::empty())
}
