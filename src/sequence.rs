//! The repeatable factory side of the sequence contract.
//!
//! A [`Sequence`] is immutable and shareable: it owns no resource and holds
//! no run state. All of that lives in the [`Cursor`] a call to
//! [`iterate`](Sequence::iterate) mints. The freshness guarantee — two
//! `iterate()` calls never share mutable producer state — is what makes a
//! sequence safe to hand to any number of consumers, and what a
//! restart-style combinator would build on.
//!
//! Sequences and cursors are deliberately two distinct traits. A cursor is
//! never also a factory; the split keeps freshness structural rather than
//! conventional.

use std::fmt::Display;
use std::rc::Rc;
use std::sync::Arc;

use crate::{
    cursor::Cursor,
    fault::Fault,
    iter::SeqIter,
    pipeline::{filter, flat_map, map, take, take_while},
    pipeline::{Filter, FlatMap, Map, Strategy, Take, TakeWhile},
    step::Step,
};

/// An immutable, repeatable factory of cursors.
///
/// The combinator methods build pipelines; the terminal methods drive a
/// fresh cursor eagerly and release it the moment they stop early, whether
/// by short-circuit success or by fault.
///
/// # Examples
///
/// ```rust
/// use sequent::prelude::*;
///
/// let big = of([1, 2, 3, 4]).map(|x| x * 2).filter(|x| *x > 4);
/// assert_eq!(big.to_vec().unwrap(), vec![6, 8]);
/// ```
pub trait Sequence {
    /// Type of the values this sequence produces.
    type Item;

    /// Type of the cursor minted by [`iterate`](Sequence::iterate).
    type Cursor: Cursor<Item = Self::Item>;

    /// Mint a cursor over a brand-new producer.
    ///
    /// Implementations must not consult or mutate any state outside the new
    /// cursor.
    fn iterate(&self) -> Self::Cursor;

    /// Transform every value with `f`.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U + Clone,
    {
        map(self, f)
    }

    /// Keep only values for which `pred` returns `true`.
    fn filter<F>(self, pred: F) -> Filter<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> bool + Clone,
    {
        filter(self, pred)
    }

    /// Produce at most `count` values, releasing the upstream at the cutoff.
    fn take(self, count: usize) -> Take<Self>
    where
        Self: Sized,
    {
        take(self, count)
    }

    /// Produce values while `pred` holds, releasing the upstream at the
    /// first failure.
    fn take_while<F>(self, pred: F) -> TakeWhile<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> bool + Clone,
    {
        take_while(self, pred)
    }

    /// Project each value to an inner sequence and concatenate the results
    /// in source order.
    fn concat_map<Q, F>(self, project: F) -> FlatMap<Self, F>
    where
        Self: Sized,
        Q: Sequence,
        F: FnMut(Self::Item) -> Q + Clone,
    {
        flat_map(self, project, Strategy::Concat)
    }

    /// Project each value to an inner sequence and flatten under an explicit
    /// [`Strategy`].
    fn flat_map<Q, F>(self, project: F, strategy: Strategy) -> FlatMap<Self, F>
    where
        Self: Sized,
        Q: Sequence,
        F: FnMut(Self::Item) -> Q + Clone,
    {
        flat_map(self, project, strategy)
    }

    /// Bridge into `std` iteration.
    ///
    /// The returned iterator owns its cursor and early-exits it on drop, so
    /// a `for` loop that breaks mid-iteration finalizes what it implicitly
    /// created.
    fn iter(&self) -> SeqIter<Self::Cursor> {
        SeqIter::new(self.iterate())
    }

    /// Erase the concrete sequence type, keeping the factory contract.
    fn boxed(self) -> Boxed<Self::Item>
    where
        Self: Sized + 'static,
        Self::Cursor: 'static,
        Self::Item: 'static,
    {
        let sequence = self;
        let make: Rc<dyn Fn() -> Box<dyn Cursor<Item = Self::Item>>> =
            Rc::new(move || Box::new(sequence.iterate()));
        Boxed { make }
    }

    /// Drain a fresh cursor to completion, materializing every value in
    /// production order.
    ///
    /// If draining stops early because of a fault, the cursor is released
    /// before the fault is returned.
    fn to_vec(&self) -> Result<Vec<Self::Item>, Fault> {
        let mut cursor = self.iterate();
        let mut values = Vec::new();
        loop {
            match cursor.advance() {
                Ok(Step::Next(value)) => values.push(value),
                Ok(Step::Done) => return Ok(values),
                Err(fault) => {
                    cursor.early_exit();
                    return Err(fault);
                }
            }
        }
    }

    /// Fold every value into an accumulator, left to right.
    fn fold<B, F>(&self, init: B, mut f: F) -> Result<B, Fault>
    where
        F: FnMut(B, Self::Item) -> B,
    {
        let mut cursor = self.iterate();
        let mut acc = init;
        loop {
            match cursor.advance() {
                Ok(Step::Next(value)) => acc = f(acc, value),
                Ok(Step::Done) => return Ok(acc),
                Err(fault) => {
                    cursor.early_exit();
                    return Err(fault);
                }
            }
        }
    }

    /// Fold every value into an accumulator, right to left.
    ///
    /// This is the one consumer that cannot stay lazy: the whole sequence is
    /// materialized before folding back.
    fn fold_right<B, F>(&self, init: B, mut f: F) -> Result<B, Fault>
    where
        F: FnMut(Self::Item, B) -> B,
    {
        let values = self.to_vec()?;
        let mut acc = init;
        for value in values.into_iter().rev() {
            acc = f(value, acc);
        }
        Ok(acc)
    }

    /// Returns `true` as soon as any value matches `pred`.
    ///
    /// On a match the cursor is early-exited without advancing past the
    /// matching value.
    fn any<F>(&self, mut pred: F) -> Result<bool, Fault>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        let mut cursor = self.iterate();
        loop {
            match cursor.advance() {
                Ok(Step::Next(value)) => {
                    if pred(&value) {
                        cursor.early_exit();
                        return Ok(true);
                    }
                }
                Ok(Step::Done) => return Ok(false),
                Err(fault) => {
                    cursor.early_exit();
                    return Err(fault);
                }
            }
        }
    }

    /// Returns the first value matching `pred`, early-exiting on the match.
    fn find<F>(&self, mut pred: F) -> Result<Option<Self::Item>, Fault>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        let mut cursor = self.iterate();
        loop {
            match cursor.advance() {
                Ok(Step::Next(value)) => {
                    if pred(&value) {
                        cursor.early_exit();
                        return Ok(Some(value));
                    }
                }
                Ok(Step::Done) => return Ok(None),
                Err(fault) => {
                    cursor.early_exit();
                    return Err(fault);
                }
            }
        }
    }

    /// Apply `f` to every value.
    fn for_each<F>(&self, mut f: F) -> Result<(), Fault>
    where
        F: FnMut(Self::Item),
    {
        let mut cursor = self.iterate();
        loop {
            match cursor.advance() {
                Ok(Step::Next(value)) => f(value),
                Ok(Step::Done) => return Ok(()),
                Err(fault) => {
                    cursor.early_exit();
                    return Err(fault);
                }
            }
        }
    }

    /// Returns the position of the first value equal to `needle`,
    /// early-exiting on the match.
    fn index_of(&self, needle: &Self::Item) -> Result<Option<usize>, Fault>
    where
        Self::Item: PartialEq,
    {
        let mut cursor = self.iterate();
        let mut index = 0;
        loop {
            match cursor.advance() {
                Ok(Step::Next(value)) => {
                    if value == *needle {
                        cursor.early_exit();
                        return Ok(Some(index));
                    }
                    index += 1;
                }
                Ok(Step::Done) => return Ok(None),
                Err(fault) => {
                    cursor.early_exit();
                    return Err(fault);
                }
            }
        }
    }

    /// Concatenate the display form of every value, separated by
    /// `separator`.
    fn join(&self, separator: &str) -> Result<String, Fault>
    where
        Self::Item: Display,
    {
        let mut cursor = self.iterate();
        let mut out = String::new();
        let mut first = true;
        loop {
            match cursor.advance() {
                Ok(Step::Next(value)) => {
                    if !first {
                        out.push_str(separator);
                    }
                    first = false;
                    out.push_str(&value.to_string());
                }
                Ok(Step::Done) => return Ok(out),
                Err(fault) => {
                    cursor.early_exit();
                    return Err(fault);
                }
            }
        }
    }
}

/// A type-erased sequence. Created via [`Sequence::boxed`].
///
/// Cloning shares the underlying factory; every `iterate()` still mints an
/// independent cursor.
pub struct Boxed<T: 'static> {
    make: Rc<dyn Fn() -> Box<dyn Cursor<Item = T>>>,
}

impl<T: 'static> Clone for Boxed<T> {
    fn clone(&self) -> Self {
        Boxed {
            make: Rc::clone(&self.make),
        }
    }
}

impl<T: 'static> Sequence for Boxed<T> {
    type Item = T;
    type Cursor = Box<dyn Cursor<Item = T>>;

    fn iterate(&self) -> Self::Cursor {
        (self.make)()
    }
}

impl<'a, S: Sequence + ?Sized> Sequence for &'a S {
    type Item = S::Item;
    type Cursor = S::Cursor;

    fn iterate(&self) -> Self::Cursor {
        (**self).iterate()
    }
}

impl<S: Sequence + ?Sized> Sequence for Rc<S> {
    type Item = S::Item;
    type Cursor = S::Cursor;

    fn iterate(&self) -> Self::Cursor {
        (**self).iterate()
    }
}

impl<S: Sequence + ?Sized> Sequence for Arc<S> {
    type Item = S::Item;
    type Cursor = S::Cursor;

    fn iterate(&self) -> Self::Cursor {
        (**self).iterate()
    }
}

impl<L, R> Sequence for either::Either<L, R>
where
    L: Sequence,
    R: Sequence<Item = L::Item>,
{
    type Item = L::Item;
    type Cursor = either::Either<L::Cursor, R::Cursor>;

    fn iterate(&self) -> Self::Cursor {
        match self {
            either::Either::Left(left) => either::Either::Left(left.iterate()),
            either::Either::Right(right) => either::Either::Right(right.iterate()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::{from_fn, Producer};
    use crate::source::{of, produce};
    use std::cell::Cell;

    #[test]
    fn test_fold_sums_left_to_right() {
        let numbers = of([1, 2, 3, 4]);
        assert_eq!(numbers.fold(0, |acc, x| acc + x).unwrap(), 10);
    }

    #[test]
    fn test_fold_right_folds_back_to_front() {
        let letters = of(["a", "b", "c"]);
        let folded = letters
            .fold_right(String::new(), |value, acc| format!("{value}{acc}"))
            .unwrap();
        assert_eq!(folded, "abc");
    }

    #[test]
    fn test_any_and_find() {
        let numbers = of([1, 2, 3]);
        assert!(numbers.any(|x| *x == 2).unwrap());
        assert!(!numbers.any(|x| *x == 7).unwrap());
        assert_eq!(numbers.find(|x| *x > 1).unwrap(), Some(2));
        assert_eq!(numbers.find(|x| *x > 9).unwrap(), None);
    }

    #[test]
    fn test_index_of_and_join() {
        let numbers = of([5, 7, 9]);
        assert_eq!(numbers.index_of(&7).unwrap(), Some(1));
        assert_eq!(numbers.index_of(&8).unwrap(), None);
        assert_eq!(numbers.join(", ").unwrap(), "5, 7, 9");
        assert_eq!(of(Vec::<i32>::new()).join(", ").unwrap(), "");
    }

    #[test]
    fn test_for_each_visits_in_order() {
        let mut seen = Vec::new();
        of([1, 2, 3]).for_each(|x| seen.push(x)).unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_to_vec_releases_cursor_on_fault() {
        let released = Rc::new(Cell::new(false));
        let flag = Rc::clone(&released);
        let faulty = produce(move || {
            let flag = Rc::clone(&flag);
            let mut n = 0;
            from_fn(move || {
                n += 1;
                if n == 1 {
                    Ok(Step::Next(n))
                } else {
                    Err("backing store vanished".into())
                }
            })
            .guard(move || flag.set(true))
        });
        let fault = faulty.to_vec().unwrap_err();
        assert!(fault.is_producer());
        assert!(released.get());
    }

    #[test]
    fn test_boxed_preserves_freshness() {
        let erased = of([1, 2, 3]).map(|x| x + 1).boxed();
        assert_eq!(erased.to_vec().unwrap(), vec![2, 3, 4]);
        assert_eq!(erased.to_vec().unwrap(), vec![2, 3, 4]);
        assert_eq!(erased.clone().to_vec().unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_shared_sequence_hands_out_independent_cursors() {
        let shared = Rc::new(of([1, 2]));
        let one = Rc::clone(&shared);
        assert_eq!(one.to_vec().unwrap(), vec![1, 2]);
        assert_eq!(shared.to_vec().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_either_sequence_runs_both_sides() {
        let mut branches = Vec::new();
        branches.push(either::Either::Left(of([1, 2])));
        branches.push(either::Either::Right(of([9]).map(|x| x + 1)));

        assert_eq!(branches[0].to_vec().unwrap(), vec![1, 2]);
        assert_eq!(branches[1].to_vec().unwrap(), vec![10]);
    }
}
