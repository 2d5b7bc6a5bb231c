//! Errors that can terminate a sequence.
//!
//! A [`Fault`] distinguishes where the error entered the pipeline: raised
//! inside a producer body, or injected from outside through
//! [`Cursor::fault`](crate::Cursor::fault). Either way, the cursor that
//! surfaces the fault has already run its cleanup action.

use thiserror::Error;

/// Boxed error payload carried by a [`Fault`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal error of a cursor. Cleanup has run by the time one is observed.
///
/// Combinators never catch or convert faults; they release the cursors they
/// hold and forward the fault unchanged, so it surfaces exactly once at the
/// outermost `advance()` call that triggered it.
#[derive(Debug, Error)]
pub enum Fault {
    /// An error raised inside a sequence producer's body.
    #[error("sequence producer faulted: {0}")]
    Producer(#[source] BoxError),
    /// An error injected into a suspended producer by its consumer.
    #[error("fault injected by consumer: {0}")]
    Consumer(#[source] BoxError),
}

impl Fault {
    /// Wraps an error raised by a producer body.
    pub fn producer(error: impl Into<BoxError>) -> Self {
        Fault::Producer(error.into())
    }

    /// Wraps an error injected by a consumer.
    pub fn consumer(error: impl Into<BoxError>) -> Self {
        Fault::Consumer(error.into())
    }

    /// Returns `true` if the fault originated inside a producer body.
    #[inline]
    pub const fn is_producer(&self) -> bool {
        matches!(self, Fault::Producer(_))
    }

    /// Returns `true` if the fault was injected by a consumer.
    #[inline]
    pub const fn is_consumer(&self) -> bool {
        matches!(self, Fault::Consumer(_))
    }

    /// Consumes the fault, returning the underlying error.
    pub fn into_inner(self) -> BoxError {
        match self {
            Fault::Producer(error) | Fault::Consumer(error) => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy() {
        let fault = Fault::producer("disk on fire");
        assert!(fault.is_producer());
        assert!(!fault.is_consumer());

        let fault = Fault::consumer("caller gave up");
        assert!(fault.is_consumer());
    }

    #[test]
    fn test_display_includes_payload() {
        let fault = Fault::producer("disk on fire");
        assert_eq!(fault.to_string(), "sequence producer faulted: disk on fire");

        let fault = Fault::consumer("caller gave up");
        assert_eq!(fault.to_string(), "fault injected by consumer: caller gave up");
    }

    #[test]
    fn test_into_inner() {
        let fault = Fault::producer("disk on fire");
        assert_eq!(fault.into_inner().to_string(), "disk on fire");
    }
}
