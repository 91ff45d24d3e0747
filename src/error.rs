//! Error types for the generator algebra and the check driver.

use thiserror::Error;

/// Failure kinds raised by generator combinators and the property driver.
///
/// These are tagged errors, not exceptions-as-control-flow: a caller that
/// gets [`Error::SuchThat`] from a generator is looking at a malformed
/// generator or an unsatisfiable predicate, not a counterexample.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `such_that`/distinct-collection generators could not satisfy their
    /// predicate within the configured number of attempts.
    #[error("{what} did not satisfy its predicate after {tries} attempts")]
    SuchThat { what: String, tries: usize },

    /// The user's predicate panicked or otherwise raised; captured as a
    /// failing, non-truthy result rather than unwound.
    #[error("property raised: {message}")]
    PropertyException { message: String },

    /// A combinator was constructed with invalid arguments, e.g. `one_of`
    /// over an empty collection or `frequency` with non-positive weights.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl Error {
    pub fn such_that(what: impl Into<String>, tries: usize) -> Self {
        Error::SuchThat {
            what: what.into(),
            tries,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type threaded through generator construction.
pub type Result<T> = std::result::Result<T, Error>;
