/// The decision oracle: anything that can answer "given A and B, which is preferred?".
///
/// The engine only ever talks to this trait. A blocking console prompt, a UI
/// answering from another thread, or a deterministic fake in a test all look
/// the same from the sorter's side.
use thiserror::Error;

/// Why an oracle could not produce an answer.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The user (or the embedding context) asked to stop. Not a data error.
    #[error("sort cancelled")]
    Cancelled,
    /// The oracle has no way of answering, e.g. its input stream is gone.
    #[error("decision oracle failed: {0}")]
    Failed(Box<dyn std::error::Error + Send + Sync>),
}

impl OracleError {
    pub fn failed(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        OracleError::Failed(err.into())
    }
}

pub trait DecisionOracle {
    /// Returns `Ok(true)` iff `a` should be ranked above `b`.
    ///
    /// There is no tie state. Every call either yields a boolean or an error;
    /// the engine trusts each answer even if it contradicts earlier ones.
    fn prefer(&mut self, a: &str, b: &str) -> Result<bool, OracleError>;
}

impl<O: DecisionOracle + ?Sized> DecisionOracle for &mut O {
    fn prefer(&mut self, a: &str, b: &str) -> Result<bool, OracleError> {
        (**self).prefer(a, b)
    }
}

impl<O: DecisionOracle + ?Sized> DecisionOracle for Box<O> {
    fn prefer(&mut self, a: &str, b: &str) -> Result<bool, OracleError> {
        (**self).prefer(a, b)
    }
}

/// Oracle backed by an infallible closure. See [`from_fn`].
pub struct FnOracle<F> {
    f: F,
}

impl<F> DecisionOracle for FnOracle<F>
where
    F: FnMut(&str, &str) -> bool,
{
    fn prefer(&mut self, a: &str, b: &str) -> Result<bool, OracleError> {
        Ok((self.f)(a, b))
    }
}

/// Wrap a plain `prefer(a, b) -> bool` closure as a [`DecisionOracle`].
pub fn from_fn<F>(f: F) -> FnOracle<F>
where
    F: FnMut(&str, &str) -> bool,
{
    FnOracle { f }
}
