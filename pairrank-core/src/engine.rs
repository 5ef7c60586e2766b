/// Comparator-driven merge sort.
///
/// Classic top-down merge sort where every ordering decision comes from a
/// [`DecisionOracle`]. Nothing is cached or inferred from transitivity: if the
/// same pair comes up twice, the oracle is asked twice.
///
/// The engine has no error path of its own. It returns a complete ranking, or
/// whatever error the oracle (or the cancel token) produced.
use tracing::{debug, trace};

use crate::cancel::CancelToken;
use crate::oracle::{DecisionOracle, OracleError};
use crate::types::Ranking;

/// Sort `items` most-preferred first, asking `oracle` for every ordering decision.
pub fn sort<O>(items: &[String], oracle: &mut O) -> Result<Ranking, OracleError>
where
    O: DecisionOracle + ?Sized,
{
    MergeSort { oracle, cancel: None, comparisons: 0 }.run(items)
}

/// Like [`sort`], but checks `cancel` before and after every oracle call.
///
/// An answer that arrives after the token was cancelled is discarded.
pub fn sort_with_cancel<O>(
    items: &[String],
    oracle: &mut O,
    cancel: &CancelToken,
) -> Result<Ranking, OracleError>
where
    O: DecisionOracle + ?Sized,
{
    MergeSort { oracle, cancel: Some(cancel), comparisons: 0 }.run(items)
}

struct MergeSort<'a, O: ?Sized> {
    oracle: &'a mut O,
    cancel: Option<&'a CancelToken>,
    comparisons: usize,
}

impl<O: DecisionOracle + ?Sized> MergeSort<'_, O> {
    fn run(mut self, items: &[String]) -> Result<Ranking, OracleError> {
        let sorted = self.sort(items)?;
        debug!(items = items.len(), comparisons = self.comparisons, "merge sort complete");
        Ok(Ranking::new(sorted, self.comparisons))
    }

    fn sort(&mut self, items: &[String]) -> Result<Vec<String>, OracleError> {
        if items.len() <= 1 {
            // Copy, never alias: halves must stay independent while merging.
            return Ok(items.to_vec());
        }
        let mid = items.len() / 2;
        let left = self.sort(&items[..mid])?;
        let right = self.sort(&items[mid..])?;
        self.merge(left, right)
    }

    fn merge(&mut self, left: Vec<String>, right: Vec<String>) -> Result<Vec<String>, OracleError> {
        let mut out = Vec::with_capacity(left.len() + right.len());
        let mut left = left.into_iter().peekable();
        let mut right = right.into_iter().peekable();

        loop {
            let take_left = match (left.peek(), right.peek()) {
                (Some(a), Some(b)) => self.prefer(a, b)?,
                _ => break,
            };
            if take_left {
                out.extend(left.next());
            } else {
                out.extend(right.next());
            }
        }

        // One side is exhausted; the other is already in order.
        out.extend(left);
        out.extend(right);
        Ok(out)
    }

    fn prefer(&mut self, a: &str, b: &str) -> Result<bool, OracleError> {
        self.check_cancelled()?;
        let answer = self.oracle.prefer(a, b)?;
        self.comparisons += 1;
        trace!(a, b, answer, n = self.comparisons, "comparison answered");
        self.check_cancelled()?;
        Ok(answer)
    }

    fn check_cancelled(&self) -> Result<(), OracleError> {
        match self.cancel {
            Some(token) if token.is_cancelled() => {
                debug!(comparisons = self.comparisons, "merge sort cancelled");
                Err(OracleError::Cancelled)
            }
            _ => Ok(()),
        }
    }
}

/// Fewest oracle calls the engine can issue for `n` items.
///
/// Reached when every merge is decided by exhausting the left (shorter) half,
/// e.g. re-sorting an already sorted list with the same oracle.
pub fn min_comparisons(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let mid = n / 2;
    min_comparisons(mid) + min_comparisons(n - mid) + mid
}

/// Most oracle calls the engine can issue for `n` items.
pub fn max_comparisons(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let mid = n / 2;
    max_comparisons(mid) + max_comparisons(n - mid) + n - 1
}
