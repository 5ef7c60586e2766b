//! pairrank-core: rank opaque text items from pairwise judgments.
//!
//! A merge sort whose comparator is a [`DecisionOracle`]: a human at a prompt,
//! a UI on another thread, or a fake in a test. No IO, no terminal, no threads.
//! Bring your own oracle.
//!
//! # Quick start
//!
//! ```rust
//! use pairrank_core::{from_fn, sort};
//!
//! let items = vec!["Cherry".to_string(), "Apple".to_string(), "Banana".to_string()];
//!
//! // Prefer whatever sorts first alphabetically.
//! let ranking = sort(&items, &mut from_fn(|a: &str, b: &str| a < b)).unwrap();
//!
//! for (rank, item) in ranking.ranked() {
//!     println!("{rank}. {item}");
//! }
//! assert_eq!(ranking.items()[0], "Apple");
//! ```

pub mod cancel;
pub mod engine;
pub mod oracle;
pub mod types;

// Re-export primary public API at crate root.
pub use cancel::CancelToken;
pub use engine::{max_comparisons, min_comparisons, sort, sort_with_cancel};
pub use oracle::{DecisionOracle, FnOracle, OracleError, from_fn};
pub use types::Ranking;
