//! Case/when derived columns with a replayable lineage trail.
//!
//! A [`RuleChain`](casewhen_model::RuleChain) fills one output column with
//! if / else-if / else semantics. Every predicate evaluated along the way is
//! recorded, so each derived value can be explained after the fact from the
//! dataset's [`LineageHistory`].
//!
//! ```no_run
//! use casewhen_engine::Dataset;
//! use casewhen_model::{RuleChain, RuleExpression};
//! use polars::prelude::*;
//!
//! let data = DataFrame::new(vec![Column::new("age".into(), &[10i64, 25, 40])])?;
//! let mut dataset = Dataset::named(data, "people");
//! let chain = RuleChain::new("minor")
//!     .named("segment")
//!     .when(RuleExpression::greater_than("age", 30i64), "senior")
//!     .when(RuleExpression::greater_than("age", 18i64), "adult");
//! dataset.apply_case(&chain)?;
//! for record in dataset.lineage() {
//!     println!("{record}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod chain;
pub mod combinator;
pub mod error;
pub mod frame;
pub mod output;
pub mod predicate;
pub mod recorder;
pub mod resolver;

pub use chain::{CaseOutcome, execute};
pub use combinator::{and_all, combine, or_all};
pub use error::{CaseError, Result};
pub use frame::Dataset;
pub use output::OutputColumn;
pub use recorder::{BufferedEntry, LineageBuffer, LineageGroup, LineageHistory};
pub use resolver::resolve;
