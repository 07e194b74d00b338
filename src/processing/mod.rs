//! In-memory row set transformations applied after validation.
//!
//! - [`clean()`]: drop discarded rows and re-index
//! - [`left_join()`]: enrich a row set with attributes from another
//! - [`build_transformed()`]: the analysis-ready performance table
//!
//! ## Example: validate → discard set → clean
//!
//! ```rust
//! use edu_quality::entity::Entity;
//! use edu_quality::ledger::{DiscardPolicy, discard_set};
//! use edu_quality::processing::clean;
//! use edu_quality::rules::rules_for;
//! use edu_quality::types::{RowSet, Value};
//!
//! # fn main() -> Result<(), edu_quality::QualityError> {
//! let performance = RowSet::new(
//!     vec!["Student_ID".into(), "Paper_ID".into(), "Marks".into(), "Effort_Hours".into()],
//!     vec![
//!         vec![Value::Int64(5), Value::Int64(9), Value::Int64(150), Value::Int64(3)],
//!         vec![Value::Int64(6), Value::Int64(9), Value::Int64(72), Value::Int64(4)],
//!     ],
//! )?;
//!
//! let ledger = rules_for(Entity::Performance).apply(&performance, None);
//! let discard = discard_set(&ledger, &DiscardPolicy::for_entity(Entity::Performance));
//! let cleaned = clean(&performance, &discard);
//!
//! assert_eq!(cleaned.row_count(), 1);
//! assert_eq!(cleaned.row_indices(), &[0]);
//! # Ok(())
//! # }
//! ```

pub mod clean;
pub mod join;
pub mod transform;

pub use clean::{CleanStats, clean, clean_with_stats};
pub use join::left_join;
pub use transform::build_transformed;
