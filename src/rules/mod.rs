//! Validation rules and the per-entity rule engine.
//!
//! A [`Rule`] is a pure function from a [`RowSet`] (plus an optional reference row set, used by
//! foreign-key checks) to a list of [`ExceptionRecord`]s. A [`RuleSet`] applies an ordered
//! catalogue of rules to one entity and collects every finding into an
//! [`ExceptionLedger`]:
//!
//! - rules run in catalogue order, and records are appended in that order;
//! - no rule short-circuits another, so one row may collect several records;
//! - a rule whose [`Rule::required_columns`] are not all present is skipped (logged and noted
//!   on the ledger), never treated as an error.
//!
//! ## Example
//!
//! ```rust
//! use edu_quality::entity::Entity;
//! use edu_quality::rules::rules_for;
//! use edu_quality::types::{RowSet, Value};
//!
//! # fn main() -> Result<(), edu_quality::QualityError> {
//! let departments = RowSet::new(
//!     vec!["Department_ID".into(), "Department_Name".into(), "DOE".into()],
//!     vec![
//!         vec![Value::Int64(1), Value::Utf8("CS".into()), Value::Int64(2000)],
//!         vec![Value::Int64(1), Value::Utf8("EE".into()), Value::Int64(1990)],
//!     ],
//! )?;
//!
//! let ledger = rules_for(Entity::Department).apply(&departments, None);
//! assert_eq!(ledger.len(), 2); // both rows share Department_ID 1
//! # Ok(())
//! # }
//! ```

pub mod catalogue;
pub mod coerce;
pub mod foreign_key;
pub mod missing;
pub mod range;
pub mod uniqueness;

use std::fmt;

use crate::entity::Entity;
use crate::ledger::{ExceptionLedger, ExceptionRecord};
use crate::types::RowSet;

pub use catalogue::{
    MARKS_MAX, MARKS_MIN, MIN_DOE_YEAR, counseling_rules, department_rules, employee_rules,
    performance_rules, rules_for,
};
pub use coerce::{CoercionError, Integral};
pub use foreign_key::ForeignKey;
pub use missing::{NullCells, NullRow, RequiredText};
pub use range::{MinimumYear, NonNegativeInteger, RealRange};
pub use uniqueness::Uniqueness;

/// A validation rule.
pub trait Rule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Columns that must exist for the rule to apply.
    fn required_columns(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Evaluate the rule. Must not depend on anything but its arguments.
    fn evaluate(&self, rows: &RowSet, reference: Option<&RowSet>) -> Vec<ExceptionRecord>;
}

/// Ordered rule catalogue for one entity.
pub struct RuleSet {
    entity: Entity,
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// Create an empty rule set. An empty set still produces an (empty) ledger.
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            rules: Vec::new(),
        }
    }

    /// Append a rule to the catalogue.
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name())
    }

    /// Apply every applicable rule to `rows` and collect the findings.
    pub fn apply(&self, rows: &RowSet, reference: Option<&RowSet>) -> ExceptionLedger {
        let mut ledger = ExceptionLedger::new(self.entity);

        for rule in &self.rules {
            let missing = rows.missing_columns(&rule.required_columns());
            if !missing.is_empty() {
                tracing::warn!(
                    entity = %self.entity,
                    rule = rule.name(),
                    missing = ?missing,
                    "required columns absent, rule skipped"
                );
                ledger.record_skipped(
                    rule.name(),
                    missing.iter().map(|c| c.to_string()).collect(),
                );
                continue;
            }

            let found = rule.evaluate(rows, reference);
            tracing::debug!(
                entity = %self.entity,
                rule = rule.name(),
                exceptions = found.len(),
                "rule evaluated"
            );
            ledger.extend(found);
        }

        ledger
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("entity", &self.entity)
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .finish()
    }
}
