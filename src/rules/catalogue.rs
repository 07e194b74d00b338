//! Per-entity rule catalogues.

use crate::entity::{
    DEPARTMENT_ADMISSION, DEPARTMENT_ID, DEPARTMENT_NAME, DOE, EFFORT_HOURS, Entity, MARKS,
    PAPER_ID, STUDENT_ID,
};
use crate::ledger::IssueType;

use super::{
    ForeignKey, MinimumYear, NonNegativeInteger, NullCells, NullRow, RealRange, RequiredText,
    RuleSet, Uniqueness,
};

/// Earliest acceptable department establishment year.
pub const MIN_DOE_YEAR: i64 = 1900;
pub const MARKS_MIN: f64 = 0.0;
pub const MARKS_MAX: f64 = 100.0;

/// Rule catalogue applied to `entity`.
pub fn rules_for(entity: Entity) -> RuleSet {
    match entity {
        Entity::Department => department_rules(),
        Entity::Employee => employee_rules(),
        Entity::Counseling => counseling_rules(),
        Entity::Performance => performance_rules(),
    }
}

pub fn department_rules() -> RuleSet {
    RuleSet::new(Entity::Department)
        .with_rule(NullCells)
        .with_rule(Uniqueness::column(DEPARTMENT_ID, IssueType::DuplicateKey))
        .with_rule(Uniqueness::column(DEPARTMENT_NAME, IssueType::DuplicateValue))
        .with_rule(MinimumYear::new(DOE, MIN_DOE_YEAR))
}

/// Employees are passed through; the empty catalogue still yields an (empty) report.
pub fn employee_rules() -> RuleSet {
    RuleSet::new(Entity::Employee)
}

/// Admission records. Expects the department row set as the reference at apply time.
pub fn counseling_rules() -> RuleSet {
    RuleSet::new(Entity::Counseling)
        .with_rule(RequiredText::new(DEPARTMENT_ADMISSION))
        .with_rule(ForeignKey::new(
            DEPARTMENT_ADMISSION,
            Entity::Department.dataset_name(),
            DEPARTMENT_ID,
        ))
}

pub fn performance_rules() -> RuleSet {
    RuleSet::new(Entity::Performance)
        .with_rule(NullRow)
        .with_rule(RealRange::new(MARKS, MARKS_MIN, MARKS_MAX))
        .with_rule(NonNegativeInteger::new(EFFORT_HOURS))
        .with_rule(Uniqueness::combination(
            [STUDENT_ID, PAPER_ID],
            IssueType::DuplicatePair,
        ))
}
