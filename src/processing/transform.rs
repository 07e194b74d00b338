//! Analysis-ready performance table.

use crate::entity::{DEPARTMENT_ADMISSION, DEPARTMENT_ID, STUDENT_ID};
use crate::error::QualityResult;
use crate::types::RowSet;

use super::join::left_join;

/// Enrich cleaned performance rows with student and department attributes.
///
/// Performance is left-joined to counseling on `Student_ID`, then to departments on the
/// admitted department (`Department_ID` when the joined table has one, `Department_Admission`
/// otherwise). Each join is skipped when its key column is missing.
pub fn build_transformed(
    performance: &RowSet,
    counseling: &RowSet,
    departments: &RowSet,
) -> QualityResult<RowSet> {
    let with_students = left_join(performance, counseling, STUDENT_ID, STUDENT_ID, "_student")?;

    let department_key = if with_students.has_column(DEPARTMENT_ID) {
        DEPARTMENT_ID
    } else {
        DEPARTMENT_ADMISSION
    };
    left_join(&with_students, departments, department_key, DEPARTMENT_ID, "_dept")
}
