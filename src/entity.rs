//! The four entities of an institutional extract and their well-known column names.

/// `Department_Information.Department_ID`, also the foreign-key target of admissions.
pub const DEPARTMENT_ID: &str = "Department_ID";
pub const DEPARTMENT_NAME: &str = "Department_Name";
/// Department date of establishment, as a year.
pub const DOE: &str = "DOE";
pub const DEPARTMENT_ADMISSION: &str = "Department_Admission";
pub const STUDENT_ID: &str = "Student_ID";
pub const PAPER_ID: &str = "Paper_ID";
pub const MARKS: &str = "Marks";
pub const EFFORT_HOURS: &str = "Effort_Hours";

/// One dataset of the institution, in the fixed order used by summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Entity {
    Department,
    Employee,
    Counseling,
    Performance,
}

impl Entity {
    /// All entities in reporting order.
    pub const ALL: [Entity; 4] = [
        Entity::Department,
        Entity::Employee,
        Entity::Counseling,
        Entity::Performance,
    ];

    /// Dataset (table/view) name of the entity.
    pub fn dataset_name(self) -> &'static str {
        match self {
            Entity::Department => "Department_Information",
            Entity::Employee => "Employee_Information",
            Entity::Counseling => "Student_Counceling_Information",
            Entity::Performance => "Student_Performance_Data",
        }
    }

    /// Default CSV file name of the raw extract.
    pub fn default_file_name(self) -> String {
        format!("{}.csv", self.dataset_name())
    }

    /// File name of the entity's exception report.
    pub fn exceptions_file_name(self) -> String {
        format!("{}_exceptions.csv", self.dataset_name())
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dataset_name())
    }
}
