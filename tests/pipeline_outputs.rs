use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use edu_quality::QualityError;
use edu_quality::entity::Entity;
use edu_quality::ingestion::csv::ingest_csv_from_path;
use edu_quality::pipeline::{InputFiles, PipelineOptions, run_from_dir};
use edu_quality::types::Value;

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("edu-quality-{name}-{nanos}"))
}

fn fixture_options(output_dir: PathBuf) -> PipelineOptions {
    PipelineOptions {
        input_dir: PathBuf::from("tests/fixtures/edu"),
        output_dir,
        ..Default::default()
    }
}

#[test]
fn run_from_dir_writes_every_output() {
    let out = tmp_dir("outputs");
    let outcome = run_from_dir(&fixture_options(out.clone())).unwrap();

    for entity in Entity::ALL {
        assert!(out.join(entity.exceptions_file_name()).is_file(), "{entity} report missing");
    }
    for name in [
        "Student_Performance_Data_cleaned.csv",
        "ETL_Exception_Summary.csv",
        "ETL_Exception_Summary.json",
        "transformed.csv",
    ] {
        assert!(out.join(name).is_file(), "{name} missing");
    }

    let summary = fs::read_to_string(out.join("ETL_Exception_Summary.csv")).unwrap();
    assert_eq!(
        summary,
        "dataset,exceptions\n\
         Department_Information,5\n\
         Employee_Information,0\n\
         Student_Counceling_Information,2\n\
         Student_Performance_Data,9\n"
    );
    assert_eq!(outcome.summary.total(), 16);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("ETL_Exception_Summary.json")).unwrap()).unwrap();
    assert_eq!(json[3]["dataset"], "Student_Performance_Data");
    assert_eq!(json[3]["exceptions"], 9);

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn empty_report_is_header_only() {
    let out = tmp_dir("empty-report");
    run_from_dir(&fixture_options(out.clone())).unwrap();

    let employee = fs::read_to_string(out.join("Employee_Information_exceptions.csv")).unwrap();
    assert_eq!(employee, "row_index,column,issue_type,details\n");

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn department_report_lists_findings_in_rule_order() {
    let out = tmp_dir("department-report");
    run_from_dir(&fixture_options(out.clone())).unwrap();

    let report = fs::read_to_string(out.join("Department_Information_exceptions.csv")).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines,
        vec![
            "row_index,column,issue_type,details",
            "4,Department_Name,Missing,null value",
            "2,Department_ID,Duplicate Key,Department_ID=IDEPT3",
            "3,Department_ID,Duplicate Key,Department_ID=IDEPT3",
            "1,DOE,Out-of-Range,DOE=1850 (must be >=1900)",
            "2,DOE,Invalid Type,DOE=abc (not integer)",
        ]
    );

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn performance_report_uses_row_and_pair_columns() {
    let out = tmp_dir("performance-report");
    run_from_dir(&fixture_options(out.clone())).unwrap();

    let report = fs::read_to_string(out.join("Student_Performance_Data_exceptions.csv")).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[1], "6,(row),Missing,Missing values in row");
    assert!(lines.contains(&"3,Marks,Invalid Type,Marks=abc not numeric"));
    assert!(lines.contains(&"5,Effort_Hours,Out-of-Range,Effort_Hours=2.5 must be integer >= 0"));
    assert!(lines.contains(&"8,Effort_Hours,Invalid Type,Effort_Hours=x not integer"));
    assert_eq!(
        lines[9],
        "7,\"Student_ID,Paper_ID\",Duplicate Pair,\"(SID20131176, SEMI0012995) appears more than once\""
    );

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn cleaned_table_keeps_valid_rows_reindexed() {
    let out = tmp_dir("cleaned");
    let outcome = run_from_dir(&fixture_options(out.clone())).unwrap();

    assert_eq!(outcome.discard.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6, 8]);
    assert_eq!(outcome.cleaned.row_indices(), &[0, 1, 2]);

    // The written file reads back as the same table.
    let reread = ingest_csv_from_path(out.join("Student_Performance_Data_cleaned.csv")).unwrap();
    assert_eq!(reread, outcome.cleaned);
    assert_eq!(reread.cell(2, "Marks"), Some(&Value::Int64(67)));

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn transformed_table_joins_students_and_departments() {
    let out = tmp_dir("transformed");
    let outcome = run_from_dir(&fixture_options(out.clone())).unwrap();

    let transformed = &outcome.transformed;
    assert_eq!(
        transformed.columns(),
        &[
            "Student_ID",
            "Semster_Name",
            "Paper_ID",
            "Paper_Name",
            "Marks",
            "Effort_Hours",
            "DOA",
            "DOB",
            "Department_Choices",
            "Department_Admission",
            "Department_ID",
            "Department_Name",
            "DOE",
        ]
    );
    // IDEPT3 appears twice in the department extract, so its student's row is repeated.
    assert_eq!(transformed.row_count(), 4);
    assert_eq!(
        transformed.cell(0, "Department_Name"),
        Some(&Value::Utf8("Computer Science".to_string()))
    );

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn transformed_output_can_be_disabled() {
    let out = tmp_dir("no-transformed");
    let opts = PipelineOptions {
        write_transformed: false,
        ..fixture_options(out.clone())
    };
    run_from_dir(&opts).unwrap();

    assert!(!out.join("transformed.csv").exists());
    assert!(out.join("ETL_Exception_Summary.csv").exists());

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn missing_input_fails_before_writing() {
    let out = tmp_dir("missing-input");
    let opts = PipelineOptions {
        inputs: InputFiles {
            employee: PathBuf::from("Employees_2024.csv"),
            ..Default::default()
        },
        ..fixture_options(out.clone())
    };

    let err = run_from_dir(&opts).unwrap_err();
    assert!(matches!(err, QualityError::Csv(_) | QualityError::Io(_)));
    assert!(!out.exists());
}

#[test]
fn missing_input_can_be_tolerated() {
    let out = tmp_dir("tolerated-input");
    let opts = PipelineOptions {
        inputs: InputFiles {
            employee: PathBuf::from("Employees_2024.csv"),
            ..Default::default()
        },
        allow_missing_inputs: true,
        ..fixture_options(out.clone())
    };

    let outcome = run_from_dir(&opts).unwrap();
    assert!(outcome.report(Entity::Employee).is_empty());
    assert_eq!(
        fs::read_to_string(out.join("Employee_Information_exceptions.csv")).unwrap(),
        "row_index,column,issue_type,details\n"
    );

    let _ = fs::remove_dir_all(&out);
}
