use pretty_assertions::assert_eq;
use tests::*;

#[tokio::test]
async fn generated_key_is_ignored_and_returned() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "INSERT",
                "table": "Department",
                "data": {"DeptID": 99, "DeptName": "Legal"}
            }),
        )
        .await
        .unwrap();

    assert_eq!(result.rows_affected(), Some(1));
    assert_eq!(result.generated_key(), Some(&Value::I64(5)));

    assert_eq!(company.scalar("SELECT COUNT(*) FROM Department WHERE DeptID = 99"), 0);
    assert_eq!(
        company.scalar("SELECT COUNT(*) FROM Department WHERE DeptID = 5 AND DeptName = 'Legal'"),
        1
    );
}

#[tokio::test]
async fn natural_keys_are_inserted_as_given() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "INSERT",
                "table": "Employee",
                "data": {"EmpID": 20, "JobRank": "Junior", "Title": "Analyst", "SupervisorID": 2}
            }),
        )
        .await
        .unwrap();

    assert_eq!(result.rows_affected(), Some(1));
    assert_eq!(result.generated_key(), None);
    assert_eq!(company.scalar("SELECT SupervisorID FROM Employee WHERE EmpID = 20"), 2);
}

#[tokio::test]
async fn payload_of_only_generated_columns_is_empty() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({"operation": "INSERT", "table": "Department", "data": {"DeptID": 7}}),
        )
        .await;

    assert_err!(result, is_empty_payload);
}

#[tokio::test]
async fn unknown_column_is_rejected() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({"operation": "INSERT", "table": "Department", "data": {"Budget": 10}}),
        )
        .await;

    assert_err!(result, is_unknown_column);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Department"), 4);
}

#[tokio::test]
async fn foreign_key_violation_is_a_conflict() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "INSERT",
                "table": "Job_Position",
                "data": {"DeptID": 42, "Title": "Ghost"}
            }),
        )
        .await;

    let err = result.unwrap_err();
    assert!(err.is_referential_conflict(), "{err}");

    // The engine reports no impact list
    assert!(ErrorResponse::from(&err).references.is_none());
}
