use pretty_assertions::assert_eq;
use tests::*;

#[tokio::test]
async fn update_matching_rows() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "UPDATE",
                "table": "Employee",
                "updates": {"JobRank": "Lead"},
                "conditions": [{"field": "SupervisorID", "operator": "=", "value": 7}]
            }),
        )
        .await
        .unwrap();

    assert_eq!(result.rows_affected(), Some(4));
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE JobRank = 'Lead'"), 5);
}

#[tokio::test]
async fn update_without_conditions_never_runs() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({"operation": "UPDATE", "table": "Employee", "updates": {"JobRank": "Lead"}}),
        )
        .await;

    assert_err!(result, is_missing_conditions);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE JobRank = 'Lead'"), 1);
}

#[tokio::test]
async fn primary_key_columns_are_stripped() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "UPDATE",
                "table": "Employee",
                "updates": {"EmpID": 70, "Title": "Director"},
                "conditions": [{"field": "EmpID", "operator": "=", "value": 7}]
            }),
        )
        .await
        .unwrap();

    assert_eq!(result.rows_affected(), Some(1));
    assert_eq!(
        company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 7 AND Title = 'Director'"),
        1
    );
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 70"), 0);
}

#[tokio::test]
async fn primary_key_only_update_is_refused() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "UPDATE",
                "table": "Employee",
                "updates": {"EmpID": 70},
                "conditions": [{"field": "EmpID", "operator": "=", "value": 7}]
            }),
        )
        .await;

    assert_err!(result, is_primary_key_update_refused);

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "UPDATE",
                "table": "Employee",
                "updates": {},
                "conditions": [{"field": "EmpID", "operator": "=", "value": 7}]
            }),
        )
        .await;

    assert_err!(result, is_empty_update);
}

#[tokio::test]
async fn update_to_dangling_reference_is_a_conflict() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "UPDATE",
                "table": "Employee",
                "updates": {"SupervisorID": 999},
                "conditions": [{"field": "EmpID", "operator": "=", "value": 8}]
            }),
        )
        .await;

    assert_err!(result, is_referential_conflict);
    assert_eq!(company.scalar("SELECT SupervisorID FROM Employee WHERE EmpID = 8"), 7);
}
