use quarry::db::Connect;
use tests::*;

/// A second handle on the company database whose n-th reference count
/// fails.
async fn failing_db(company: &Company, fail_at: usize) -> Db {
    let driver = FailingCountDriver::new(Connect::new(&company.url()).unwrap(), fail_at);
    Db::builder().build(driver).await.unwrap()
}

#[tokio::test]
async fn failed_count_aborts_cascade() {
    let company = Company::setup().await;
    let db = failing_db(&company, 2).await;

    // Employee 7 is referenced from three tables; the second count fails
    let change = PrimaryKeyChange::new("Employee")
        .key("EmpID", 7, 70)
        .update_references(true);

    let err = db.run_cascade(Permission::Write, change).await.unwrap_err();
    assert!(err.is_cascade_computation(), "{err}");
    assert_eq!(ErrorResponse::from(&err).status, 500);

    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 7"), 1);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 70"), 0);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE SupervisorID = 7"), 4);
    assert_eq!(
        company.scalar("SELECT COUNT(*) FROM Customer WHERE PreferredSalesRep = 7"),
        2
    );
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Sale WHERE SalesPersonID = 7"), 2);
}

#[tokio::test]
async fn failed_count_aborts_delete() {
    let company = Company::setup().await;
    let db = failing_db(&company, 1).await;

    let result = db
        .run_query(
            Permission::Write,
            request!({
                "operation": "DELETE",
                "table": "Department",
                "conditions": [{"field": "DeptID", "operator": "=", "value": 4}]
            }),
        )
        .await;
    assert_err!(result, is_cascade_computation);

    // Research is unreferenced, so only the failed count kept it
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Department WHERE DeptID = 4"), 1);
}

#[tokio::test]
async fn failed_count_fails_preview() {
    let company = Company::setup().await;
    let db = failing_db(&company, 1).await;

    let key = [("EmpID".to_string(), Value::I64(7))].into_iter().collect();
    let result = db
        .preview_primary_key_change(Permission::Read, "Employee", &key)
        .await;
    assert_err!(result, is_cascade_computation);
}
