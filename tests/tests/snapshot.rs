use pretty_assertions::assert_eq;
use tests::*;

#[tokio::test]
async fn snapshot_orders_parents_first() {
    let company = Company::setup().await;

    let snapshot = company.db.snapshot(Permission::Admin, None).await.unwrap();

    let names: Vec<_> = snapshot.tables().iter().map(|table| table.name()).collect();
    let position = |name: &str| names.iter().position(|n| *n == name).unwrap();

    assert_eq!(names.len(), 7);
    assert!(position("Person") < position("Employee"));
    assert!(position("Employee") < position("Customer"));
    assert!(position("Customer") < position("Sale"));
    assert!(position("Sale") < position("Sale_Line"));
    assert!(position("Department") < position("Job_Position"));

    let departments = snapshot.table("Department").unwrap();
    assert_eq!(departments.columns(), ["DeptID", "DeptName"]);
    assert_eq!(departments.rows()[3], [Value::I64(4), Value::from("Research")]);
}

#[tokio::test]
async fn restore_replaces_table_contents() {
    let company = Company::setup().await;

    let tables = ["Department".to_string(), "Job_Position".to_string()];
    let snapshot = company
        .db
        .snapshot(Permission::Admin, Some(&tables))
        .await
        .unwrap();
    assert_eq!(snapshot.row_count(), 8);

    company.execute(
        "DELETE FROM Job_Position WHERE DeptID = 3;
         DELETE FROM Department WHERE DeptID = 3;
         INSERT INTO Department VALUES (9, 'Temporary');
         UPDATE Job_Position SET Title = 'Changed' WHERE JobID = 1;",
    );

    let restored = company.db.restore(Permission::Admin, snapshot).await.unwrap();
    assert_eq!(restored, 8);

    assert_eq!(company.scalar("SELECT COUNT(*) FROM Department"), 4);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Department WHERE DeptID = 9"), 0);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Job_Position WHERE DeptID = 3"), 2);
    assert_eq!(
        company.scalar("SELECT COUNT(*) FROM Job_Position WHERE Title = 'Developer'"),
        1
    );
}

#[tokio::test]
async fn restore_undoes_a_cascade() {
    let company = Company::setup().await;

    let snapshot = company.db.snapshot(Permission::Admin, None).await.unwrap();

    let change = PrimaryKeyChange::new("Employee")
        .key("EmpID", 7, 70)
        .update_references(true);
    company.db.run_cascade(Permission::Write, change).await.unwrap();

    company.db.restore(Permission::Admin, snapshot).await.unwrap();

    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 7"), 1);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE SupervisorID = 7"), 4);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Sale WHERE SalesPersonID = 7"), 2);
}

#[tokio::test]
async fn restore_checks_tables_before_writing() {
    let company = Company::setup().await;

    let snapshot: quarry::Snapshot = serde_json::from_value(serde_json::json!({
        "tables": [
            {"name": "Department", "columns": ["DeptID", "DeptName"], "rows": []},
            {"name": "Payroll", "columns": ["ID"], "rows": [[1]]}
        ]
    }))
    .unwrap();

    let result = company.db.restore(Permission::Admin, snapshot).await;
    assert_err!(result, is_unknown_table);

    assert_eq!(company.scalar("SELECT COUNT(*) FROM Department"), 4);
}

#[tokio::test]
async fn snapshot_of_unknown_table() {
    let company = Company::setup().await;

    let tables = ["Payroll".to_string()];
    let result = company.db.snapshot(Permission::Admin, Some(&tables)).await;
    assert_err!(result, is_unknown_table);
}

#[tokio::test]
async fn blobs_restore_from_json() {
    let company = Company::setup().await;
    company.execute(
        "CREATE TABLE Doc (DocID INTEGER PRIMARY KEY, Body BLOB);
         INSERT INTO Doc VALUES (1, x'0102ff'), (2, x'');",
    );

    let tables = ["Doc".to_string()];
    let snapshot = company
        .db
        .snapshot(Permission::Admin, Some(&tables))
        .await
        .unwrap();

    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: quarry::Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
    assert_eq!(
        parsed.table("Doc").unwrap().rows()[0],
        [Value::I64(1), Value::Bytes(vec![1, 2, 255])]
    );

    company.execute("UPDATE Doc SET Body = x'00' WHERE DocID = 1; DELETE FROM Doc WHERE DocID = 2;");

    let restored = company.db.restore(Permission::Admin, parsed).await.unwrap();
    assert_eq!(restored, 2);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Doc WHERE Body = x'0102ff'"), 1);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Doc WHERE DocID = 2 AND length(Body) = 0"), 1);
}
