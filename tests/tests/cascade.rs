use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use tests::*;

fn key(column: &str, value: i64) -> IndexMap<String, Value> {
    [(column.to_string(), Value::I64(value))].into_iter().collect()
}

#[tokio::test]
async fn preview_lists_references() {
    let company = Company::setup().await;

    let mut impacts = company
        .db
        .preview_primary_key_change(Permission::Read, "Employee", &key("EmpID", 7))
        .await
        .unwrap();
    impacts.sort_by(|a, b| a.referencing_table.cmp(&b.referencing_table));

    let counts: Vec<_> = impacts
        .iter()
        .map(|impact| {
            (
                impact.referencing_table.as_str(),
                impact.referencing_column.as_str(),
                impact.affected_row_count,
            )
        })
        .collect();

    assert_eq!(
        counts,
        [
            ("Customer", "PreferredSalesRep", 2),
            ("Employee", "SupervisorID", 4),
            ("Sale", "SalesPersonID", 2),
        ]
    );

    // Nothing references employee 12
    let impacts = company
        .db
        .preview_primary_key_change(Permission::Read, "Employee", &key("EmpID", 12))
        .await
        .unwrap();
    assert!(impacts.is_empty());
}

#[tokio::test]
async fn preview_rejects_non_key_columns() {
    let company = Company::setup().await;

    let result = company
        .db
        .preview_primary_key_change(Permission::Read, "Employee", &key("SupervisorID", 7))
        .await;
    assert_err!(result, is_invalid_condition);

    let result = company
        .db
        .preview_primary_key_change(Permission::Read, "Employee", &key("Salary", 7))
        .await;
    assert_err!(result, is_unknown_column);
}

#[tokio::test]
async fn cascade_rewrites_self_references() {
    let company = Company::setup().await;

    let change = PrimaryKeyChange::new("Employee")
        .key("EmpID", 7, 70)
        .update_references(true);

    let result = company.db.run_cascade(Permission::Write, change).await.unwrap();

    assert_eq!(result.rows_affected, 1);

    let mut references = result.references.clone();
    references.sort_by(|a, b| a.referencing_table.cmp(&b.referencing_table));
    let counts: Vec<_> = references
        .iter()
        .map(|impact| (impact.referencing_table.as_str(), impact.affected_row_count))
        .collect();
    assert_eq!(counts, [("Customer", 2), ("Employee", 4), ("Sale", 2)]);

    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 7"), 0);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 70"), 1);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE SupervisorID = 7"), 0);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE SupervisorID = 70"), 4);
    assert_eq!(
        company.scalar("SELECT COUNT(*) FROM Customer WHERE PreferredSalesRep = 70"),
        2
    );
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Sale WHERE SalesPersonID = 70"), 2);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM pragma_foreign_key_check()"), 0);
}

#[tokio::test]
async fn failed_cascade_changes_nothing() {
    let company = Company::setup().await;

    // There is no person 90, so the moved employee row would dangle
    let change = PrimaryKeyChange::new("Employee")
        .key("EmpID", 7, 90)
        .update_references(true);

    let result = company.db.run_cascade(Permission::Write, change).await;
    assert_err!(result, is_referential_conflict);

    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 7"), 1);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 90"), 0);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE SupervisorID = 7"), 4);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Sale WHERE SalesPersonID = 7"), 2);

    // The pooled connection is usable afterwards
    let rows = company
        .db
        .run_query(
            Permission::Read,
            request!({
                "operation": "SELECT",
                "table": "Employee",
                "conditions": [{"field": "EmpID", "operator": "=", "value": 7}]
            }),
        )
        .await
        .unwrap()
        .into_rows();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn cascade_requires_update_references() {
    let company = Company::setup().await;

    let change = PrimaryKeyChange::new("Employee").key("EmpID", 7, 70);

    let result = company.db.run_cascade(Permission::Write, change).await;
    assert_err!(result, is_primary_key_update_refused);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Employee WHERE EmpID = 7"), 1);
}

#[tokio::test]
async fn cascade_of_missing_row_is_not_found() {
    let company = Company::setup().await;

    let change = PrimaryKeyChange::new("Employee")
        .key("EmpID", 40, 41)
        .update_references(true);

    let result = company.db.run_cascade(Permission::Write, change).await;
    assert_err!(result, is_record_not_found);
}

#[tokio::test]
async fn cascade_validates_the_key() {
    let company = Company::setup().await;

    // Unchanged key
    let change = PrimaryKeyChange::new("Employee")
        .key("EmpID", 7, 7)
        .update_references(true);
    assert_err!(company.db.run_cascade(Permission::Write, change).await, is_empty_update);

    // Partial composite key
    let change = PrimaryKeyChange::new("Sale_Line")
        .key("LineNo", 1, 3)
        .update_references(true);
    assert_err!(company.db.run_cascade(Permission::Write, change).await, is_invalid_condition);

    // Composite key, one column changing
    let mut change = PrimaryKeyChange::new("Sale_Line")
        .key("LineNo", 2, 3)
        .update_references(true);
    change.from.insert("SaleID".to_string(), Value::I64(1));

    let result = company.db.run_cascade(Permission::Write, change).await.unwrap();
    assert_eq!(result.rows_affected, 1);
    assert!(result.references.is_empty());
    assert_eq!(
        company.scalar("SELECT COUNT(*) FROM Sale_Line WHERE SaleID = 1 AND LineNo = 3"),
        1
    );
}
