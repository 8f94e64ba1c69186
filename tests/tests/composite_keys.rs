use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use tests::*;

/// Adds `Return_Line`, whose foreign key covers both columns of the
/// `Sale_Line` key. Sale 2 gets a fifth line so that `LineNo` alone is
/// ambiguous.
async fn setup() -> Company {
    let company = Company::setup().await;

    company.execute(
        "CREATE TABLE Return_Line (
             ReturnID INTEGER PRIMARY KEY,
             SaleID INT NOT NULL,
             LineNo INT NOT NULL,
             FOREIGN KEY (SaleID, LineNo) REFERENCES Sale_Line (SaleID, LineNo)
         );
         INSERT INTO Sale_Line VALUES (2, 5, 1, 1.00);
         INSERT INTO Return_Line VALUES (1, 2, 1), (2, 1, 2);",
    );

    company
}

fn line(sale: i64, line: i64) -> IndexMap<String, Value> {
    [
        ("SaleID".to_string(), Value::I64(sale)),
        ("LineNo".to_string(), Value::I64(line)),
    ]
    .into_iter()
    .collect()
}

fn returned_line(company: &Company, return_id: i64) -> (i64, i64) {
    (
        company.scalar(&format!("SELECT SaleID FROM Return_Line WHERE ReturnID = {return_id}")),
        company.scalar(&format!("SELECT LineNo FROM Return_Line WHERE ReturnID = {return_id}")),
    )
}

#[tokio::test]
async fn schema_groups_composite_foreign_key() {
    let company = setup().await;
    let schema = company.db.describe_schema(Permission::Read).await.unwrap();

    let returns = schema.table("Return_Line").unwrap();
    assert_eq!(returns.relationships.len(), 2);
    assert_eq!(returns.depends_on, ["Sale_Line"]);

    let foreign_keys = returns.foreign_keys();
    assert_eq!(foreign_keys.len(), 1);
    assert_eq!(foreign_keys[0].label(), "SaleID, LineNo");
}

#[tokio::test]
async fn preview_matches_the_whole_key() {
    let company = setup().await;

    let impacts = company
        .db
        .preview_primary_key_change(Permission::Read, "Sale_Line", &line(2, 1))
        .await
        .unwrap();
    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].referencing_table, "Return_Line");
    assert_eq!(impacts[0].referencing_column, "SaleID, LineNo");
    assert_eq!(impacts[0].affected_row_count, 1);

    // Line 1 of sale 1 shares `LineNo` with a returned line but is not
    // itself returned
    let impacts = company
        .db
        .preview_primary_key_change(Permission::Read, "Sale_Line", &line(1, 1))
        .await
        .unwrap();
    assert!(impacts.is_empty());

    let mut partial = IndexMap::new();
    partial.insert("LineNo".to_string(), Value::I64(1));
    let result = company
        .db
        .preview_primary_key_change(Permission::Read, "Sale_Line", &partial)
        .await;
    assert_err!(result, is_invalid_condition);
}

#[tokio::test]
async fn cascade_leaves_other_parents_alone() {
    let company = setup().await;

    let mut change = PrimaryKeyChange::new("Sale_Line")
        .key("LineNo", 1, 5)
        .update_references(true);
    change.from.insert("SaleID".to_string(), Value::I64(1));

    let result = company.db.run_cascade(Permission::Write, change).await.unwrap();
    assert_eq!(result.rows_affected, 1);
    assert!(result.references.is_empty());

    assert_eq!(returned_line(&company, 1), (2, 1));
    assert_eq!(returned_line(&company, 2), (1, 2));
    assert_eq!(company.scalar("SELECT COUNT(*) FROM pragma_foreign_key_check()"), 0);
}

#[tokio::test]
async fn cascade_rewrites_composite_references() {
    let company = setup().await;

    let mut change = PrimaryKeyChange::new("Sale_Line")
        .key("LineNo", 2, 7)
        .update_references(true);
    change.from.insert("SaleID".to_string(), Value::I64(1));

    let result = company.db.run_cascade(Permission::Write, change).await.unwrap();
    assert_eq!(result.rows_affected, 1);
    assert_eq!(
        result.references,
        [ReferenceImpact {
            referencing_table: "Return_Line".to_string(),
            referencing_column: "SaleID, LineNo".to_string(),
            affected_row_count: 1,
        }]
    );

    assert_eq!(returned_line(&company, 2), (1, 7));
    assert_eq!(returned_line(&company, 1), (2, 1));
    assert_eq!(company.scalar("SELECT COUNT(*) FROM pragma_foreign_key_check()"), 0);
}

#[tokio::test]
async fn delete_checks_the_whole_key() {
    let company = setup().await;

    // Nothing returns line 1 of sale 1
    let result = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "DELETE",
                "table": "Sale_Line",
                "conditions": [
                    {"field": "SaleID", "operator": "=", "value": 1},
                    {"field": "LineNo", "operator": "=", "value": 1}
                ]
            }),
        )
        .await
        .unwrap();
    assert_eq!(result.rows_affected(), Some(1));

    let err = company
        .db
        .run_query(
            Permission::Write,
            request!({
                "operation": "DELETE",
                "table": "Sale_Line",
                "conditions": [
                    {"field": "SaleID", "operator": "=", "value": 2},
                    {"field": "LineNo", "operator": "=", "value": 1}
                ]
            }),
        )
        .await
        .unwrap_err();
    assert!(err.is_referential_conflict());

    let impacts = err.reference_impacts().unwrap();
    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].referencing_column, "SaleID, LineNo");
    assert_eq!(
        company.scalar("SELECT COUNT(*) FROM Sale_Line WHERE SaleID = 2 AND LineNo = 1"),
        1
    );
}
