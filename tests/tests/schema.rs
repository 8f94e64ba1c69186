use pretty_assertions::assert_eq;
use quarry::schema::{ColumnFlag, ColumnType};
use serde_json::json;
use tests::*;

#[tokio::test]
async fn describes_every_base_table() {
    let company = Company::setup().await;
    let schema = company.db.describe_schema(Permission::Read).await.unwrap();

    let names: Vec<_> = schema.tables.iter().map(|table| table.name.as_str()).collect();

    // The `Supervisor` view is not a base table
    assert_eq!(
        names,
        ["Person", "Department", "Job_Position", "Employee", "Customer", "Sale", "Sale_Line"]
    );

    for table in &schema.tables {
        assert!(!table.primary_keys.is_empty(), "{} has no key", table.name);

        for pk in &table.primary_keys {
            assert!(table.columns.contains_key(pk));
        }

        for edge in &table.relationships {
            assert!(table.columns.contains_key(&edge.from_column));
        }
    }
}

#[tokio::test]
async fn keys_and_generated_columns() {
    let company = Company::setup().await;
    let schema = company.db.describe_schema(Permission::Read).await.unwrap();

    let sale_line = schema.table("Sale_Line").unwrap();
    assert_eq!(sale_line.primary_keys, ["SaleID", "LineNo"]);
    assert!(!sale_line.columns["SaleID"].is_auto_generated());

    let department = schema.table("Department").unwrap();
    assert!(department.columns["DeptID"].extra.contains(&ColumnFlag::AutoGenerated));

    // `INT PRIMARY KEY` is not a rowid alias
    let employee = schema.table("Employee").unwrap();
    assert!(!employee.columns["EmpID"].is_auto_generated());
}

#[tokio::test]
async fn relationships_including_self_references() {
    let company = Company::setup().await;
    let schema = company.db.describe_schema(Permission::Read).await.unwrap();

    let employee = schema.table("Employee").unwrap();

    let edges: Vec<_> = employee
        .relationships
        .iter()
        .map(|edge| (edge.from_column.as_str(), edge.table.as_str(), edge.to_column.as_str()))
        .collect();
    assert!(edges.contains(&("SupervisorID", "Employee", "EmpID")));
    assert!(edges.contains(&("EmpID", "Person", "PersonID")));

    assert_eq!(employee.depends_on.len(), 2);
    assert!(!employee.is_independent_table);

    let person = schema.table("Person").unwrap();
    assert!(person.relationships.is_empty());
    assert!(person.is_independent_table);

    // Each table keeps only its own edges
    let sale = schema.table("Sale").unwrap();
    assert_eq!(sale.relationships.len(), 2);
    assert!(sale.relationships.iter().all(|edge| edge.from_column != "SupervisorID"));
}

#[tokio::test]
async fn column_types() {
    let company = Company::setup().await;
    let schema = company.db.describe_schema(Permission::Read).await.unwrap();

    let person = schema.table("Person").unwrap();
    let lname = &person.columns["LName"];
    assert_eq!(lname.ty, ColumnType::Text);
    assert_eq!(lname.length, Some(50));
    assert!(!lname.nullable);
    assert_eq!(person.columns["Age"].ty, ColumnType::Integer);

    let price = &schema.table("Sale_Line").unwrap().columns["Price"];
    assert_eq!(price.ty, ColumnType::Decimal);
    assert_eq!(price.length, Some(10));
    assert!(price.nullable);

    assert_eq!(schema.table("Sale").unwrap().columns["SaleDate"].ty, ColumnType::Date);
}

#[tokio::test]
async fn schema_json_contract() {
    let company = Company::setup().await;
    let schema = company.db.describe_schema(Permission::Read).await.unwrap();

    let department = serde_json::to_value(schema.table("Department").unwrap()).unwrap();

    assert_eq!(department["name"], json!("Department"));
    assert_eq!(department["primaryKeys"], json!(["DeptID"]));
    assert_eq!(department["relationships"], json!([]));
    assert_eq!(department["dependsOn"], json!([]));
    assert_eq!(department["isIndependentTable"], json!(true));
    assert_eq!(department["columns"]["DeptID"]["extra"], json!(["auto_generated"]));
    assert_eq!(department["columns"]["DeptName"]["type"], json!("text"));
    assert_eq!(department["columns"]["DeptName"]["dataType"], json!("VARCHAR(50)"));

    let job = serde_json::to_value(schema.table("Job_Position").unwrap()).unwrap();
    assert_eq!(
        job["relationships"],
        json!([{"table": "Department", "fromColumn": "DeptID", "toColumn": "DeptID"}])
    );
}
