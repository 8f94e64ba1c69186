use pretty_assertions::assert_eq;
use tests::*;

#[tokio::test]
async fn count_matching_rows() {
    let company = Company::setup().await;

    let result = company
        .db
        .count_matching(Permission::Read, "Sale_Line", &[ConditionSpec::eq("SaleID", 1)])
        .await
        .unwrap();

    assert_eq!(result.count, 2);
    assert_eq!(serde_json::to_value(result).unwrap(), serde_json::json!({"count": 2}));
}

#[tokio::test]
async fn count_without_conditions_is_rejected() {
    let company = Company::setup().await;

    let result = company.db.count_matching(Permission::Read, "Sale_Line", &[]).await;
    assert_err!(result, is_missing_conditions);
}

#[tokio::test]
async fn count_with_like_and_unknown_table() {
    let company = Company::setup().await;

    let result = company
        .db
        .count_matching(Permission::Read, "Person", &[ConditionSpec::like("LName", "ol")])
        .await
        .unwrap();
    assert_eq!(result.count, 8);

    let result = company
        .db
        .count_matching(Permission::Read, "Payroll", &[ConditionSpec::eq("ID", 1)])
        .await;
    assert_err!(result, is_unknown_table);
}
