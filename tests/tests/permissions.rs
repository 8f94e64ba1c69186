use tests::*;

#[tokio::test]
async fn read_cannot_write() {
    let company = Company::setup().await;

    let result = company
        .db
        .run_query(
            Permission::Read,
            request!({
                "operation": "DELETE",
                "table": "Department",
                "conditions": [{"field": "DeptID", "operator": "=", "value": 4}]
            }),
        )
        .await;

    assert_err!(result, is_permission_denied);
    assert_eq!(company.scalar("SELECT COUNT(*) FROM Department"), 4);

    let change = PrimaryKeyChange::new("Employee")
        .key("EmpID", 7, 70)
        .update_references(true);
    assert_err!(
        company.db.run_cascade(Permission::Read, change).await,
        is_permission_denied
    );
}

#[tokio::test]
async fn snapshots_need_admin() {
    let company = Company::setup().await;

    assert_err!(
        company.db.snapshot(Permission::Write, None).await,
        is_permission_denied
    );

    let snapshot = company.db.snapshot(Permission::Admin, None).await.unwrap();
    assert_err!(
        company.db.restore(Permission::Write, snapshot).await,
        is_permission_denied
    );
}

#[tokio::test]
async fn higher_tiers_include_lower_ones() {
    let company = Company::setup().await;

    assert!(company.db.describe_schema(Permission::Admin).await.is_ok());
    assert!(company
        .db
        .count_matching(Permission::Write, "Sale", &[ConditionSpec::eq("SaleID", 1)])
        .await
        .is_ok());
}

#[tokio::test]
async fn custom_authorizer() {
    struct Session {
        roles: Vec<Permission>,
    }

    impl quarry::Authorize for Session {
        fn holds(&self, permission: Permission) -> bool {
            self.roles.contains(&permission)
        }
    }

    let company = Company::setup().await;
    let session = Session {
        roles: vec![Permission::Admin],
    };

    // Holding admin alone does not grant read in this authorizer
    assert_err!(company.db.describe_schema(&session).await, is_permission_denied);

    let session = Session {
        roles: vec![Permission::Read],
    };
    assert!(company.db.describe_schema(&session).await.is_ok());
}

#[tokio::test]
async fn denied_payload() {
    let company = Company::setup().await;

    let err = company
        .db
        .snapshot(Permission::Read, None)
        .await
        .unwrap_err();

    let response = ErrorResponse::from(&err);
    assert_eq!(response.status, 403);
    assert_eq!(response.kind, "PermissionDenied");
}
