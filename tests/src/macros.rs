/// Asserts that `$result` failed with an error for which `$err.$is()` holds.
#[macro_export]
macro_rules! assert_err {
    ($result:expr, $is:ident) => {
        match $result {
            Ok(value) => panic!("expected an error; got {value:#?}"),
            Err(err) => assert!(err.$is(), "unexpected error: {err}"),
        }
    };
}

/// Builds a query request from JSON.
#[macro_export]
macro_rules! request {
    ($($json:tt)+) => {
        serde_json::from_value::<$crate::QueryRequest>(serde_json::json!($($json)+)).unwrap()
    };
}
