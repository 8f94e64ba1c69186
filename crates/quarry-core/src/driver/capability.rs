#[derive(Debug)]
pub struct Capability {
    /// SQL: supports `RIGHT JOIN`.
    pub right_join: bool,

    /// SQL: supports `FULL OUTER JOIN`.
    pub full_outer_join: bool,

    /// Foreign key checks can be deferred to the end of the transaction
    /// rather than only switched off for the session.
    pub deferred_foreign_keys: bool,
}

impl Capability {
    /// SQLite capabilities. Outer joins other than LEFT require SQLite
    /// 3.39, which the bundled library satisfies.
    pub const SQLITE: Self = Self {
        right_join: true,
        full_outer_join: true,
        deferred_foreign_keys: true,
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        full_outer_join: false,
        deferred_foreign_keys: false,
        ..Self::SQLITE
    };
}
