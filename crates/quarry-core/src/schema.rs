mod builder;
pub use builder::{Builder, CatalogColumn, CatalogForeignKey};

mod column;
pub use column::{ColumnFlag, ColumnInfo};

mod column_type;
pub use column_type::{ColumnType, DeclaredType};

mod reference_impact;
pub use reference_impact::ReferenceImpact;

mod table;
pub use table::{ForeignKey, ForeignKeyEdge, TableSchema};

use serde::{Deserialize, Serialize};

/// Live description of every base table in the connected database.
///
/// A schema is derived from the catalog on each request and never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub tables: Vec<TableSchema>,
}

impl Schema {
    pub fn new(tables: Vec<TableSchema>) -> Schema {
        Schema { tables }
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Look up a table by name, failing with `UnknownTableError`.
    pub fn expect_table(&self, name: &str) -> crate::Result<&TableSchema> {
        self.table(name)
            .ok_or_else(|| crate::Error::unknown_table(name))
    }

    /// Every foreign key pointing at `target`, paired with the table that
    /// owns it. Self-references are included.
    pub fn incoming_foreign_keys<'a>(
        &'a self,
        target: &'a str,
    ) -> impl Iterator<Item = (&'a TableSchema, ForeignKey<'a>)> + 'a {
        self.tables.iter().flat_map(move |table| {
            table
                .foreign_keys()
                .into_iter()
                .filter(move |fk| fk.table() == target)
                .map(move |fk| (table, fk))
        })
    }

    /// Tables ordered so that every table comes after the tables it depends
    /// on. Self-references are ignored and cycles are broken in declaration
    /// order.
    pub fn dependency_order(&self) -> Vec<&TableSchema> {
        let mut ordered: Vec<&TableSchema> = Vec::with_capacity(self.tables.len());
        let mut remaining: Vec<&TableSchema> = self.tables.iter().collect();

        while !remaining.is_empty() {
            let ready = remaining.iter().position(|table| {
                table.depends_on.iter().all(|dep| {
                    *dep == table.name
                        || ordered.iter().any(|done| done.name == *dep)
                        || !remaining.iter().any(|t| t.name == *dep)
                })
            });

            // A cycle: take the first remaining table.
            let index = ready.unwrap_or(0);
            ordered.push(remaining.remove(index));
        }

        ordered
    }
}
