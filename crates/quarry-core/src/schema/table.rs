use super::ColumnInfo;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A base table with its columns, keys, and outgoing foreign keys.
///
/// Every `primary_keys` entry and every relationship `from_column` names a
/// column in `columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub name: String,

    /// Columns in declaration order
    pub columns: IndexMap<String, ColumnInfo>,

    /// Primary key columns, ordered by key position. Never empty.
    pub primary_keys: Vec<String>,

    /// Foreign keys declared on this table
    pub relationships: Vec<ForeignKeyEdge>,

    /// Distinct tables referenced by `relationships`, in first-seen order
    pub depends_on: Vec<String>,

    pub is_independent_table: bool,
}

/// A foreign key from `from_column` on the owning table to `to_column` on
/// `table`.
///
/// A composite foreign key contributes one edge per column pair, all
/// carrying the same `constraint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyEdge {
    /// The referenced table
    pub table: String,
    pub from_column: String,
    pub to_column: String,

    /// Catalog identity of the constraint the edge belongs to
    #[serde(skip)]
    pub constraint: Option<String>,
}

/// The column pairs of one foreign key constraint, in key order.
#[derive(Debug, Clone)]
pub struct ForeignKey<'a> {
    pub edges: Vec<&'a ForeignKeyEdge>,
}

impl<'a> ForeignKey<'a> {
    /// The referenced table
    pub fn table(&self) -> &'a str {
        &self.edges[0].table
    }

    pub fn from_columns(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.edges.iter().copied().map(|edge| edge.from_column.as_str())
    }

    pub fn to_columns(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.edges.iter().copied().map(|edge| edge.to_column.as_str())
    }

    /// Referencing columns joined with `, `, e.g. `SaleID, LineNo`.
    pub fn label(&self) -> String {
        self.from_columns().collect::<Vec<_>>().join(", ")
    }

    pub fn is_composite(&self) -> bool {
        self.edges.len() > 1
    }
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.get(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_keys.iter().any(|pk| pk == column)
    }

    /// The auto-generated primary key column, if the table has one.
    pub fn generated_key(&self) -> Option<&ColumnInfo> {
        self.primary_keys
            .iter()
            .filter_map(|pk| self.columns.get(pk))
            .find(|column| column.is_auto_generated())
    }

    /// Relationships grouped by constraint. Edges without a constraint
    /// identity stand alone.
    pub fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        let mut foreign_keys: Vec<ForeignKey<'_>> = vec![];

        for edge in &self.relationships {
            let existing = edge.constraint.as_ref().and_then(|constraint| {
                foreign_keys.iter_mut().find(|fk| {
                    fk.edges[0].constraint.as_ref() == Some(constraint)
                        && fk.edges[0].table == edge.table
                })
            });

            match existing {
                Some(fk) => fk.edges.push(edge),
                None => foreign_keys.push(ForeignKey { edges: vec![edge] }),
            }
        }

        foreign_keys
    }

    /// The relationship between this table and `other` joining `column` on
    /// this table with `other_column` on `other`, in either direction.
    pub fn relationship_with<'a>(
        &'a self,
        column: &str,
        other: &'a TableSchema,
        other_column: &str,
    ) -> Option<&'a ForeignKeyEdge> {
        let outgoing = self.relationships.iter().find(|edge| {
            edge.table == other.name && edge.from_column == column && edge.to_column == other_column
        });

        outgoing.or_else(|| {
            other.relationships.iter().find(|edge| {
                edge.table == self.name
                    && edge.from_column == other_column
                    && edge.to_column == column
            })
        })
    }
}
