use super::{ColumnFlag, ColumnInfo, DeclaredType, ForeignKeyEdge, Schema, TableSchema};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Assembles a [`Schema`] from flat catalog rows.
///
/// Drivers feed columns and foreign keys in whatever order the catalog
/// returns them; the builder groups them by owning table and checks the
/// table invariants.
#[derive(Debug, Default)]
pub struct Builder {
    tables: IndexMap<String, TableDraft>,

    /// Treat a sole `INTEGER` primary key as an alias of the SQLite rowid.
    rowid_alias: bool,
}

#[derive(Debug, Default)]
struct TableDraft {
    columns: Vec<CatalogColumn>,
    foreign_keys: Vec<CatalogForeignKey>,
}

/// A column row read from the catalog.
#[derive(Debug, Clone)]
pub struct CatalogColumn {
    name: String,
    declared_type: String,
    nullable: bool,
    default_value: Option<String>,
    primary_key: Option<u32>,
    flags: BTreeSet<ColumnFlag>,
}

/// A foreign key row read from the catalog.
#[derive(Debug, Clone)]
pub struct CatalogForeignKey {
    from_column: String,
    table: String,
    /// `None` when the catalog leaves the target implicit, meaning the
    /// referenced table's primary key.
    to_column: Option<String>,
    /// Rows sharing a constraint form one (possibly composite) foreign key
    constraint: Option<String>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    pub fn rowid_alias(mut self) -> Builder {
        self.rowid_alias = true;
        self
    }

    /// Registers a table. Tables are reported in registration order.
    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.tables.entry(table.into()).or_default();
        self
    }

    pub fn column(&mut self, table: impl Into<String>, column: CatalogColumn) -> &mut Self {
        self.tables
            .entry(table.into())
            .or_default()
            .columns
            .push(column);
        self
    }

    pub fn foreign_key(
        &mut self,
        table: impl Into<String>,
        foreign_key: CatalogForeignKey,
    ) -> &mut Self {
        self.tables
            .entry(table.into())
            .or_default()
            .foreign_keys
            .push(foreign_key);
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut primary_keys = IndexMap::new();

        for (name, draft) in &self.tables {
            let mut keyed: Vec<_> = draft
                .columns
                .iter()
                .filter_map(|column| column.primary_key.map(|pos| (pos, column.name.clone())))
                .collect();
            keyed.sort_by_key(|(pos, _)| *pos);

            if keyed.is_empty() {
                return Err(Error::schema_introspection(format!(
                    "table `{name}` has no primary key"
                )));
            }

            primary_keys.insert(name.clone(), keyed.into_iter().map(|(_, c)| c).collect());
        }

        let mut tables = Vec::with_capacity(self.tables.len());

        for (name, draft) in &self.tables {
            let pks: &Vec<String> = &primary_keys[name];
            let rowid = self.rowid_alias
                && pks.len() == 1
                && draft
                    .columns
                    .iter()
                    .any(|c| c.name == pks[0] && c.declared_type.eq_ignore_ascii_case("integer"));

            let mut columns = IndexMap::with_capacity(draft.columns.len());
            for column in &draft.columns {
                let declared = DeclaredType::parse(&column.declared_type);
                let mut extra = column.flags.clone();

                if rowid && column.name == pks[0] {
                    extra.insert(ColumnFlag::AutoGenerated);
                }

                columns.insert(
                    column.name.clone(),
                    ColumnInfo {
                        name: column.name.clone(),
                        ty: declared.ty,
                        data_type: column.declared_type.clone(),
                        length: declared.length,
                        nullable: column.nullable,
                        default_value: column.default_value.clone(),
                        enum_values: declared.enum_values,
                        extra,
                    },
                );
            }

            let mut relationships = Vec::with_capacity(draft.foreign_keys.len());
            let mut depends_on: Vec<String> = vec![];

            for (index, fk) in draft.foreign_keys.iter().enumerate() {
                if !columns.contains_key(&fk.from_column) {
                    return Err(Error::schema_introspection(format!(
                        "foreign key on `{name}` uses unknown column `{}`",
                        fk.from_column
                    )));
                }

                // An implicit target pairs the n-th column of the constraint
                // with the n-th primary key column of the referenced table.
                let position = match &fk.constraint {
                    Some(constraint) => draft.foreign_keys[..index]
                        .iter()
                        .filter(|prev| {
                            prev.constraint.as_ref() == Some(constraint) && prev.table == fk.table
                        })
                        .count(),
                    None => 0,
                };

                let to_column = match &fk.to_column {
                    Some(to_column) => to_column.clone(),
                    None => match primary_keys.get(&fk.table) {
                        Some(pks) if fk.constraint.is_some() || pks.len() == 1 => {
                            match pks.get(position) {
                                Some(pk) => pk.clone(),
                                None => {
                                    return Err(Error::schema_introspection(format!(
                                        "foreign key `{name}`.`{}` has more columns than the primary key of `{}`",
                                        fk.from_column, fk.table
                                    )))
                                }
                            }
                        }
                        _ => {
                            return Err(Error::schema_introspection(format!(
                                "cannot resolve target of foreign key `{name}`.`{}` referencing `{}`",
                                fk.from_column, fk.table
                            )))
                        }
                    },
                };

                if !depends_on.contains(&fk.table) {
                    depends_on.push(fk.table.clone());
                }

                relationships.push(ForeignKeyEdge {
                    table: fk.table.clone(),
                    from_column: fk.from_column.clone(),
                    to_column,
                    constraint: fk.constraint.clone(),
                });
            }

            tables.push(TableSchema {
                name: name.clone(),
                columns,
                primary_keys: pks.clone(),
                relationships,
                is_independent_table: depends_on.is_empty(),
                depends_on,
            });
        }

        Ok(Schema::new(tables))
    }
}

impl CatalogColumn {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> CatalogColumn {
        CatalogColumn {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable: true,
            default_value: None,
            primary_key: None,
            flags: BTreeSet::new(),
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn default_value(mut self, default_value: Option<String>) -> Self {
        self.default_value = default_value;
        self
    }

    /// Marks the column as part of the primary key at the given 1-based
    /// position.
    pub fn primary_key(mut self, position: u32) -> Self {
        self.primary_key = Some(position);
        self
    }

    pub fn flags(mut self, flags: BTreeSet<ColumnFlag>) -> Self {
        self.flags.extend(flags);
        self
    }
}

impl CatalogForeignKey {
    pub fn new(from_column: impl Into<String>, table: impl Into<String>) -> CatalogForeignKey {
        CatalogForeignKey {
            from_column: from_column.into(),
            table: table.into(),
            to_column: None,
            constraint: None,
        }
    }

    pub fn to_column(mut self, to_column: impl Into<String>) -> Self {
        self.to_column = Some(to_column.into());
        self
    }

    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}
