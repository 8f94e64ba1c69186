use mysql_async::{prelude::Queryable, Conn};
use quarry_core::{
    schema::{Builder, CatalogColumn, CatalogForeignKey, ColumnFlag, Schema},
    Error, Result,
};
use std::collections::{HashMap, HashSet};

const TABLES: &str = "SELECT CONVERT(TABLE_NAME USING utf8) \
     FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
     ORDER BY TABLE_NAME";

const PRIMARY_KEYS: &str = "SELECT CONVERT(TABLE_NAME USING utf8), \
     CONVERT(COLUMN_NAME USING utf8), ORDINAL_POSITION \
     FROM information_schema.KEY_COLUMN_USAGE \
     WHERE TABLE_SCHEMA = DATABASE() AND CONSTRAINT_NAME = 'PRIMARY'";

const COLUMNS: &str = "SELECT CONVERT(TABLE_NAME USING utf8), \
     CONVERT(COLUMN_NAME USING utf8), CONVERT(COLUMN_TYPE USING utf8), \
     IS_NULLABLE, CONVERT(COLUMN_DEFAULT USING utf8), CONVERT(EXTRA USING utf8) \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() \
     ORDER BY TABLE_NAME, ORDINAL_POSITION";

const FOREIGN_KEYS: &str = "SELECT CONVERT(TABLE_NAME USING utf8), \
     CONVERT(CONSTRAINT_NAME USING utf8), \
     CONVERT(COLUMN_NAME USING utf8), CONVERT(REFERENCED_TABLE_NAME USING utf8), \
     CONVERT(REFERENCED_COLUMN_NAME USING utf8) \
     FROM information_schema.KEY_COLUMN_USAGE \
     WHERE TABLE_SCHEMA = DATABASE() AND REFERENCED_TABLE_NAME IS NOT NULL \
     ORDER BY TABLE_NAME, CONSTRAINT_NAME, ORDINAL_POSITION";

/// Reads `information_schema` for the current database into a [`Schema`].
pub(crate) async fn describe(conn: &mut Conn) -> Result<Schema> {
    read(conn)
        .await
        .map_err(|err| err.context(Error::schema_introspection("failed to read MySQL catalog")))?
        .build()
}

async fn read(conn: &mut Conn) -> Result<Builder> {
    let mut builder = Builder::new();

    let tables: Vec<String> = conn.query(TABLES).await.map_err(Error::storage)?;
    for table in &tables {
        builder.table(table);
    }
    let tables: HashSet<String> = tables.into_iter().collect();

    let primary_keys: Vec<(String, String, u32)> =
        conn.query(PRIMARY_KEYS).await.map_err(Error::storage)?;
    let primary_keys: HashMap<(String, String), u32> = primary_keys
        .into_iter()
        .map(|(table, column, position)| ((table, column), position))
        .collect();

    type ColumnRow = (String, String, String, String, Option<String>, String);
    let columns: Vec<ColumnRow> = conn.query(COLUMNS).await.map_err(Error::storage)?;

    for (table, name, column_type, is_nullable, default_value, extra) in columns {
        // Views report their columns too
        if !tables.contains(&table) {
            continue;
        }

        let mut column = CatalogColumn::new(name.clone(), column_type)
            .nullable(is_nullable == "YES")
            .default_value(default_value)
            .flags(ColumnFlag::parse_mysql_extra(&extra));

        if let Some(position) = primary_keys.get(&(table.clone(), name)) {
            column = column.primary_key(*position);
        }

        builder.column(table, column);
    }

    type ForeignKeyRow = (String, String, String, String, String);
    let foreign_keys: Vec<ForeignKeyRow> =
        conn.query(FOREIGN_KEYS).await.map_err(Error::storage)?;

    for (table, constraint, from_column, referenced_table, to_column) in foreign_keys {
        if tables.contains(&table) {
            builder.foreign_key(
                table,
                CatalogForeignKey::new(from_column, referenced_table)
                    .to_column(to_column)
                    .constraint(constraint),
            );
        }
    }

    Ok(builder)
}
