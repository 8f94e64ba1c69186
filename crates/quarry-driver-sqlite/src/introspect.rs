use quarry_core::{
    schema::{Builder, CatalogColumn, CatalogForeignKey, Schema},
    Error, Result,
};
use rusqlite::Connection;

const TABLES: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
     ORDER BY rowid";

const COLUMNS: &str = "SELECT name, type, \"notnull\", dflt_value, pk \
     FROM pragma_table_info(?1) ORDER BY cid";

const FOREIGN_KEYS: &str = "SELECT id, \"from\", \"table\", \"to\" \
     FROM pragma_foreign_key_list(?1) ORDER BY id, seq";

/// Reads `sqlite_master` and the table pragmas into a [`Schema`].
pub(crate) fn describe(connection: &Connection) -> Result<Schema> {
    read(connection, Builder::new().rowid_alias()).map_err(|err| {
        if err.is_schema_introspection() {
            err
        } else {
            err.context(Error::schema_introspection("failed to read SQLite catalog"))
        }
    })?
    .build()
}

fn read(connection: &Connection, mut builder: Builder) -> Result<Builder> {
    let mut stmt = connection.prepare(TABLES).map_err(Error::storage)?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
        .map_err(Error::storage)?;

    for table in &tables {
        builder.table(table);

        let mut stmt = connection.prepare(COLUMNS).map_err(Error::storage)?;
        let columns = stmt
            .query_map([table], |row| {
                let not_null: bool = row.get(2)?;
                let pk: u32 = row.get(4)?;

                let mut column = CatalogColumn::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)
                    .nullable(!not_null)
                    .default_value(row.get(3)?);

                if pk > 0 {
                    column = column.primary_key(pk);
                }

                Ok(column)
            })
            .map_err(Error::storage)?;

        for column in columns {
            builder.column(table, column.map_err(Error::storage)?);
        }

        let mut stmt = connection.prepare(FOREIGN_KEYS).map_err(Error::storage)?;
        let foreign_keys = stmt
            .query_map([table], |row| {
                let id: i64 = row.get(0)?;
                let fk = CatalogForeignKey::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?)
                    .constraint(id.to_string());
                Ok(match row.get::<_, Option<String>>(3)? {
                    Some(to) => fk.to_column(to),
                    None => fk,
                })
            })
            .map_err(Error::storage)?;

        for fk in foreign_keys {
            builder.foreign_key(table, fk.map_err(Error::storage)?);
        }
    }

    Ok(builder)
}
