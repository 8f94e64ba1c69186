use serde::{Deserialize, Serialize};

/// Semantic tag of a column's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Decimal,
    Float,
    Text,
    Date,
    Datetime,
    Time,
    Enum,
    Boolean,
    Binary,
    Other,
}

/// A declared type string broken into its semantic parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub ty: ColumnType,
    pub length: Option<u64>,
    pub enum_values: Vec<String>,
}

impl DeclaredType {
    /// Parses a catalog type string such as `varchar(50)`, `decimal(10,2)`,
    /// `int(11) unsigned` or `enum('M','F')`.
    ///
    /// Types that are not recognized by name fall back to SQLite's column
    /// affinity rules.
    pub fn parse(declared: &str) -> DeclaredType {
        let declared = declared.trim();
        let lower = declared.to_ascii_lowercase();

        let (base, args) = match lower.find('(') {
            Some(open) => {
                let close = lower.rfind(')').filter(|close| *close > open);
                let args = &declared[open + 1..close.unwrap_or(declared.len())];
                (lower[..open].trim(), Some(args))
            }
            None => (lower.as_str(), None),
        };

        // `int unsigned`, `double precision`, `character varying`
        let head = base.split_whitespace().next().unwrap_or("");
        let first_arg = args
            .and_then(|args| args.split(',').next())
            .and_then(|arg| arg.trim().parse::<u64>().ok());

        let (ty, length) = match head {
            "tinyint" if first_arg == Some(1) => (ColumnType::Boolean, None),
            "bool" | "boolean" => (ColumnType::Boolean, None),
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint" | "year" => {
                (ColumnType::Integer, None)
            }
            "decimal" | "numeric" | "dec" | "fixed" => (ColumnType::Decimal, first_arg),
            "float" | "double" | "real" => (ColumnType::Float, None),
            "char" | "varchar" | "character" | "nchar" | "nvarchar" | "text" | "tinytext"
            | "mediumtext" | "longtext" | "clob" => (ColumnType::Text, first_arg),
            "date" => (ColumnType::Date, None),
            "datetime" | "timestamp" => (ColumnType::Datetime, None),
            "time" => (ColumnType::Time, None),
            "enum" => {
                return DeclaredType {
                    ty: ColumnType::Enum,
                    length: None,
                    enum_values: args.map(parse_enum_values).unwrap_or_default(),
                }
            }
            "binary" | "varbinary" | "blob" | "tinyblob" | "mediumblob" | "longblob" | "bit" => {
                (ColumnType::Binary, first_arg)
            }
            _ => (affinity(base), None),
        };

        DeclaredType {
            ty,
            length,
            enum_values: vec![],
        }
    }
}

fn affinity(base: &str) -> ColumnType {
    if base.contains("int") {
        ColumnType::Integer
    } else if base.contains("char") || base.contains("clob") || base.contains("text") {
        ColumnType::Text
    } else if base.contains("blob") {
        ColumnType::Binary
    } else if base.contains("real") || base.contains("floa") || base.contains("doub") {
        ColumnType::Float
    } else {
        ColumnType::Other
    }
}

/// Splits `'M','F','it''s'` into its unquoted values.
fn parse_enum_values(args: &str) -> Vec<String> {
    let mut values = vec![];
    let mut chars = args.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\'' {
            continue;
        }

        let mut value = String::new();
        while let Some(c) = chars.next() {
            match c {
                '\'' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    value.push('\'');
                }
                '\'' => break,
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                }
                c => value.push(c),
            }
        }
        values.push(value);
    }

    values
}
