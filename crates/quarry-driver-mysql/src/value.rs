use mysql_async::prelude::ToValue;
use quarry_core::stmt::Value as CoreValue;

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Takes the value at `index` out of `row`.
    ///
    /// Temporal values are rendered the way MySQL prints them. Byte strings
    /// that are valid UTF-8 are read as text; decimals arrive this way too.
    pub fn from_sql(index: usize, row: &mut mysql_async::Row) -> Self {
        use mysql_async::Value as SqlValue;

        let value: SqlValue = row.take(index).unwrap_or(SqlValue::NULL);

        let core_value = match value {
            SqlValue::NULL => CoreValue::Null,
            SqlValue::Int(value) => CoreValue::I64(value),
            SqlValue::UInt(value) => CoreValue::I64(value as i64),
            SqlValue::Float(value) => CoreValue::F64(value.into()),
            SqlValue::Double(value) => CoreValue::F64(value),
            SqlValue::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(text) => CoreValue::String(text),
                Err(err) => CoreValue::Bytes(err.into_bytes()),
            },
            SqlValue::Date(year, month, day, 0, 0, 0, 0) => {
                CoreValue::String(format!("{year:04}-{month:02}-{day:02}"))
            }
            SqlValue::Date(year, month, day, hour, minute, second, _) => CoreValue::String(
                format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"),
            ),
            SqlValue::Time(negative, days, hours, minutes, seconds, _) => {
                let sign = if negative { "-" } else { "" };
                let hours = days * 24 + u32::from(hours);
                CoreValue::String(format!("{sign}{hours:02}:{minutes:02}:{seconds:02}"))
            }
        };

        Value(core_value)
    }
}

impl ToValue for Value {
    fn to_value(&self) -> mysql_async::Value {
        match &self.0 {
            CoreValue::Bool(value) => value.to_value(),
            CoreValue::I64(value) => value.to_value(),
            CoreValue::F64(value) => value.to_value(),
            CoreValue::Null => mysql_async::Value::NULL,
            CoreValue::String(value) => value.to_value(),
            CoreValue::Bytes(value) => value.to_value(),
        }
    }
}
