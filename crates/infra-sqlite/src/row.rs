// SqliteRow -> Record
//
// Columns are decoded by the storage class of the value actually stored,
// not the declared column type; SQLite lets the two disagree.
//
// BLOBs come back as an array of byte values. Records carry no column
// types, so writing that array back binds it as JSON text: a BLOB read and
// then written through a repository is stored as TEXT. Tables holding
// binary data should be written with sqlx directly.

use repokit_core::domain::Record;
use serde_json::{Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

pub(crate) fn into_record(row: &SqliteRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();

    for column in row.columns() {
        let index = column.ordinal();

        let storage = {
            let raw = row.try_get_raw(index)?;
            if raw.is_null() {
                None
            } else {
                Some(raw.type_info().name().to_string())
            }
        };

        let value = match storage.as_deref() {
            None => Value::Null,
            Some("INTEGER") | Some("BOOLEAN") => Value::from(row.try_get_unchecked::<i64, _>(index)?),
            Some("REAL") | Some("NUMERIC") => {
                let n = row.try_get_unchecked::<f64, _>(index)?;
                Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
            }
            Some("BLOB") => {
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
                Value::Array(bytes.into_iter().map(Value::from).collect())
            }
            Some(_) => Value::String(row.try_get_unchecked::<String, _>(index)?),
        };

        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}
