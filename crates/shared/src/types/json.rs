use std::ops::{Deref, DerefMut};

use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    ToSql,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Wrapper to implement ToSql and FromSql on document-shaped columns.
/// Stored as a JSON TEXT column, which keeps the nested day plans a
/// single document the way the API serves them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Json(value)
    }
}

impl<T: Serialize> ToSql for Json<T> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = serde_json::to_string(&self.0)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::Owned(text.into()))
    }
}

impl<T: DeserializeOwned> FromSql for Json<T> {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        serde_json::from_str(value.as_str()?)
            .map(Json)
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl<T: Serialize> Json<T> {
    /// Serialize for a sea-query value binding. Fallible, unlike the
    /// From<&Uuid> conversions, because arbitrary documents are involved
    pub fn to_value(&self) -> Result<sea_query::Value, serde_json::Error> {
        serde_json::to_string(&self.0).map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::Json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn survives_a_column_round_trip() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (doc TEXT NOT NULL);").unwrap();

        let doc = Json(vec![Doc { name: "warmup".into(), count: 3 }]);
        conn.execute("INSERT INTO t (doc) VALUES (?1)", [&doc]).unwrap();

        let back: Json<Vec<Doc>> =
            conn.query_row("SELECT doc FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn serde_is_transparent() {
        let doc = Json(Doc { name: "plank".into(), count: 1 });
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"name":"plank","count":1}"#);
    }
}
