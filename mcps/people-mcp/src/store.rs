//! SQLite-backed people store
//!
//! Every operation opens its own connection, bootstraps the schema, runs a
//! single statement and closes the connection again. No handle, lock or cache
//! outlives a call.
//!
//! Operations come in two flavours:
//!
//! - `try_*` return a [`StoreResult`] so callers can tell "nothing matched"
//!   from "the engine failed".
//! - `add`, `read`, `update` and `delete` keep the sentinel contract: errors
//!   are logged and turned into `false` or an empty row list.

use rusqlite::{params, types::Value, Batch, Connection, ToSql};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{PeopleConfig, ReadPolicy};
use crate::error::{StoreError, StoreResult};

/// Statement `read` runs when the caller gives none
pub const DEFAULT_READ_QUERY: &str = "SELECT * FROM people";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS people (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        profession TEXT NOT NULL
    );
"#;

/// One result row, one JSON scalar per column
pub type Row = Vec<serde_json::Value>;

/// Fields `update` may change; `None` leaves the column as it is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    pub age: Option<i64>,
    pub profession: Option<String>,
}

impl PersonPatch {
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.profession.is_none()
    }

    /// Present fields as (column, value), always in the order age, profession
    fn assignments(&self) -> Vec<(&'static str, &dyn ToSql)> {
        let fields: [(&'static str, Option<&dyn ToSql>); 2] = [
            ("age", self.age.as_ref().map(|v| v as &dyn ToSql)),
            ("profession", self.profession.as_ref().map(|v| v as &dyn ToSql)),
        ];

        fields
            .into_iter()
            .filter_map(|(column, value)| value.map(|v| (column, v)))
            .collect()
    }
}

/// `UPDATE` with one numbered placeholder per column, `name` bound last
fn update_sql(columns: &[&str]) -> String {
    let set = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ?{}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");

    format!("UPDATE people SET {} WHERE name = ?{}", set, columns.len() + 1)
}

fn cell_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::json!(i),
        Value::Real(f) => serde_json::json!(f),
        Value::Text(s) => serde_json::Value::String(s),
        Value::Blob(b) => serde_json::Value::String(format!("<blob {} bytes>", b.len())),
    }
}

/// Log a failed operation and hand back the sentinel instead
fn contain<T>(operation: &str, result: StoreResult<T>, sentinel: T) -> T {
    match result {
        Ok(value) => value,
        Err(StoreError::EmptyPatch) => {
            tracing::warn!("Error {}: no fields to update", operation);
            sentinel
        }
        Err(e) => {
            tracing::error!("Error {}: {}", operation, e);
            sentinel
        }
    }
}

/// Handle on the people database
///
/// Holds settings only; cloning it is free and opens nothing.
#[derive(Debug, Clone)]
pub struct PeopleStore {
    path: PathBuf,
    busy_timeout: Duration,
    read_policy: ReadPolicy,
}

impl PeopleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_secs(5),
            read_policy: ReadPolicy::default(),
        }
    }

    pub fn from_config(config: &PeopleConfig) -> Self {
        Self::new(&config.database.path)
            .with_busy_timeout(config.database.busy_timeout())
            .with_read_policy(config.tools.read_policy)
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn with_read_policy(mut self, read_policy: ReadPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    /// Open a connection with the schema in place
    fn open(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }

    /// Create the `people` table if it is absent
    ///
    /// Safe to call any number of times; an existing table is left untouched,
    /// whatever its shape.
    pub fn bootstrap(&self) -> StoreResult<()> {
        self.open().map(drop)
    }

    // ========================================================================
    // Discriminated operations
    // ========================================================================

    /// Insert a person and return the id the store assigned
    pub fn try_add(&self, name: &str, age: i64, profession: &str) -> StoreResult<i64> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO people (name, age, profession) VALUES (?1, ?2, ?3)",
            params![name, age, profession],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Run a caller-supplied statement and collect its rows
    ///
    /// The statement runs inside a transaction that is never committed, so
    /// nothing it does persists. Text holding more than one statement is an
    /// engine error; an empty text yields no rows. Under [`ReadPolicy::ReadOnly`] write
    /// statements are refused before they run.
    pub fn try_read(&self, query: &str) -> StoreResult<Vec<Row>> {
        let mut conn = self.open()?;
        // Dropped without commit: rolls back.
        let tx = conn.transaction()?;

        let mut batch = Batch::new(&tx, query);
        let Some(mut stmt) = batch.next()? else {
            return Ok(Vec::new());
        };
        // Only one statement per call; trailing whitespace and comments are fine.
        if batch.next()?.is_some() {
            return Err(StoreError::Sqlite(rusqlite::Error::MultipleStatement));
        }

        if self.read_policy == ReadPolicy::ReadOnly && !stmt.readonly() {
            return Err(StoreError::WriteRejected);
        }

        let columns = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..columns)
                    .map(|i| row.get::<_, Value>(i).map(cell_to_json))
                    .collect::<rusqlite::Result<Row>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Set the patch's fields on every row named `name`; returns rows changed
    pub fn try_update(&self, name: &str, patch: &PersonPatch) -> StoreResult<usize> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return Err(StoreError::EmptyPatch);
        }

        let (columns, mut values): (Vec<&str>, Vec<&dyn ToSql>) = assignments.into_iter().unzip();
        values.push(&name);
        let sql = update_sql(&columns);

        let conn = self.open()?;
        let changed = conn.execute(&sql, values.as_slice())?;
        Ok(changed)
    }

    /// Remove every row named `name`; returns rows removed
    pub fn try_delete(&self, name: &str) -> StoreResult<usize> {
        let conn = self.open()?;
        let removed = conn.execute("DELETE FROM people WHERE name = ?1", params![name])?;
        Ok(removed)
    }

    // ========================================================================
    // Sentinel operations
    // ========================================================================

    /// `true` once the row is stored, `false` on any error
    pub fn add(&self, name: &str, age: i64, profession: &str) -> bool {
        let result = self.try_add(name, age, profession).map(|id| {
            tracing::debug!(id, name, "Added person");
            true
        });
        contain("adding data", result, false)
    }

    /// Rows for `query` (default [`DEFAULT_READ_QUERY`]), empty on any error
    pub fn read(&self, query: Option<&str>) -> Vec<Row> {
        let query = query.unwrap_or(DEFAULT_READ_QUERY);
        contain("reading data", self.try_read(query), Vec::new())
    }

    /// `true` iff at least one row changed
    pub fn update(&self, name: &str, patch: &PersonPatch) -> bool {
        let result = self.try_update(name, patch).map(|changed| changed > 0);
        contain("updating data", result, false)
    }

    /// `true` iff at least one row was removed
    pub fn delete(&self, name: &str) -> bool {
        let result = self.try_delete(name).map(|removed| removed > 0);
        contain("deleting data", result, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, PeopleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PeopleStore::new(dir.path().join("people.db"));
        (dir, store)
    }

    fn patch(age: Option<i64>, profession: Option<&str>) -> PersonPatch {
        PersonPatch {
            age,
            profession: profession.map(str::to_string),
        }
    }

    #[test]
    fn test_update_sql_field_order() {
        assert_eq!(
            update_sql(&["age", "profession"]),
            "UPDATE people SET age = ?1, profession = ?2 WHERE name = ?3"
        );
        assert_eq!(
            update_sql(&["profession"]),
            "UPDATE people SET profession = ?1 WHERE name = ?2"
        );
    }

    #[test]
    fn test_patch_assignments() {
        let columns = |p: &PersonPatch| {
            p.assignments()
                .into_iter()
                .map(|(c, _)| c)
                .collect::<Vec<_>>()
        };

        assert_eq!(columns(&patch(Some(1), Some("Pilot"))), vec!["age", "profession"]);
        assert_eq!(columns(&patch(None, Some("Pilot"))), vec!["profession"]);
        assert_eq!(columns(&patch(Some(1), None)), vec!["age"]);
        assert!(columns(&patch(None, None)).is_empty());
        assert!(patch(None, None).is_empty());
    }

    #[test]
    fn test_bootstrap_idempotent() {
        let (_dir, store) = create_test_store();

        store.bootstrap().unwrap();
        assert!(store.add("Ada", 30, "Engineer"));
        store.bootstrap().unwrap();
        store.bootstrap().unwrap();

        let tables = store
            .try_read("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'people'")
            .unwrap();
        assert_eq!(tables.len(), 1);

        let columns = store
            .try_read("SELECT name FROM pragma_table_info('people')")
            .unwrap();
        assert_eq!(
            columns,
            vec![
                vec![json!("id")],
                vec![json!("name")],
                vec![json!("age")],
                vec![json!("profession")],
            ]
        );

        assert_eq!(store.read(None).len(), 1);
    }

    #[test]
    fn test_insert_then_read() {
        let (_dir, store) = create_test_store();

        assert!(store.add("Ada", 30, "Engineer"));

        let rows = store.read(Some("SELECT * FROM people WHERE name = 'Ada'"));
        assert_eq!(rows.len(), 1);
        assert!(rows[0][0].is_i64());
        assert_eq!(rows[0][1..], [json!("Ada"), json!(30), json!("Engineer")]);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let (_dir, store) = create_test_store();

        let first = store.try_add("Ada", 30, "Engineer").unwrap();
        assert!(store.delete("Ada"));
        let second = store.try_add("Ada", 30, "Engineer").unwrap();

        assert!(second > first);
    }

    #[test]
    fn test_update_partial_fields() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Grace", 40, "Admiral"));

        assert!(store.update("Grace", &patch(Some(41), None)));

        let rows = store.read(Some("SELECT age, profession FROM people WHERE name = 'Grace'"));
        assert_eq!(rows, vec![vec![json!(41), json!("Admiral")]]);

        assert!(store.update("Grace", &patch(None, Some("Rear Admiral"))));
        assert!(store.update("Grace", &patch(Some(42), Some("Professor"))));

        let rows = store.read(Some("SELECT age, profession FROM people WHERE name = 'Grace'"));
        assert_eq!(rows, vec![vec![json!(42), json!("Professor")]]);
    }

    #[test]
    fn test_update_without_fields() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Grace", 40, "Admiral"));

        assert!(!store.update("Grace", &PersonPatch::default()));
        assert!(matches!(
            store.try_update("Grace", &PersonPatch::default()),
            Err(StoreError::EmptyPatch)
        ));

        let rows = store.read(Some("SELECT age, profession FROM people"));
        assert_eq!(rows, vec![vec![json!(40), json!("Admiral")]]);
    }

    #[test]
    fn test_update_without_fields_does_not_open_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("untouched.db");
        let store = PeopleStore::new(&path);

        assert!(!store.update("Grace", &PersonPatch::default()));
        assert!(!path.exists());
    }

    #[test]
    fn test_update_no_match() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Grace", 40, "Admiral"));

        assert!(!store.update("Nobody", &patch(Some(1), None)));
        assert_eq!(store.try_update("Nobody", &patch(Some(1), None)).unwrap(), 0);

        let rows = store.read(Some("SELECT name, age FROM people"));
        assert_eq!(rows, vec![vec![json!("Grace"), json!(40)]]);
    }

    #[test]
    fn test_update_all_rows_with_name() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Sam", 20, "Baker"));
        assert!(store.add("Sam", 50, "Pilot"));
        assert!(store.add("Alex", 33, "Chef"));

        assert_eq!(store.try_update("Sam", &patch(None, Some("Clerk"))).unwrap(), 2);

        let rows = store.read(Some("SELECT profession FROM people ORDER BY id"));
        assert_eq!(rows, vec![vec![json!("Clerk")], vec![json!("Clerk")], vec![json!("Chef")]]);
    }

    #[test]
    fn test_name_is_bound_not_spliced() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Ada", 30, "Engineer"));

        assert!(!store.update("x' OR '1'='1", &patch(Some(99), None)));
        assert!(!store.delete("x' OR '1'='1"));
        assert_eq!(store.read(None).len(), 1);
    }

    #[test]
    fn test_delete_removes_matching_rows() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Sam", 20, "Baker"));
        assert!(store.add("Sam", 50, "Pilot"));
        assert!(store.add("Alex", 33, "Chef"));

        assert!(store.delete("Sam"));
        assert!(!store.delete("Sam"));

        let rows = store.read(Some("SELECT name FROM people"));
        assert_eq!(rows, vec![vec![json!("Alex")]]);
    }

    #[test]
    fn test_read_default_query() {
        let (_dir, store) = create_test_store();
        assert!(store.read(None).is_empty());

        assert!(store.add("Ada", 30, "Engineer"));
        assert!(store.add("Grace", 40, "Admiral"));

        let rows = store.read(None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], json!("Ada"));
        assert_eq!(rows[1][1], json!("Grace"));
    }

    #[test]
    fn test_read_invalid_statement() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Ada", 30, "Engineer"));

        assert!(store.read(Some("SELEKT * FROM people")).is_empty());
        assert!(matches!(
            store.try_read("SELEKT * FROM people"),
            Err(StoreError::Sqlite(_))
        ));
        assert!(store.read(Some("SELECT * FROM missing_table")).is_empty());
    }

    #[test]
    fn test_read_rejects_multiple_statements() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Ada", 30, "Engineer"));

        assert!(matches!(
            store.try_read("SELECT * FROM people; DELETE FROM people"),
            Err(StoreError::Sqlite(rusqlite::Error::MultipleStatement))
        ));
        assert!(store
            .read(Some("SELECT name FROM people; DELETE FROM people"))
            .is_empty());
        assert_eq!(store.read(None).len(), 1);

        let rows = store
            .try_read("SELECT name FROM people; -- trailing comment\n  ")
            .unwrap();
        assert_eq!(rows, vec![vec![json!("Ada")]]);
    }

    #[test]
    fn test_read_only_policy_checks_whole_text() {
        let (_dir, store) = create_test_store();
        let store = store.with_read_policy(ReadPolicy::ReadOnly);
        assert!(store.add("Ada", 30, "Engineer"));

        assert!(store
            .try_read("SELECT name FROM people; DROP TABLE people")
            .is_err());
        assert_eq!(store.read(None).len(), 1);
    }

    #[test]
    fn test_read_empty_text() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Ada", 30, "Engineer"));

        assert!(store.try_read("  ").unwrap().is_empty());
    }

    #[test]
    fn test_read_never_mutates() {
        let (_dir, store) = create_test_store();
        assert!(store.add("Ada", 30, "Engineer"));

        assert!(store.read(Some("DELETE FROM people")).is_empty());
        assert!(store
            .try_read("INSERT INTO people (name, age, profession) VALUES ('Eve', 1, 'Spy')")
            .unwrap()
            .is_empty());

        let rows = store.read(Some("SELECT name FROM people"));
        assert_eq!(rows, vec![vec![json!("Ada")]]);
    }

    #[test]
    fn test_read_only_policy() {
        let (_dir, store) = create_test_store();
        let store = store.with_read_policy(ReadPolicy::ReadOnly);
        assert!(store.add("Ada", 30, "Engineer"));

        assert!(matches!(
            store.try_read("DELETE FROM people"),
            Err(StoreError::WriteRejected)
        ));
        assert!(store.read(Some("DELETE FROM people")).is_empty());
        assert_eq!(store.read(None).len(), 1);
    }

    #[test]
    fn test_read_value_types() {
        let (_dir, store) = create_test_store();

        let rows = store
            .try_read("SELECT 1, 2.5, 'text', NULL, x'0102'")
            .unwrap();
        assert_eq!(
            rows,
            vec![vec![
                json!(1),
                json!(2.5),
                json!("text"),
                serde_json::Value::Null,
                json!("<blob 2 bytes>"),
            ]]
        );
    }

    #[test]
    fn test_add_unopenable_database() {
        let dir = tempfile::tempdir().unwrap();
        let store = PeopleStore::new(dir.path().join("missing").join("people.db"));

        assert!(!store.add("Ada", 30, "Engineer"));
        assert!(matches!(
            store.try_add("Ada", 30, "Engineer"),
            Err(StoreError::Sqlite(_))
        ));
        assert!(store.read(None).is_empty());
        assert!(!store.delete("Ada"));
    }

    #[test]
    fn test_add_into_incompatible_table() {
        let (_dir, store) = create_test_store();
        {
            let conn = Connection::open(store.path()).unwrap();
            conn.execute_batch("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)")
                .unwrap();
        }

        assert!(!store.add("Ada", 30, "Engineer"));

        let columns = store
            .try_read("SELECT name FROM pragma_table_info('people')")
            .unwrap();
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_locked_database_fails_instead_of_hanging() {
        let (_dir, store) = create_test_store();
        store.bootstrap().unwrap();
        let store = store.with_busy_timeout(Duration::from_millis(50));

        let locker = Connection::open(store.path()).unwrap();
        locker.execute_batch("BEGIN EXCLUSIVE").unwrap();

        assert!(!store.add("Ada", 30, "Engineer"));
        assert!(store.read(None).is_empty());

        locker.execute_batch("COMMIT").unwrap();
        assert!(store.add("Ada", 30, "Engineer"));
    }
}
