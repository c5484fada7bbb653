// Auditable repository: stamps a "last modified" column on every update

use crate::application::repository::{record_from, Repository};
use crate::case::snake_case;
use crate::domain::{Criteria, Fields, PaginationParams, Record};
use crate::error::Result;
use crate::port::{Connection, CrudRepository, SystemTimeProvider, TimeProvider};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Audit column used when none is configured
pub const DEFAULT_AUDIT_COLUMN: &str = "updatedAt";

/// UTC text format of audit stamps; sorts alongside SQLite's
/// `CURRENT_TIMESTAMP` (`YYYY-MM-DD HH:MM:SS`)
pub const AUDIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Writes the current time into a change set
#[derive(Clone)]
pub struct AuditPolicy {
    column: String,
    clock: Arc<dyn TimeProvider>,
}

impl AuditPolicy {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            clock: Arc::new(SystemTimeProvider),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Set the audit column to "now". Any caller key naming the same column,
    /// in either casing, is dropped so the stamp always wins.
    pub fn stamp(&self, mut changes: Record) -> Record {
        let target = snake_case(&self.column);
        changes.retain(|key, _| snake_case(key) != target);

        let now = self.clock.now().format(AUDIT_TIMESTAMP_FORMAT).to_string();
        changes.insert(self.column.clone(), Value::String(now));
        changes
    }
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_COLUMN)
    }
}

/// A [`Repository`] whose `update` and `update_all` stamp the audit column.
/// Everything else is delegated untouched.
pub struct AuditableRepository<T = Record> {
    inner: Repository<T>,
    policy: AuditPolicy,
}

impl<T> Clone for AuditableRepository<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<T> AuditableRepository<T> {
    /// Audit `updatedAt`
    pub fn new(connection: Arc<dyn Connection>, table: impl Into<String>) -> Self {
        Self::from_parts(Repository::new(connection, table), AuditPolicy::default())
    }

    /// Audit a custom column, e.g. `modifiedAt`
    pub fn with_column(
        connection: Arc<dyn Connection>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self::from_parts(Repository::new(connection, table), AuditPolicy::new(column))
    }

    pub fn from_parts(inner: Repository<T>, policy: AuditPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.policy = self.policy.with_clock(clock);
        self
    }

    pub fn inner(&self) -> &Repository<T> {
        &self.inner
    }

    pub fn policy(&self) -> &AuditPolicy {
        &self.policy
    }

    fn stamped(&self, data: Value) -> Result<Value> {
        Ok(Value::Object(self.policy.stamp(record_from(data)?)))
    }
}

#[async_trait]
impl<T> CrudRepository<T> for AuditableRepository<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn create_all(&self, data: Value, fields: Fields) -> Result<Vec<T>> {
        self.inner.create_all(data, fields).await
    }

    async fn create(&self, data: Value, fields: Fields) -> Result<T> {
        self.inner.create(data, fields).await
    }

    async fn find_by(&self, criteria: Criteria, fields: Fields) -> Result<Option<T>> {
        self.inner.find_by(criteria, fields).await
    }

    async fn exists(&self, criteria: Criteria) -> Result<bool> {
        self.inner.exists(criteria).await
    }

    async fn list(&self, params: PaginationParams) -> Result<Vec<T>> {
        self.inner.list(params).await
    }

    async fn update(&self, criteria: Criteria, data: Value) -> Result<bool> {
        let data = self.stamped(data)?;
        self.inner.update(criteria, data).await
    }

    async fn update_all(&self, criteria: Criteria, data: Value) -> Result<u64> {
        let data = self.stamped(data)?;
        self.inner.update_all(criteria, data).await
    }

    async fn destroy(&self, criteria: Criteria) -> Result<bool> {
        self.inner.destroy(criteria).await
    }

    async fn destroy_all(&self, criteria: Criteria) -> Result<u64> {
        self.inner.destroy_all(criteria).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UpdateQuery;
    use crate::port::{Dialect, MockConnection};
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    struct FixedClock(DateTime<Utc>);

    impl TimeProvider for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn clock() -> Arc<dyn TimeProvider> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap(),
        ))
    }

    fn mock() -> MockConnection {
        let mut mock = MockConnection::new();
        mock.expect_dialect()
            .return_const(Dialect::new("sqlite3", false));
        mock
    }

    #[test]
    fn test_stamp_overrides_caller_value_in_any_casing() {
        let policy = AuditPolicy::default().with_clock(clock());
        let changes = json!({ "email": "b@x.com", "updated_at": "1999-01-01", "updatedAt": "1999-01-01" });
        let Value::Object(changes) = changes else {
            unreachable!()
        };

        let stamped = policy.stamp(changes);

        assert_eq!(stamped.len(), 2);
        assert_eq!(stamped["updatedAt"], json!("2026-10-17 09:30:00.000"));
        assert_eq!(stamped["email"], json!("b@x.com"));
    }

    #[tokio::test]
    async fn test_update_stamps_default_column() {
        let mut conn = mock();
        conn.expect_update()
            .withf(|q: &UpdateQuery| {
                q.scope.limit == Some(1)
                    && q.changes.get("updated_at") == Some(&json!("2026-10-17 09:30:00.000"))
                    && q.changes.get("email") == Some(&json!("b@x.com"))
            })
            .times(1)
            .returning(|_| Ok(1));

        let repo: AuditableRepository = AuditableRepository::new(Arc::new(conn), "users").with_clock(clock());
        let updated = repo
            .update(Criteria::new().eq("email", "a@x.com"), json!({ "email": "b@x.com" }))
            .await
            .unwrap();

        assert!(updated);
    }

    #[tokio::test]
    async fn test_update_all_stamps_custom_column() {
        let mut conn = mock();
        conn.expect_update()
            .withf(|q: &UpdateQuery| {
                q.scope.limit.is_none()
                    && q.changes.contains_key("modified_at")
                    && !q.changes.contains_key("updated_at")
            })
            .times(1)
            .returning(|_| Ok(4));

        let repo: AuditableRepository =
            AuditableRepository::with_column(Arc::new(conn), "organizations", "modifiedAt")
                .with_clock(clock());
        let updated = repo
            .update_all(Criteria::new().eq("city", "Dallas"), json!({ "city": "Austin" }))
            .await
            .unwrap();

        assert_eq!(updated, 4);
    }

    #[tokio::test]
    async fn test_stamp_alone_is_a_valid_change() {
        let mut conn = mock();
        conn.expect_update()
            .withf(|q: &UpdateQuery| q.changes.len() == 1)
            .returning(|_| Ok(1));

        let repo: AuditableRepository = AuditableRepository::new(Arc::new(conn), "users").with_clock(clock());
        assert!(repo.update(Criteria::new().eq("id", 1), Value::Null).await.unwrap());
    }

    #[tokio::test]
    async fn test_other_operations_are_not_stamped() {
        let mut conn = mock();
        conn.expect_delete().times(1).returning(|_| Ok(1));
        conn.expect_update().never();

        let repo: AuditableRepository = AuditableRepository::new(Arc::new(conn), "users");
        assert!(repo.destroy(Criteria::new().eq("id", 1)).await.unwrap());
    }
}
