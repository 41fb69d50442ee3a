#![allow(dead_code)]

use std::sync::Arc;

use api::{
    auth::{Actor, AuthConfig},
    schema::{AppSchema, CrmSchema, build_schema},
    service::{self, SeededRecords},
};
use async_graphql::{Request, Response, Variables};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use serde_json::Value;

pub struct TestContext {
    pub db: Arc<DatabaseConnection>,
    pub schema: CrmSchema,
    pub seeded: SeededRecords,
}

impl TestContext {
    /// Fresh in-memory database, migrated and seeded with the demo data.
    pub async fn new_seeded() -> Self {
        let db = memory_db().await;
        let seeded = service::seed_demo(&db).await.expect("seed demo data");
        let db = Arc::new(db);
        let AppSchema(schema) = build_schema(db.clone(), Arc::new(test_auth()));
        Self { db, schema, seeded }
    }

    pub async fn actor(&self, email: &str) -> Actor {
        let profile = self
            .seeded
            .profile_email(email)
            .unwrap_or_else(|| panic!("no seeded profile {email}"));
        service::load_actor(&self.db, profile.id)
            .await
            .expect("load seeded actor")
    }

    pub async fn execute_as(&self, email: &str, query: &str, variables: Value) -> Response {
        let actor = self.actor(email).await;
        self.schema
            .execute(
                Request::new(query)
                    .variables(Variables::from_json(variables))
                    .data(actor),
            )
            .await
    }

    /// Makes every `event` (INSERT, UPDATE) on `table` abort, so a test can
    /// fail one write in the middle of an operation.
    pub async fn reject_writes(&self, table: &str, event: &str) {
        let sql = format!(
            "CREATE TRIGGER reject_{table}_{event} BEFORE {event} ON {table} \
             BEGIN SELECT RAISE(ABORT, '{table} locked'); END;"
        );
        self.db
            .execute_unprepared(&sql)
            .await
            .expect("install rejecting trigger");
    }

    pub async fn execute_anonymous(&self, query: &str) -> Response {
        self.schema.execute(Request::new(query)).await
    }
}

pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("open sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn test_auth() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".into(),
        session_ttl_minutes: 5,
    }
}

pub fn error_code(response: &Response) -> Option<String> {
    response.errors.first().and_then(|err| {
        err.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(|code| match code {
                async_graphql::Value::String(code) => Some(code.clone()),
                _ => None,
            })
    })
}
