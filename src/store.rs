use std::path::Path;
use std::time::Duration;

use sea_orm::sea_query;
use sea_orm::sea_query::{
    Expr, ExprTrait, MysqlQueryBuilder, PostgresQueryBuilder, Query, QueryStatementWriter,
    SqliteQueryBuilder, Value as SeaValue,
};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    IsolationLevel, QueryResult, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::db::*;
use crate::loader::{BulkWriteContext, WriteOptions};
use crate::migration::Migrator;
use crate::schema::{ObjectMeta, User};
use crate::{
    DatabaseConfig, Id, MetaId, TessellaConfig, TessellaError, TessellaResult, UserId, ValidTime,
};
use sea_orm_migration::MigratorTrait;

#[derive(Clone)]
pub struct TessellaStore {
    conn: DatabaseConnection,
    backend: DatabaseBackend,
    config: TessellaConfig,
}

impl TessellaStore {
    pub async fn connect(config: &TessellaConfig, base_dir: &Path) -> TessellaResult<Self> {
        let url = build_connection_url(config, base_dir)?;
        let mut options = ConnectOptions::new(url);
        if let Some(pool) = &config.pool {
            if let Some(max) = pool.max_connections {
                options.max_connections(max);
            }
            if let Some(min) = pool.min_connections {
                options.min_connections(min);
            }
            if let Some(timeout_ms) = pool.connect_timeout_ms {
                options.connect_timeout(Duration::from_millis(timeout_ms));
            }
            if let Some(timeout_ms) = pool.acquire_timeout_ms {
                options.acquire_timeout(Duration::from_millis(timeout_ms));
            }
            if let Some(timeout_ms) = pool.idle_timeout_ms {
                options.idle_timeout(Duration::from_millis(timeout_ms));
            }
        }
        let conn = Database::connect(options)
            .await
            .map_err(TessellaError::from)?;
        let backend = conn.get_database_backend();
        let store = Self {
            conn,
            backend,
            config: config.clone(),
        };
        Migrator::up(&store.conn, None)
            .await
            .map_err(TessellaError::from)?;
        Ok(store)
    }

    pub async fn connect_sqlite(path: &Path) -> TessellaResult<Self> {
        let config = TessellaConfig::default_sqlite(path.to_string_lossy());
        Self::connect(&config, path.parent().unwrap_or_else(|| Path::new("."))).await
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.backend
    }

    /// Register a user writes can be attributed to. Users are created outside
    /// any bulk-write scope; scopes only reference them.
    pub async fn create_user(&self, email: &str, name: Option<&str>) -> TessellaResult<User> {
        let user = User {
            user_id: UserId(Id::new()),
            email: email.to_string(),
            name: name.map(str::to_string),
            created_at: ValidTime::now_micros(),
        };
        let insert = Query::insert()
            .into_table(TessellaUsers::Table)
            .columns([
                TessellaUsers::UserId,
                TessellaUsers::Email,
                TessellaUsers::Name,
                TessellaUsers::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, user.user_id.0).into(),
                user.email.clone().into(),
                user.name.clone().into(),
                user.created_at.as_i64().into(),
            ])
            .to_owned();
        let tx = self.conn.begin().await?;
        exec(&tx, &insert).await?;
        tx.commit().await?;
        Ok(user)
    }

    pub async fn user_by_email(&self, email: &str) -> TessellaResult<Option<User>> {
        fetch_user_by_email(&self.conn, email).await
    }

    /// Open a bulk-write scope: one transaction, one audit record. The
    /// attributing identity comes from the options, falling back to the
    /// configured default; a missing identity fails before any database work.
    pub async fn begin_bulk_write(&self, options: WriteOptions) -> TessellaResult<BulkWriteContext> {
        let email = options
            .user
            .clone()
            .or_else(|| self.config.user.clone())
            .ok_or_else(|| TessellaError::config("no attributing user configured"))?;
        let dry_run = options.dry_run || self.config.dry_run;
        let txn = match self.backend {
            DatabaseBackend::Sqlite => self.conn.begin().await?,
            _ => {
                self.conn
                    .begin_with_config(Some(IsolationLevel::Serializable), None)
                    .await?
            }
        };
        let user = fetch_user_by_email(&txn, &email)
            .await?
            .ok_or_else(|| TessellaError::not_found(format!("no user with email '{email}'")))?;
        let meta = ObjectMeta {
            meta_id: MetaId(Id::new()),
            notes: options.notes.clone(),
            created_at: ValidTime::now_micros(),
            created_by: user.user_id,
        };
        let insert = Query::insert()
            .into_table(TessellaObjectMeta::Table)
            .columns([
                TessellaObjectMeta::MetaId,
                TessellaObjectMeta::Notes,
                TessellaObjectMeta::CreatedAt,
                TessellaObjectMeta::CreatedBy,
            ])
            .values_panic([
                id_value(self.backend, meta.meta_id.0).into(),
                meta.notes.clone().into(),
                meta.created_at.as_i64().into(),
                id_value(self.backend, meta.created_by.0).into(),
            ])
            .to_owned();
        exec(&txn, &insert).await?;
        Ok(BulkWriteContext::new(
            txn,
            self.backend,
            user,
            meta,
            dry_run,
            options.bool_coercion,
        ))
    }
}

pub(crate) async fn fetch_user_by_email<C>(conn: &C, email: &str) -> TessellaResult<Option<User>>
where
    C: ConnectionTrait,
{
    let select = Query::select()
        .from(TessellaUsers::Table)
        .columns([
            TessellaUsers::UserId,
            TessellaUsers::Email,
            TessellaUsers::Name,
            TessellaUsers::CreatedAt,
        ])
        .and_where(Expr::col(TessellaUsers::Email).eq(email))
        .to_owned();
    let Some(row) = query_one(conn, &select).await? else {
        return Ok(None);
    };
    let user = User {
        user_id: UserId(read_id(&row, TessellaUsers::UserId)?),
        email: row.try_get("", &col_name(TessellaUsers::Email))?,
        name: row.try_get("", &col_name(TessellaUsers::Name))?,
        created_at: ValidTime::from_i64(row.try_get("", &col_name(TessellaUsers::CreatedAt))?),
    };
    Ok(Some(user))
}

pub(crate) fn id_value(backend: DatabaseBackend, id: Id) -> SeaValue {
    match backend {
        DatabaseBackend::Postgres => {
            let uuid = Uuid::from_bytes(id.as_bytes());
            SeaValue::Uuid(Some(uuid))
        }
        DatabaseBackend::MySql => SeaValue::Bytes(Some(id.as_vec())),
        DatabaseBackend::Sqlite => SeaValue::String(Some(id.to_uuid_string())),
        _ => SeaValue::String(Some(id.to_uuid_string())),
    }
}

fn bytes_to_id(bytes: Vec<u8>) -> Option<Id> {
    if bytes.len() == 16 {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&bytes);
        Some(Id::from_bytes(buf))
    } else {
        None
    }
}

pub(crate) fn read_id(row: &QueryResult, column: impl sea_query::Iden) -> TessellaResult<Id> {
    let name = col_name(column);
    if let Ok(value) = row.try_get::<String>("", &name) {
        return Id::from_uuid_str(&value);
    }
    if let Ok(value) = row.try_get::<Uuid>("", &name) {
        return Ok(Id::from_bytes(*value.as_bytes()));
    }
    if let Ok(value) = row.try_get::<Vec<u8>>("", &name) {
        return bytes_to_id(value).ok_or_else(|| TessellaError::storage("invalid id length"));
    }
    Err(TessellaError::storage("unsupported id format"))
}

pub(crate) fn col_name(column: impl sea_query::Iden) -> String {
    column.to_string()
}

fn build_stmt<S: QueryStatementWriter>(
    backend: DatabaseBackend,
    stmt: &S,
) -> (String, sea_orm::sea_query::Values) {
    match backend {
        DatabaseBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        DatabaseBackend::Postgres => stmt.build(PostgresQueryBuilder),
        DatabaseBackend::MySql => stmt.build(MysqlQueryBuilder),
        _ => stmt.build(SqliteQueryBuilder),
    }
}

pub(crate) async fn exec<C, S>(conn: &C, stmt: &S) -> TessellaResult<()>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    let backend = conn.get_database_backend();
    let (sql, values) = build_stmt(backend, stmt);
    conn.execute_raw(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(())
}

pub(crate) async fn query_all<C, S>(conn: &C, stmt: &S) -> TessellaResult<Vec<QueryResult>>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    let backend = conn.get_database_backend();
    let (sql, values) = build_stmt(backend, stmt);
    let rows = conn
        .query_all_raw(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(rows)
}

pub(crate) async fn query_one<C, S>(conn: &C, stmt: &S) -> TessellaResult<Option<QueryResult>>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    let backend = conn.get_database_backend();
    let (sql, values) = build_stmt(backend, stmt);
    let row = conn
        .query_one_raw(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(row)
}

fn build_connection_url(config: &TessellaConfig, base_dir: &Path) -> TessellaResult<String> {
    match &config.database {
        DatabaseConfig::Sqlite { .. } => {
            let path = config.sqlite_path(base_dir)?;
            Ok(format!("sqlite://{}?mode=rwc", path.display()))
        }
        DatabaseConfig::Postgres { url } | DatabaseConfig::Mysql { url } => Ok(url.clone()),
    }
}
