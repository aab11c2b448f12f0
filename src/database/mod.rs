use std::{fmt::Display, ops::Deref, sync::Arc};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, TryFromU64, TryGetError};
use ulid::Ulid;
use url::Url;

pub(crate) mod clinic;
pub(crate) mod department;
pub(crate) mod equipment;
pub(crate) mod equipment_detail;
pub(crate) mod migration;
pub(crate) mod parameter;
pub(crate) mod parameter_value;

pub async fn connect_to_database(
    host: &str,
    port: u16,
    database_name: &str,
    username: &str,
    password: Option<&str>,
) -> anyhow::Result<Arc<DatabaseConnection>> {
    let mut conn_str = Url::parse(&format!("postgres://{host}:{port}/{database_name}?sslmode=Prefer"))?;
    conn_str.set_username(username).map_err(|_| anyhow::anyhow!("invalid database username"))?;
    conn_str.set_password(password).map_err(|_| anyhow::anyhow!("invalid database password"))?;

    let mut options = ConnectOptions::new(conn_str);
    options.sqlx_logging_level(tracing::log::LevelFilter::Debug);

    Ok(Arc::new(Database::connect(options).await?))
}

pub async fn migrate(connection: &DatabaseConnection) -> Result<(), DbErr> {
    use sea_orm_migration::MigratorTrait;

    migration::Migrator::up(connection, None).await
}

#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub struct UlidId(Ulid);

impl UlidId {
    pub fn new(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn inner(self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for UlidId {
    fn from(value: Ulid) -> Self {
        Self::new(value)
    }
}

impl From<&Ulid> for UlidId {
    fn from(value: &Ulid) -> Self {
        Self::new(value.to_owned())
    }
}

impl AsRef<Ulid> for UlidId {
    fn as_ref(&self) -> &Ulid {
        &self.0
    }
}

impl Display for UlidId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Deref for UlidId {
    type Target = Ulid;

    fn deref(&self) -> &Self::Target {
        self.as_ref()
    }
}

impl From<UlidId> for sea_orm::Value {
    fn from(value: UlidId) -> Self {
        Self::String(Some(Box::new(value.to_string())))
    }
}

impl sea_orm::TryGetable for UlidId {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::prelude::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val = String::try_get_by(res, index)?;

        Ulid::from_string(&val)
            .map(Self::from)
            .map_err(|e| TryGetError::DbErr(DbErr::TryIntoErr { from: "String", into: "Ulid", source: Box::new(e) }))
    }
}

impl TryFromU64 for UlidId {
    fn try_from_u64(n: u64) -> Result<Self, DbErr> {
        let val = String::try_from_u64(n)?;
        Ulid::from_string(&val).map(Self::from).map_err(|e| DbErr::TryIntoErr {
            from: "u64",
            into: "Ulid",
            source: Box::new(e),
        })
    }
}

impl sea_orm::sea_query::ValueType for UlidId {
    fn try_from(v: sea_orm::prelude::Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            sea_orm::Value::String(v) => {
                let v = v.ok_or(sea_orm::sea_query::ValueTypeErr)?;
                Ulid::from_string(&v).map(Self::from).map_err(|_| sea_orm::sea_query::ValueTypeErr)
            }
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "Ulid".to_owned()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::prelude::ColumnType {
        sea_orm::prelude::ColumnType::String(sea_orm::sea_query::StringLen::N(26))
    }
}
