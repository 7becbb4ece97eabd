use std::fmt::Display;

use chrono::{DateTime, Utc};
use exemplar::Model as ExemplarModel;
use rusqlite::{Connection, OptionalExtension};
use sea_query::{enum_def, Expr, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::{model::Model, types::Uuid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ExemplarModel)]
#[table("service_version")]
#[check("../../../server/migrations/001-service_version/up.sql")]
#[enum_def]
pub struct ServiceVersion {
    pub id: Uuid,
    pub version: String,
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ExemplarModel)]
#[table("service_version")]
pub struct NewServiceVersion {
    pub id: Uuid,
    pub version: String,
}

impl NewServiceVersion {
    pub fn new(version: String) -> Result<Self, semver::Error> {
        // Just to check it's valid semver
        let _ = Version::parse(&version)?;
        let id = Uuid::new_v4();
        Ok(Self { id, version })
    }
}

impl Display for ServiceVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.version.fmt(f)
    }
}

impl Model for ServiceVersion {
    type Iden = ServiceVersionIden;

    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                ServiceVersionIden::Id,
                ServiceVersionIden::Version,
                ServiceVersionIden::CreationDate,
            ])
            .from(ServiceVersionIden::Table)
            .take()
    }
}

impl ServiceVersion {
    pub fn cmp(&self, other: &str) -> Result<std::cmp::Ordering, semver::Error> {
        let my_version = Version::parse(&self.version)?;
        let other_version = Version::parse(other)?;

        Ok(my_version.cmp(&other_version))
    }

    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Self, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ServiceVersionIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Self::from_row)?;
        Ok(res)
    }

    pub fn fetch_latest(conn: &Connection) -> Result<Option<Self>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .order_by(ServiceVersionIden::CreationDate, Order::Desc)
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let value = stmt.query_row(&*values.as_params(), Self::from_row).optional()?;

        Ok(value)
    }

    pub fn create(
        conn: &mut Connection,
        new_service_version: NewServiceVersion,
    ) -> Result<ServiceVersion, rusqlite::Error> {
        let tx = conn.transaction()?;
        let new_service_version = {
            new_service_version.insert(&tx)?;
            ServiceVersion::fetch_by_id(&tx, &new_service_version.id)?
        };
        tx.commit()?;

        Ok(new_service_version)
    }
}
