use std::fmt;

use chrono::{DateTime, Utc};
use exemplar::Model as ExemplarModel;
use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    Connection, OptionalExtension, ToSql, TransactionBehavior,
};
use sea_query::{
    enum_def, Asterisk, Expr, Func, Order, Query, SelectStatement, SqliteQueryBuilder,
};
use sea_query_rusqlite::RusqliteBinder;
use serde::{Deserialize, Serialize};

use crate::{model::Model, types::Uuid};

/// Which template table a run refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Workout,
    Diet,
}

impl TemplateKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Workout => "workout",
            TemplateKind::Diet => "diet",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TemplateKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TemplateKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "workout" => Ok(TemplateKind::Workout),
            "diet" => Ok(TemplateKind::Diet),
            other => Err(FromSqlError::Other(format!("unknown template kind: {other}").into())),
        }
    }
}

impl From<TemplateKind> for sea_query::Value {
    fn from(value: TemplateKind) -> Self {
        value.as_str().into()
    }
}

/// One entry in the append-only run log. The active run for a
/// `(user, kind)` pair is the newest row without a `stopped_date`,
/// starting a template stops the previous run rather than erasing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ExemplarModel)]
#[table("template_run")]
#[check("../../../../server/migrations/005-template_run/up.sql")]
#[enum_def]
pub struct TemplateRun {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: Uuid,
    pub kind: TemplateKind,
    pub started_date: DateTime<Utc>,
    pub stopped_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ExemplarModel)]
#[table("template_run")]
pub struct NewTemplateRun {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: Uuid,
    pub kind: TemplateKind,
    pub started_date: DateTime<Utc>,
}

impl Model for TemplateRun {
    type Iden = TemplateRunIden;

    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                TemplateRunIden::Id,
                TemplateRunIden::UserId,
                TemplateRunIden::TemplateId,
                TemplateRunIden::Kind,
                TemplateRunIden::StartedDate,
                TemplateRunIden::StoppedDate,
            ])
            .from(TemplateRunIden::Table)
            .take()
    }
}

impl TemplateRun {
    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Self, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(TemplateRunIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Self::from_row)?;
        Ok(res)
    }

    pub fn active_for_user(
        conn: &Connection,
        user_id: &Uuid,
        kind: TemplateKind,
    ) -> Result<Option<Self>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(TemplateRunIden::UserId).eq(user_id))
            .and_where(Expr::col(TemplateRunIden::Kind).eq(kind))
            .and_where(Expr::col(TemplateRunIden::StoppedDate).is_null())
            .order_by(TemplateRunIden::StartedDate, Order::Desc)
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Self::from_row).optional()?;
        Ok(res)
    }

    /// The user's full run log for one kind, newest first. Rows are never
    /// deleted so this includes runs of tombstoned templates
    pub fn history_for_user(
        conn: &Connection,
        user_id: &Uuid,
        kind: TemplateKind,
    ) -> Result<Vec<Self>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(TemplateRunIden::UserId).eq(user_id))
            .and_where(Expr::col(TemplateRunIden::Kind).eq(kind))
            .order_by(TemplateRunIden::StartedDate, Order::Desc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res =
            stmt.query_map(&*values.as_params(), Self::from_row)?.collect::<Result<_, _>>()?;
        Ok(res)
    }

    /// How many users currently have the template running, the guard the
    /// delete endpoint checks before tombstoning
    pub fn count_active_for_template(
        conn: &Connection,
        template_id: &Uuid,
    ) -> Result<u64, rusqlite::Error> {
        let (sql, values) = Query::select()
            .expr(Func::count(Expr::col(Asterisk)))
            .from(TemplateRunIden::Table)
            .and_where(Expr::col(TemplateRunIden::TemplateId).eq(template_id))
            .and_where(Expr::col(TemplateRunIden::StoppedDate).is_null())
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.query_row(&*values.as_params(), |row| row.get(0))
    }

    /// Stamps `stopped_date` on the active run if there is one. Repeated
    /// calls are no-ops
    pub fn stop_active(
        conn: &Connection,
        user_id: &Uuid,
        kind: TemplateKind,
        stopped_date: DateTime<Utc>,
    ) -> Result<Option<Self>, rusqlite::Error> {
        let Some(active) = Self::active_for_user(conn, user_id, kind)? else {
            return Ok(None);
        };

        let (sql, values) = Query::update()
            .table(TemplateRunIden::Table)
            .values([(TemplateRunIden::StoppedDate, stopped_date.into())])
            .and_where(Expr::col(TemplateRunIden::Id).eq(&active.id))
            .and_where(Expr::col(TemplateRunIden::StoppedDate).is_null())
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;

        Ok(Some(Self::fetch_by_id(conn, &active.id)?))
    }

    /// Stops whatever run is active for `(user, kind)` and appends the new
    /// run in one transaction. The later of two racing starts wins
    pub fn start(
        conn: &mut Connection,
        user_id: &Uuid,
        template_id: &Uuid,
        kind: TemplateKind,
    ) -> Result<Self, rusqlite::Error> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let run = {
            let now = Utc::now();
            Self::stop_active(&tx, user_id, kind, now)?;

            let new_run = NewTemplateRun {
                id: Uuid::new_v4(),
                user_id: *user_id,
                template_id: *template_id,
                kind,
                started_date: now,
            };
            new_run.insert(&tx)?;
            Self::fetch_by_id(&tx, &new_run.id)?
        };
        tx.commit()?;

        Ok(run)
    }
}
