use chrono::{DateTime, Utc};
use exemplar::Model as ExemplarModel;
use rusqlite::{Connection, OptionalExtension};
use sea_query::{enum_def, Expr, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;
use serde::{Deserialize, Serialize};

use crate::{model::Model, types::Uuid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ExemplarModel)]
#[table("user")]
#[check("../../../server/migrations/002-user/up.sql")]
#[enum_def]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub last_updated_date: DateTime<Utc>,
    pub last_login_date: Option<DateTime<Utc>>,
}

/// Insert subset, the remaining columns come from schema defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ExemplarModel)]
#[table("user")]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
}

impl NewUser {
    pub fn new<I: Into<Uuid>, T: Into<String>>(id: I, username: T) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

impl Model for User {
    type Iden = UserIden;

    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                UserIden::Id,
                UserIden::Username,
                UserIden::Email,
                UserIden::DisplayName,
                UserIden::RegistrationDate,
                UserIden::LastUpdatedDate,
                UserIden::LastLoginDate,
            ])
            .from(UserIden::Table)
            .take()
    }
}

impl User {
    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Option<User>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(UserIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt.query_row(&*values.as_params(), User::from_row).optional()?;
        Ok(user)
    }

    pub fn create(conn: &mut Connection, new_user: NewUser) -> Result<User, rusqlite::Error> {
        let tx = conn.transaction()?;
        let user = {
            new_user.insert(&tx)?;
            User::fetch_by_id(&tx, &new_user.id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?
        };
        tx.commit()?;

        Ok(user)
    }

    pub fn exists(conn: &Connection, id: &Uuid) -> Result<bool, rusqlite::Error> {
        Ok(Self::fetch_by_id(conn, id)?.is_some())
    }
}
