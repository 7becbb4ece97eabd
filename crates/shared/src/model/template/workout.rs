use chrono::{DateTime, Utc};
use exemplar::Model as ExemplarModel;
use rusqlite::{Connection, OptionalExtension};
use sea_query::{
    enum_def, Asterisk, Cond, Expr, Func, Order, Query, SelectStatement, SqliteQueryBuilder,
};
use sea_query_rusqlite::RusqliteBinder;
use serde::{Deserialize, Serialize};

use crate::{
    api::payloads::{CreateWorkoutTemplateRequest, TemplateListQuery, UpdateWorkoutTemplateRequest},
    model::Model,
    types::{Json, Uuid},
};

/// A multi-day workout programme authored once and followed by any number
/// of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ExemplarModel)]
#[table("workout_template")]
#[check("../../../../server/migrations/003-workout_template/up.sql")]
#[enum_def]
pub struct WorkoutTemplate {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_days: u32,
    pub goal: String,
    pub equipment: bool,
    pub body_type: Option<String>,
    pub days: Json<Vec<WorkoutDay>>,
    pub created_by: Uuid,
    pub creation_date: DateTime<Utc>,
    pub last_updated_date: DateTime<Utc>,
    pub deleted_date: Option<DateTime<Utc>>,
}

/// One scheduled day inside the `days` document. `day_number` uniqueness
/// is caller discipline, the schema does not enforce it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub day_number: u32,
    pub exercises: Vec<WorkoutExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub exercise_id: String,
    pub name: String,
    pub image: Option<String>,
    pub sets: u32,
    pub reps: Option<u32>,
    pub time: Option<String>,
    pub allow_weight: bool,
}

/// Insert subset, timestamps come from schema defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ExemplarModel)]
#[table("workout_template")]
pub struct NewWorkoutTemplate {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_days: u32,
    pub goal: String,
    pub equipment: bool,
    pub body_type: Option<String>,
    pub days: Json<Vec<WorkoutDay>>,
    pub created_by: Uuid,
}

impl NewWorkoutTemplate {
    pub fn new(request: CreateWorkoutTemplateRequest, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            duration_days: request.duration_days,
            goal: request.goal,
            equipment: request.equipment,
            body_type: request.body_type,
            days: request.days.into(),
            created_by,
        }
    }
}

impl Model for WorkoutTemplate {
    type Iden = WorkoutTemplateIden;

    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                WorkoutTemplateIden::Id,
                WorkoutTemplateIden::Title,
                WorkoutTemplateIden::Description,
                WorkoutTemplateIden::DurationDays,
                WorkoutTemplateIden::Goal,
                WorkoutTemplateIden::Equipment,
                WorkoutTemplateIden::BodyType,
                WorkoutTemplateIden::Days,
                WorkoutTemplateIden::CreatedBy,
                WorkoutTemplateIden::CreationDate,
                WorkoutTemplateIden::LastUpdatedDate,
                WorkoutTemplateIden::DeletedDate,
            ])
            .from(WorkoutTemplateIden::Table)
            .take()
    }
}

impl WorkoutTemplate {
    /// Tombstoned rows are invisible to every read path
    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Option<Self>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(WorkoutTemplateIden::Id).eq(id))
            .and_where(Expr::col(WorkoutTemplateIden::DeletedDate).is_null())
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Self::from_row).optional()?;
        Ok(res)
    }

    pub fn create(
        conn: &mut Connection,
        new_template: NewWorkoutTemplate,
    ) -> Result<Self, rusqlite::Error> {
        let tx = conn.transaction()?;
        let template = {
            new_template.insert(&tx)?;
            Self::fetch_by_id(&tx, &new_template.id)?
                .ok_or(rusqlite::Error::QueryReturnedNoRows)?
        };
        tx.commit()?;

        Ok(template)
    }

    /// Returns the requested page plus the total number of rows matching
    /// the filter
    pub fn fetch_page(
        conn: &Connection,
        query: &TemplateListQuery,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Self>, u64), rusqlite::Error> {
        let cond = Self::filter_cond(query);

        let (sql, values) = Query::select()
            .expr(Func::count(Expr::col(Asterisk)))
            .from(WorkoutTemplateIden::Table)
            .cond_where(cond.clone())
            .build_rusqlite(SqliteQueryBuilder);
        let mut stmt = conn.prepare_cached(&sql)?;
        let total: u64 = stmt.query_row(&*values.as_params(), |row| row.get(0))?;

        let (sql, values) = Self::select_star()
            .cond_where(cond)
            .order_by(WorkoutTemplateIden::CreationDate, Order::Desc)
            // Uuid tiebreak keeps pages stable when creation dates collide
            .order_by(WorkoutTemplateIden::Id, Order::Desc)
            .limit(limit)
            .offset((page - 1) * limit)
            .build_rusqlite(SqliteQueryBuilder);
        let mut stmt = conn.prepare_cached(&sql)?;
        let items =
            stmt.query_map(&*values.as_params(), Self::from_row)?.collect::<Result<_, _>>()?;

        Ok((items, total))
    }

    fn filter_cond(query: &TemplateListQuery) -> Cond {
        let mut cond = Cond::all().add(Expr::col(WorkoutTemplateIden::DeletedDate).is_null());

        if let Some(search) = query.search.as_deref() {
            // LIKE is case insensitive for ascii in sqlite
            cond = cond.add(Expr::col(WorkoutTemplateIden::Title).like(format!("%{search}%")));
        }
        if let Some(goal) = query.goal.as_deref() {
            cond = cond.add(Expr::col(WorkoutTemplateIden::Goal).eq(goal));
        }
        if let Some(equipment) = query.equipment {
            cond = cond.add(Expr::col(WorkoutTemplateIden::Equipment).eq(equipment));
        }
        if let Some(body_type) = query.body_type.as_deref() {
            cond = cond.add(Expr::col(WorkoutTemplateIden::BodyType).eq(body_type));
        }

        cond
    }

    /// Folds a partial update into the row. Absent fields keep their
    /// stored values
    pub fn apply(&mut self, request: UpdateWorkoutTemplateRequest, now: DateTime<Utc>) {
        let UpdateWorkoutTemplateRequest {
            title,
            description,
            duration_days,
            goal,
            equipment,
            body_type,
            days,
        } = request;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
        if let Some(duration_days) = duration_days {
            self.duration_days = duration_days;
        }
        if let Some(goal) = goal {
            self.goal = goal;
        }
        if let Some(equipment) = equipment {
            self.equipment = equipment;
        }
        if let Some(body_type) = body_type {
            self.body_type = Some(body_type);
        }
        if let Some(days) = days {
            self.days = days.into();
        }
        self.last_updated_date = now;
    }

    pub fn update(&self, conn: &Connection) -> Result<(), rusqlite::Error> {
        let days = self
            .days
            .to_value()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let (sql, values) = Query::update()
            .table(WorkoutTemplateIden::Table)
            .values([
                (WorkoutTemplateIden::Title, self.title.clone().into()),
                (WorkoutTemplateIden::Description, self.description.clone().into()),
                (WorkoutTemplateIden::DurationDays, self.duration_days.into()),
                (WorkoutTemplateIden::Goal, self.goal.clone().into()),
                (WorkoutTemplateIden::Equipment, self.equipment.into()),
                (WorkoutTemplateIden::BodyType, self.body_type.clone().into()),
                (WorkoutTemplateIden::Days, days.into()),
                (WorkoutTemplateIden::LastUpdatedDate, self.last_updated_date.into()),
            ])
            .and_where(Expr::col(WorkoutTemplateIden::Id).eq(&self.id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;

        Ok(())
    }

    /// Tombstones the row so historical runs keep a resolvable reference
    pub fn mark_deleted(
        &self,
        conn: &Connection,
        deleted_date: DateTime<Utc>,
    ) -> Result<(), rusqlite::Error> {
        let (sql, values) = Query::update()
            .table(WorkoutTemplateIden::Table)
            .values([(WorkoutTemplateIden::DeletedDate, deleted_date.into())])
            .and_where(Expr::col(WorkoutTemplateIden::Id).eq(&self.id))
            .and_where(Expr::col(WorkoutTemplateIden::DeletedDate).is_null())
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;

        Ok(())
    }
}
