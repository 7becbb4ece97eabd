use axum::{
    extract::{Path, Query},
    Json,
};
use chrono::Utc;
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{
            ActiveTemplate, CreateDietTemplateRequest, Page, StartTemplateRequest,
            TemplateListQuery, UpdateDietTemplateRequest,
        },
        response_errors::{FetchError, StartTemplateError, TemplateError},
    },
    model::{DietTemplate, NewDietTemplate, TemplateKind, TemplateRun, User, ValidateModel},
    types::Uuid,
};

use crate::{db::DatabaseConnection, UserState};

pub async fn create_diet_template(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Json(request): Json<CreateDietTemplateRequest>,
) -> Result<Json<DietTemplate>, ServerError<Nothing>> {
    request.validate()?;

    let template = conn
        .interact(move |conn| {
            let template =
                DietTemplate::create(conn, NewDietTemplate::new(request, user_state.id))?;

            Ok::<_, ServerError<_>>(template)
        })
        .await??;

    Ok(Json(template))
}

pub async fn fetch_diet_template(
    DatabaseConnection(conn): DatabaseConnection,
    _user_state: UserState,
    Path(id): Path<Uuid>,
) -> Result<Json<DietTemplate>, ServerError<TemplateError>> {
    let template = conn
        .interact(move |conn| {
            let template = DietTemplate::fetch_by_id(conn, &id)?.ok_or(TemplateError::NotFound)?;

            Ok::<_, ServerError<_>>(template)
        })
        .await??;

    Ok(Json(template))
}

pub async fn list_diet_templates(
    DatabaseConnection(conn): DatabaseConnection,
    _user_state: UserState,
    Query(query): Query<TemplateListQuery>,
) -> Result<Json<Page<DietTemplate>>, ServerError<Nothing>> {
    let (page, limit) = query.page_and_limit()?;

    let results = conn
        .interact(move |conn| {
            let (items, total) = DietTemplate::fetch_page(conn, &query, page, limit)?;

            Ok::<_, ServerError<_>>(Page::new(items, total, page, limit))
        })
        .await??;

    Ok(Json(results))
}

pub async fn update_diet_template(
    DatabaseConnection(conn): DatabaseConnection,
    _user_state: UserState,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDietTemplateRequest>,
) -> Result<Json<DietTemplate>, ServerError<TemplateError>> {
    request.validate()?;

    let template = conn
        .interact(move |conn| {
            let mut template =
                DietTemplate::fetch_by_id(conn, &id)?.ok_or(TemplateError::NotFound)?;

            template.apply(request, Utc::now());
            template.update(conn)?;

            Ok::<_, ServerError<_>>(template)
        })
        .await??;

    Ok(Json(template))
}

pub async fn delete_diet_template(
    DatabaseConnection(conn): DatabaseConnection,
    _user_state: UserState,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, ServerError<TemplateError>> {
    conn.interact(move |conn| {
        let template = DietTemplate::fetch_by_id(conn, &id)?.ok_or(TemplateError::NotFound)?;

        let active_runs = TemplateRun::count_active_for_template(conn, &template.id)?;
        if active_runs > 0 {
            Err(TemplateError::InUse { active_runs })?;
        }

        template.mark_deleted(conn, Utc::now())?;

        Ok::<_, ServerError<_>>(())
    })
    .await??;

    Ok(Json(()))
}

pub async fn start_diet_template(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Json(request): Json<StartTemplateRequest>,
) -> Result<Json<TemplateRun>, ServerError<StartTemplateError>> {
    let run = conn
        .interact(move |conn| {
            if !User::exists(conn, &user_state.id)? {
                Err(StartTemplateError::UserNotFound)?;
            }
            if DietTemplate::fetch_by_id(conn, &request.template_id)?.is_none() {
                Err(StartTemplateError::TemplateNotFound)?;
            }

            let run = TemplateRun::start(
                conn,
                &user_state.id,
                &request.template_id,
                TemplateKind::Diet,
            )?;

            Ok::<_, ServerError<_>>(run)
        })
        .await??;

    Ok(Json(run))
}

pub async fn stop_diet_template(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
) -> Result<Json<Option<TemplateRun>>, ServerError<Nothing>> {
    let run = conn
        .interact(move |conn| {
            let run =
                TemplateRun::stop_active(conn, &user_state.id, TemplateKind::Diet, Utc::now())?;

            Ok::<_, ServerError<_>>(run)
        })
        .await??;

    Ok(Json(run))
}

pub async fn active_diet_template(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
) -> Result<Json<Option<ActiveTemplate<DietTemplate>>>, ServerError<FetchError>> {
    let active = conn
        .interact(move |conn| {
            let Some(run) = TemplateRun::active_for_user(conn, &user_state.id, TemplateKind::Diet)?
            else {
                return Ok::<_, ServerError<_>>(None);
            };

            let template = DietTemplate::fetch_by_id(conn, &run.template_id)?;

            Ok(template.map(|template| ActiveTemplate { run, template }))
        })
        .await??;

    Ok(Json(active))
}

pub async fn diet_template_history(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
) -> Result<Json<Vec<TemplateRun>>, ServerError<FetchError>> {
    let runs = conn
        .interact(move |conn| {
            let runs = TemplateRun::history_for_user(conn, &user_state.id, TemplateKind::Diet)?;

            Ok::<_, ServerError<_>>(runs)
        })
        .await??;

    Ok(Json(runs))
}
