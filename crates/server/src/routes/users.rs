use axum::{extract::Path, Json};
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::CreateUserRequest,
        response_errors::UserError,
    },
    model::{NewUser, User, ValidateModel},
    types::Uuid,
};

use crate::db::DatabaseConnection;

pub async fn create_user(
    DatabaseConnection(conn): DatabaseConnection,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<User>, ServerError<Nothing>> {
    request.validate()?;

    let user = conn
        .interact(move |conn| {
            let user = User::create(conn, NewUser::new(Uuid::new_v4(), request.username))?;

            Ok::<_, ServerError<_>>(user)
        })
        .await??;

    Ok(Json(user))
}

pub async fn fetch_user(
    DatabaseConnection(conn): DatabaseConnection,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ServerError<UserError>> {
    let user = conn
        .interact(move |conn| {
            let user = User::fetch_by_id(conn, &id)?.ok_or(UserError::NotFound)?;

            Ok::<_, ServerError<_>>(user)
        })
        .await??;

    Ok(Json(user))
}
