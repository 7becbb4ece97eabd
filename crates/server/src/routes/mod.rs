use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use shared::api::{Calls, Object, Templates, USER_ID_HEADER};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::AppState;

mod calls;
pub use calls::*;

mod ping;
pub use ping::*;

mod templates;
pub use templates::*;

mod users;
pub use users::*;

mod websocket;
pub use websocket::*;

pub fn router(state: AppState) -> Result<Router, anyhow::Error> {
    let cors = CorsLayer::new()
        .allow_origin(state.args.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);

    Ok(Router::new()
        .route(Object::Ping.path(), get(ping))
        .route(Object::User.path(), post(create_user))
        .route(Object::UserId.path(), get(fetch_user))
        .route(
            Templates::Workout.path(),
            get(list_workout_templates).post(create_workout_template),
        )
        .route(
            Templates::WorkoutId.path(),
            get(fetch_workout_template)
                .patch(update_workout_template)
                .delete(delete_workout_template),
        )
        .route(Templates::WorkoutStart.path(), post(start_workout_template))
        .route(Templates::WorkoutStop.path(), post(stop_workout_template))
        .route(Templates::WorkoutActive.path(), get(active_workout_template))
        .route(
            Templates::WorkoutHistory.path(),
            get(workout_template_history),
        )
        .route(
            Templates::Diet.path(),
            get(list_diet_templates).post(create_diet_template),
        )
        .route(
            Templates::DietId.path(),
            get(fetch_diet_template)
                .patch(update_diet_template)
                .delete(delete_diet_template),
        )
        .route(Templates::DietStart.path(), post(start_diet_template))
        .route(Templates::DietStop.path(), post(stop_diet_template))
        .route(Templates::DietActive.path(), get(active_diet_template))
        .route(Templates::DietHistory.path(), get(diet_template_history))
        .route(Calls::Room.path(), get(fetch_room))
        .route(Calls::RoomJoin.path(), post(join_room))
        .route(Calls::RoomLeave.path(), post(leave_room))
        .route(Object::Websocket.path(), get(websocket_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state))
}
