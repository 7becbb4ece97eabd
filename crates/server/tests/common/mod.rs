// Not every test binary uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    response::Response,
    Router,
};
use deadpool_sqlite::{Config, Hook, Runtime};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use server::{db, routes, AppError, AppState, CallRooms, Cli, Clients};
use shared::{
    api::{Object, USER_ID_HEADER},
    model::User,
    types::Uuid,
};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    // Holds the shared in-memory database open for the test's lifetime
    _anchor: Connection,
}

impl TestApp {
    pub async fn new() -> Self {
        // A unique shared-cache uri so concurrently running tests get
        // isolated databases while the pool still sees this one
        let connection_string =
            format!("file:{}?mode=memory&cache=shared", Uuid::new_v4().simple());

        let anchor = Connection::open(&connection_string).expect("anchor connection");

        db::run_migrations(&connection_string, env!("CARGO_PKG_VERSION"))
            .expect("migrations should run on a fresh database");

        let pool = Config::new(connection_string.clone())
            .builder(Runtime::Tokio1)
            .expect("pool builder")
            .post_create(Hook::async_fn(|object, _| {
                Box::pin(async move {
                    object
                        .interact(|conn| db::configure_new_connection(conn))
                        .await
                        .map_err(AppError::from)?
                        .map_err(AppError::from)?;
                    Ok(())
                })
            }))
            .build()
            .expect("pool");

        let args = Cli {
            sqlite_connection_string: connection_string,
            port: 0,
            bind_addr: "127.0.0.1".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
        };

        let state = AppState {
            pool,
            args: Arc::new(args),
            rooms: CallRooms::default(),
            clients: Clients::default(),
        };

        let router = routes::router(state).expect("router");

        Self { router, _anchor: anchor }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        user: Option<&Uuid>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }

        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible")
    }

    pub async fn get(&self, path: &str, user: &Uuid) -> Response {
        self.request(Method::GET, path, Some(user), None).await
    }

    pub async fn post(&self, path: &str, user: &Uuid, body: Value) -> Response {
        self.request(Method::POST, path, Some(user), Some(body)).await
    }

    pub async fn patch(&self, path: &str, user: &Uuid, body: Value) -> Response {
        self.request(Method::PATCH, path, Some(user), Some(body)).await
    }

    pub async fn delete(&self, path: &str, user: &Uuid) -> Response {
        self.request(Method::DELETE, path, Some(user), None).await
    }

    /// Registers a user through the api so tests have a valid identity
    pub async fn seed_user(&self, username: &str) -> User {
        let response = self
            .request(
                Method::POST,
                Object::User.path(),
                None,
                Some(json!({ "username": username })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        json_body(response).await
    }
}

pub async fn json_body<T: DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("response json")
}

/// A payload that passes validation, varied by title so list assertions
/// can tell templates apart
pub fn workout_template_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Three rounds, minimal rest",
        "duration_days": 5,
        "goal": "strength",
        "equipment": true,
        "body_type": "ectomorph",
        "days": [
            {
                "day_number": 1,
                "exercises": [
                    {
                        "exercise_id": "squat",
                        "name": "Back squat",
                        "image": null,
                        "sets": 5,
                        "reps": 5,
                        "time": null,
                        "allow_weight": true
                    }
                ]
            }
        ]
    })
}

pub fn diet_template_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": null,
        "duration_days": 7,
        "goal": "cutting",
        "equipment": false,
        "body_type": null,
        "days": [
            {
                "day_number": 1,
                "meals": [
                    {
                        "name": "Oats and whey",
                        "calories": 450,
                        "protein": 40,
                        "carbs": 50,
                        "fats": 9,
                        "time": "08:00",
                        "notes": null
                    }
                ]
            }
        ]
    })
}
