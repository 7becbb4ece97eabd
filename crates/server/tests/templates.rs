mod common;

use std::collections::HashSet;

use axum::http::{Method, StatusCode};
use common::{diet_template_body, json_body, workout_template_body, TestApp};
use serde_json::{json, Value};
use shared::{
    api::{payloads::Page, Templates},
    model::{DietTemplate, WorkoutTemplate},
    types::Uuid,
};

fn id_path(template: Templates, id: &Uuid) -> String {
    template.path().replace(":id", &id.to_string())
}

#[tokio::test]
async fn created_workout_template_fetches_back_equal() {
    let app = TestApp::new().await;
    let user = app.seed_user("alice").await;

    let response = app
        .post(Templates::Workout.path(), &user.id, workout_template_body("5x5"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: WorkoutTemplate = json_body(response).await;

    assert_eq!(created.title, "5x5");
    assert_eq!(created.duration_days, 5);
    assert_eq!(created.created_by, user.id);
    assert_eq!(created.days[0].exercises[0].name, "Back squat");
    assert!(created.deleted_date.is_none());

    let response = app.get(&id_path(Templates::WorkoutId, &created.id), &user.id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: WorkoutTemplate = json_body(response).await;

    assert_eq!(created, fetched);
}

#[tokio::test]
async fn created_diet_template_fetches_back_equal() {
    let app = TestApp::new().await;
    let user = app.seed_user("bob").await;

    let response = app
        .post(Templates::Diet.path(), &user.id, diet_template_body("Summer cut"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: DietTemplate = json_body(response).await;

    assert_eq!(created.title, "Summer cut");
    assert_eq!(created.goal, "cutting");
    assert_eq!(created.days[0].meals[0].calories, 450);

    let response = app.get(&id_path(Templates::DietId, &created.id), &user.id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: DietTemplate = json_body(response).await;

    assert_eq!(created, fetched);
}

#[tokio::test]
async fn template_routes_require_an_identity_header() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            Templates::Workout.path(),
            None,
            Some(workout_template_body("No identity")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.request(Method::GET, Templates::Diet.path(), None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_rejects_blank_titles_and_zero_durations() {
    let app = TestApp::new().await;
    let user = app.seed_user("carol").await;

    let mut body = workout_template_body("  ");
    let response = app.post(Templates::Workout.path(), &user.id, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    body = workout_template_body("Valid title");
    body["duration_days"] = json!(0);
    let response = app.post(Templates::Workout.path(), &user.id, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing slipped through
    let response = app.get(Templates::Workout.path(), &user.id).await;
    let page: Page<WorkoutTemplate> = json_body(response).await;
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn unknown_template_ids_are_not_found() {
    let app = TestApp::new().await;
    let user = app.seed_user("dave").await;

    let path = id_path(Templates::WorkoutId, &Uuid::new_v4());

    let response = app.get(&path, &user.id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.patch(&path, &user.id, json!({ "title": "Renamed" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.delete(&path, &user.id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn seed_catalogue(app: &TestApp, user: &Uuid) {
    for i in 1..=7 {
        let response = app
            .post(
                Templates::Workout.path(),
                user,
                workout_template_body(&format!("Strength block {i}")),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    for i in 1..=5 {
        let mut body = workout_template_body(&format!("Morning mobility {i}"));
        body["goal"] = json!("mobility");
        body["equipment"] = json!(false);
        body["body_type"] = Value::Null;
        let response = app.post(Templates::Workout.path(), user, body).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

async fn list(app: &TestApp, user: &Uuid, query: &str) -> Page<WorkoutTemplate> {
    let response = app
        .get(&format!("{}?{query}", Templates::Workout.path()), user)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn listing_paginates_without_overlap() {
    let app = TestApp::new().await;
    let user = app.seed_user("erin").await;
    seed_catalogue(&app, &user.id).await;

    let page = list(&app, &user.id, "limit=5").await;
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 1);
    assert_eq!(page.items.len(), 5);

    let mut seen: HashSet<Uuid> = page.items.iter().map(|t| t.id).collect();
    let mut fetched = page.items.len();
    for number in 2..=3 {
        let page = list(&app, &user.id, &format!("limit=5&page={number}")).await;
        assert_eq!(page.page, number);
        fetched += page.items.len();
        seen.extend(page.items.iter().map(|t| t.id));
    }

    // Three pages of 5/5/2 cover every template exactly once
    assert_eq!(fetched, 12);
    assert_eq!(seen.len(), 12);

    let page = list(&app, &user.id, "limit=5&page=4").await;
    assert!(page.items.is_empty());
    assert_eq!(page.total, 12);
}

#[tokio::test]
async fn listing_filters_combine_as_conjunction() {
    let app = TestApp::new().await;
    let user = app.seed_user("frank").await;
    seed_catalogue(&app, &user.id).await;

    // Substring search ignores ascii case
    assert_eq!(list(&app, &user.id, "search=STRENGTH").await.total, 7);
    assert_eq!(list(&app, &user.id, "search=block").await.total, 7);

    assert_eq!(list(&app, &user.id, "goal=mobility").await.total, 5);
    assert_eq!(list(&app, &user.id, "equipment=true").await.total, 7);
    assert_eq!(list(&app, &user.id, "equipment=false").await.total, 5);
    assert_eq!(list(&app, &user.id, "body_type=ectomorph").await.total, 7);

    assert_eq!(list(&app, &user.id, "search=block&goal=mobility").await.total, 0);
    let page = list(&app, &user.id, "search=mobility&goal=mobility&equipment=false").await;
    assert_eq!(page.total, 5);
    assert!(page.items.iter().all(|t| t.goal == "mobility"));
}

#[tokio::test]
async fn out_of_range_paging_is_rejected() {
    let app = TestApp::new().await;
    let user = app.seed_user("grace").await;

    for query in ["page=0", "limit=0", "limit=101"] {
        let response = app
            .get(&format!("{}?{query}", Templates::Workout.path()), &user.id)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query}");
    }

    let response = app
        .get(&format!("{}?limit=100", Templates::Workout.path()), &user.id)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_changes_only_the_sent_fields() {
    let app = TestApp::new().await;
    let user = app.seed_user("heidi").await;

    let response = app
        .post(Templates::Workout.path(), &user.id, workout_template_body("Original"))
        .await;
    let created: WorkoutTemplate = json_body(response).await;

    let response = app
        .patch(
            &id_path(Templates::WorkoutId, &created.id),
            &user.id,
            json!({ "title": "Renamed", "duration_days": 9 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: WorkoutTemplate = json_body(response).await;

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.duration_days, 9);
    assert_eq!(updated.goal, created.goal);
    assert_eq!(updated.days, created.days);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.creation_date, created.creation_date);

    let response = app.get(&id_path(Templates::WorkoutId, &created.id), &user.id).await;
    let fetched: WorkoutTemplate = json_body(response).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_rejects_invalid_fields_without_applying_them() {
    let app = TestApp::new().await;
    let user = app.seed_user("ivan").await;

    let response = app
        .post(Templates::Workout.path(), &user.id, workout_template_body("Keep me"))
        .await;
    let created: WorkoutTemplate = json_body(response).await;

    let response = app
        .patch(
            &id_path(Templates::WorkoutId, &created.id),
            &user.id,
            json!({ "title": "" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get(&id_path(Templates::WorkoutId, &created.id), &user.id).await;
    let fetched: WorkoutTemplate = json_body(response).await;
    assert_eq!(fetched.title, "Keep me");
}

#[tokio::test]
async fn deleted_templates_disappear_from_reads() {
    let app = TestApp::new().await;
    let user = app.seed_user("judy").await;

    let response = app
        .post(Templates::Workout.path(), &user.id, workout_template_body("Doomed"))
        .await;
    let doomed: WorkoutTemplate = json_body(response).await;
    let response = app
        .post(Templates::Workout.path(), &user.id, workout_template_body("Survivor"))
        .await;
    let survivor: WorkoutTemplate = json_body(response).await;

    let response = app.delete(&id_path(Templates::WorkoutId, &doomed.id), &user.id).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get(&id_path(Templates::WorkoutId, &doomed.id), &user.id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let page = list(&app, &user.id, "page=1").await;
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, survivor.id);

    // Deleting again hits the tombstone
    let response = app.delete(&id_path(Templates::WorkoutId, &doomed.id), &user.id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn workout_and_diet_catalogues_are_separate() {
    let app = TestApp::new().await;
    let user = app.seed_user("mallory").await;

    app.post(Templates::Workout.path(), &user.id, workout_template_body("Lift")).await;
    app.post(Templates::Diet.path(), &user.id, diet_template_body("Eat")).await;

    let workouts = list(&app, &user.id, "page=1").await;
    assert_eq!(workouts.total, 1);
    assert_eq!(workouts.items[0].title, "Lift");

    let response = app.get(Templates::Diet.path(), &user.id).await;
    let diets: Page<DietTemplate> = json_body(response).await;
    assert_eq!(diets.total, 1);
    assert_eq!(diets.items[0].title, "Eat");
}
