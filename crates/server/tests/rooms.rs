mod common;

use axum::http::{Method, StatusCode};
use common::{json_body, TestApp};
use shared::{
    api::{
        payloads::{JoinRoomResponse, RoomView},
        Calls,
    },
    types::{rtc::RoomId, Uuid},
};

fn room_path(call: Calls, room: &Uuid) -> String {
    call.path().replace(":room_id", &room.to_string())
}

async fn join(app: &TestApp, room: &Uuid, user: &Uuid) -> JoinRoomResponse {
    let response = app
        .request(Method::POST, &room_path(Calls::RoomJoin, room), Some(user), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

async fn view(app: &TestApp, room: &Uuid, user: &Uuid) -> RoomView {
    let response = app.get(&room_path(Calls::Room, room), user).await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn rooms_do_not_exist_until_someone_joins() {
    let app = TestApp::new().await;
    let user = Uuid::new_v4();
    let room = Uuid::new_v4();

    let response = app.get(&room_path(Calls::Room, &room), &user).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    join(&app, &room, &user).await;

    let response = app.get(&room_path(Calls::Room, &room), &user).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn joining_lists_the_peer_already_seated() {
    let app = TestApp::new().await;
    let room = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let joined = join(&app, &room, &alice).await;
    assert_eq!(joined.room_id, RoomId::from(room));
    assert!(joined.peers.is_empty());

    let seated = view(&app, &room, &alice).await;
    assert_eq!(seated.peers.len(), 1);
    assert_eq!(seated.peers[0].user_id, alice);
    // Seats are taken over http, the websocket attach comes later
    assert!(!seated.peers[0].connected);

    let joined = join(&app, &room, &bob).await;
    assert_eq!(joined.peers.len(), 1);
    assert_eq!(joined.peers[0].user_id, alice);

    let seated = view(&app, &room, &bob).await;
    assert_eq!(seated.peers.len(), 2);
}

#[tokio::test]
async fn a_third_caller_is_refused() {
    let app = TestApp::new().await;
    let room = Uuid::new_v4();

    join(&app, &room, &Uuid::new_v4()).await;
    join(&app, &room, &Uuid::new_v4()).await;

    let response = app
        .request(
            Method::POST,
            &room_path(Calls::RoomJoin, &room),
            Some(&Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The refused join did not disturb the seated pair
    let seated = view(&app, &room, &Uuid::new_v4()).await;
    assert_eq!(seated.peers.len(), 2);
}

#[tokio::test]
async fn rejoining_keeps_the_same_seat() {
    let app = TestApp::new().await;
    let room = Uuid::new_v4();
    let alice = Uuid::new_v4();

    let first = join(&app, &room, &alice).await;
    let second = join(&app, &room, &alice).await;

    assert_eq!(first.peer_id, second.peer_id);
    assert_eq!(view(&app, &room, &alice).await.peers.len(), 1);
}

#[tokio::test]
async fn leaving_frees_the_seat_and_empty_rooms_vanish() {
    let app = TestApp::new().await;
    let room = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    join(&app, &room, &alice).await;
    join(&app, &room, &bob).await;

    let response = app
        .request(Method::POST, &room_path(Calls::RoomLeave, &room), Some(&alice), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let seated = view(&app, &room, &bob).await;
    assert_eq!(seated.peers.len(), 1);
    assert_eq!(seated.peers[0].user_id, bob);

    // Leaving twice is a no-op
    let response = app
        .request(Method::POST, &room_path(Calls::RoomLeave, &room), Some(&alice), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The freed seat can be taken by a new caller
    let carol = Uuid::new_v4();
    join(&app, &room, &carol).await;
    assert_eq!(view(&app, &room, &carol).await.peers.len(), 2);

    // Once everyone leaves the room is gone
    for user in [&bob, &carol] {
        let response = app
            .request(Method::POST, &room_path(Calls::RoomLeave, &room), Some(user), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.get(&room_path(Calls::Room, &room), &alice).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn call_routes_require_an_identity_header() {
    let app = TestApp::new().await;
    let room = Uuid::new_v4();

    let response = app
        .request(Method::POST, &room_path(Calls::RoomJoin, &room), None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, &room_path(Calls::Room, &room), None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
