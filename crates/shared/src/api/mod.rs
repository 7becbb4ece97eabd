use const_format::concatcp;
pub mod error;
pub mod payloads;
pub mod response_errors;

pub const API_BASE_PATH: &str = "/api/";
/// Stamped by the auth proxy in front of this service. Requests without
/// it are rejected as unauthenticated
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    User,
    UserId,
    Ping,
    Websocket,
}

impl Object {
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            User => concatcp!(API_BASE_PATH, "user"),
            UserId => concatcp!(API_BASE_PATH, "user/:id"),
            Ping => concatcp!(API_BASE_PATH, "ping"),
            Websocket => concatcp!(API_BASE_PATH, "ws"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Templates {
    Workout,
    WorkoutId,
    WorkoutStart,
    WorkoutStop,
    WorkoutActive,
    WorkoutHistory,
    Diet,
    DietId,
    DietStart,
    DietStop,
    DietActive,
    DietHistory,
}

impl Templates {
    pub const fn path(&self) -> &str {
        use Templates::*;
        match self {
            Workout => concatcp!(API_BASE_PATH, "workout-template"),
            WorkoutId => concatcp!(API_BASE_PATH, "workout-template/:id"),
            WorkoutStart => concatcp!(API_BASE_PATH, "workout-template/start"),
            WorkoutStop => concatcp!(API_BASE_PATH, "workout-template/stop"),
            WorkoutActive => concatcp!(API_BASE_PATH, "workout-template/active"),
            WorkoutHistory => concatcp!(API_BASE_PATH, "workout-template/history"),
            Diet => concatcp!(API_BASE_PATH, "diet-template"),
            DietId => concatcp!(API_BASE_PATH, "diet-template/:id"),
            DietStart => concatcp!(API_BASE_PATH, "diet-template/start"),
            DietStop => concatcp!(API_BASE_PATH, "diet-template/stop"),
            DietActive => concatcp!(API_BASE_PATH, "diet-template/active"),
            DietHistory => concatcp!(API_BASE_PATH, "diet-template/history"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calls {
    Room,
    RoomJoin,
    RoomLeave,
}

impl Calls {
    pub const fn path(&self) -> &str {
        use Calls::*;
        match self {
            Room => concatcp!(API_BASE_PATH, "call/room/:room_id"),
            RoomJoin => concatcp!(API_BASE_PATH, "call/room/:room_id/join"),
            RoomLeave => concatcp!(API_BASE_PATH, "call/room/:room_id/leave"),
        }
    }
}
