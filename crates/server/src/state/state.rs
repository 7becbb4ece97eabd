use std::sync::Arc;

use deadpool_sqlite::Pool;

use crate::{
    cli::Cli,
    state::{CallRooms, Clients},
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: Pool,
    pub args: Arc<Cli>,
    pub rooms: CallRooms,
    pub clients: Clients,
}
