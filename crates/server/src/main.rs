use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
    sync::Arc,
};

use clap::Parser;
use deadpool_sqlite::{Config, Hook, Runtime};
use server::{db, routes, AppError, AppState, CallRooms, Cli, Clients};
use shared::*;
use tokio::net::TcpListener;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    load_dotenv()?;
    configure_tracing();

    let args = Cli::parse();
    debug!(?args);

    // Run the migrations synchronously before creating the pool or launching
    // the server
    let (ran, new_version) =
        db::run_migrations(&args.sqlite_connection_string, env!("CARGO_PKG_VERSION"))?;
    info!("Ran {ran} db migrations");
    if let Some(version) = new_version {
        info!("Service version is now {version}");
    }

    // Create a database pool to add into the app state
    let pool = Config::new(args.sqlite_connection_string.clone())
        .builder(Runtime::Tokio1)?
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
        .build()?;

    let socket = SocketAddr::new(IpAddr::from_str(&args.bind_addr)?, args.port);

    let listener = TcpListener::bind(socket).await?;
    debug!("listening on {}", listener.local_addr()?);

    let state = AppState {
        pool,
        args: Arc::new(args),
        rooms: CallRooms::default(),
        clients: Clients::default(),
    };

    axum::serve(
        listener,
        routes::router(state)?.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
