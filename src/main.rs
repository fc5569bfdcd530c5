use std::sync::Arc;

use axum::Server;

use axum_rbac_todo::{
    create_app, init_logging,
    rbac::{Rbac, RolesSpec},
    AppState, Config,
};

// Entry point of the application
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_logging();

    let config = Config::from_env();

    // Load the access control rules before accepting any request
    let rbac = match RolesSpec::load(&config.roles_file)
        .await
        .and_then(Rbac::setup)
    {
        Ok(rbac) => rbac,
        Err(err) => {
            tracing::error!("cannot set up access control from {:?}: {}", config.roles_file, err);
            std::process::exit(1);
        }
    };

    let addr = match config.address() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!("invalid listen address {}:{}: {}", config.host, config.port, err);
            std::process::exit(1);
        }
    };

    let app_state = Arc::new(AppState::new(rbac));
    let app = create_app(app_state, &config.static_dir, &config.cors_origin);

    let server = match Server::try_bind(&addr) {
        Ok(builder) => builder
            .serve(app.into_make_service())
            .with_graceful_shutdown(shutdown_signal()),
        Err(err) => {
            tracing::error!("cannot bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };
    tracing::info!("listening on http://{}", addr);

    if let Err(err) = server.await {
        tracing::error!("server error: {}", err);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
