//! promwatch demo server
//!
//! - `/`            : plain ok
//! - `/users/:id`   : templated route (`addr="/users/:id"`)
//! - `/fail`        : 400 with an error annotation
//! - `/upstream`    : simulated outbound call timed with `collect_dependency_time`
//! - `/v1/orders/:id`: contract route declaring `addr="/v1/orders/{orderId}"`
//! - `/metrics`     : exposition (configurable)

use std::net::SocketAddr;
use std::path::Path;
use std::time::{Duration, Instant};

use axum::{
    extract::{Path as UrlPath, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promwatch_core::HealthCheckResult;
use promwatch_http::{
    config::{self, MonitorConfig},
    DependencyCall, DependencyRegistrar, ErrorMessage, Monitor, MonitorOptions, OperationPath,
};

const CONFIG_PATH: &str = "promwatch.yaml";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = if Path::new(CONFIG_PATH).exists() {
        config::load_from_file(CONFIG_PATH).expect("config load failed")
    } else {
        MonitorConfig {
            version: 1,
            server: Default::default(),
            monitor: Default::default(),
        }
    };
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .expect("server.listen must be a valid SocketAddr");

    let monitor = Monitor::new().expect("monitor setup failed");

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/users/:id", get(get_user))
        .route("/fail", get(fail))
        .route("/upstream", get(upstream))
        .nest("/v1", Router::new().route("/orders/:id", get(get_order)))
        .with_state(monitor.clone());
    let app = monitor.init(app, MonitorOptions::from_config(&cfg.monitor));

    monitor.watch_dependencies_every(
        cfg.monitor.health_interval(),
        |register: DependencyRegistrar| async move {
            register.register(HealthCheckResult::up("Fake dependency 1"));
            register.register(HealthCheckResult::down("Fake dependency 2"));
        },
    );

    tracing::info!(%listen, "promwatch demo starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

async fn get_user(UrlPath(id): UrlPath<String>) -> String {
    format!("user {id}")
}

async fn get_order(UrlPath(id): UrlPath<String>) -> (OperationPath, String) {
    (OperationPath::mounted("/v1", "/orders/{orderId}"), format!("order {id}"))
}

async fn fail() -> (StatusCode, ErrorMessage, &'static str) {
    (
        StatusCode::BAD_REQUEST,
        ErrorMessage::new("missing parameter"),
        "bad request",
    )
}

async fn upstream(State(monitor): State<Monitor>) -> &'static str {
    let start = Instant::now();
    tokio::time::sleep(Duration::from_millis(25)).await;
    monitor.collect_dependency_time(
        &DependencyCall {
            name: "fake-upstream",
            kind: "http",
            status: 200,
            method: "GET",
            addr: "/status",
            error_message: "",
        },
        start,
    );
    "upstream ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
