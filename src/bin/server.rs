use std::{
    env,
    fs::OpenOptions,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_extra::extract::cookie::Key;
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use management_systems::{App, AppState, create_cookie_key, graceful_shutdown, logging_middleware};

/// Serve one of the management system web apps.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The app to serve.
    #[arg(value_enum)]
    app: App,

    /// File path to the application SQLite database. Defaults to "<app>.db",
    /// or an in-memory database for apps that store nothing.
    #[arg(long)]
    db_path: Option<String>,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The address to listen on.
    #[arg(short, long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    address: IpAddr,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();
    let addr = SocketAddr::new(args.address, args.port);

    let cookie_key = if args.app.has_log_in() {
        let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");
        create_cookie_key(&secret)
    } else {
        Key::generate()
    };

    let db_path = args.db_path.as_deref();
    let connection = args
        .app
        .open_db(db_path)
        .unwrap_or_else(|error| panic!("Could not open database {db_path:?}: {error}"));
    let state = AppState::new(connection, cookie_key, args.app)
        .unwrap_or_else(|error| panic!("Could not initialize database {db_path:?}: {error}"));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        args.app
            .build_router(state)
            .layer(middleware::from_fn(logging_middleware)),
    );

    tracing::info!("{:?} server listening on http://{}", args.app, addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped with an error");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    // RUST_LOG, when set, narrows what both layers record.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but the handlers
        // already log their errors.
        .on_failure(());

    router.layer(tracing_layer)
}
