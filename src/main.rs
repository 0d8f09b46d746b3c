use std::{process, sync::Arc};

use blogfeed::{
    application::{
        blogs::{BlogFeedService, SystemClock},
        error::AppError,
    },
    config,
    infra::{
        content::JsonFileSource,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(|err| {
        AppError::from(InfraError::configuration(format!(
            "failed to load configuration: {err}"
        )))
    })?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Check(args) => run_check(settings, args).await,
    }
}

fn build_feed_service(settings: &config::Settings) -> Arc<BlogFeedService> {
    let source = Arc::new(JsonFileSource::new(settings.content.path.clone()));
    Arc::new(BlogFeedService::new(
        source,
        Arc::new(SystemClock),
        settings.content.timezone,
    ))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let blogs = build_feed_service(&settings);
    if !settings.content.path.is_file() {
        warn!(
            target = "blogfeed::serve",
            path = %settings.content.path.display(),
            "blog content file not found; requests will fail until it exists"
        );
    }

    let router = http::build_router(HttpState { blogs });
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "blogfeed::serve",
        addr = %settings.server.addr,
        content = %settings.content.path.display(),
        timezone = %settings.content.timezone,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "blogfeed::serve", "shut down");
    Ok(())
}

async fn run_check(settings: config::Settings, args: config::CheckArgs) -> Result<(), AppError> {
    let blogs = build_feed_service(&settings);
    let today = args.as_of.unwrap_or_else(|| blogs.today());

    info!(
        target = "blogfeed::check",
        path = %settings.content.path.display(),
        today = %today,
        timezone = %blogs.zone(),
        "checking blog content"
    );

    let report = match blogs.inspect_on(today).await {
        Ok(report) => report,
        Err(err) => {
            warn!(
                target = "blogfeed::check",
                kind = err.kind(),
                "blog content could not be loaded"
            );
            print_json(&http::error_body(&err))?;
            return Err(AppError::from(err));
        }
    };

    info!(
        target = "blogfeed::check",
        records = report.total_records,
        published = report.feed.total(),
        scheduled = report.scheduled,
        undated = report.undated,
        "content checked"
    );

    let (_, body) = http::feed_body(&report.feed);
    print_json(&body)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to render output: {err}")))?;
    println!("{out}");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target = "blogfeed::serve", "shutdown signal received");
}
