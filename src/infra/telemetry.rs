use std::sync::Once;

use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const BLOG_REQUESTS_TOTAL: &str = "blogfeed_blogs_requests_total";
pub const BLOG_LOAD_MS: &str = "blogfeed_blogs_load_ms";
pub const BLOGS_PUBLISHED: &str = "blogfeed_blogs_published";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Logs go to stderr so that `check` output on stdout stays machine-readable.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_writer(std::io::stderr)
            .compact()
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            BLOG_REQUESTS_TOTAL,
            Unit::Count,
            "Blog list requests by outcome (ok, empty, error)."
        );
        describe_histogram!(
            BLOG_LOAD_MS,
            Unit::Milliseconds,
            "Time spent loading and filtering the blog content file."
        );
        describe_gauge!(
            BLOGS_PUBLISHED,
            Unit::Count,
            "Number of posts returned by the most recent successful blog list."
        );
    });
}
