use std::time::Instant;

use axum::{
    Json,
    extract::State,
    http::{
        HeaderValue, StatusCode,
        header::{CACHE_CONTROL, PRAGMA},
    },
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};

use crate::{
    application::{blogs::PublishedFeed, error::ErrorReport, repos::ContentError},
    infra::telemetry::{BLOG_LOAD_MS, BLOG_REQUESTS_TOTAL, BLOGS_PUBLISHED},
};

use super::{
    HttpState,
    models::{
        BlogErrorBody, BlogListBody, ERROR_READING_BLOGS, FeedBody, NO_PUBLISHED_BLOGS,
        NoBlogsBody,
    },
};

pub const NO_STORE: &str = "no-store, must-revalidate";
pub const NO_CACHE: &str = "no-cache";

pub(super) async fn list_blogs(State(state): State<HttpState>) -> Response {
    let started = Instant::now();
    let result = state.blogs.published().await;
    histogram!(BLOG_LOAD_MS).record(started.elapsed().as_secs_f64() * 1000.0);

    match result {
        Ok(feed) => {
            let outcome = if feed.is_empty() { "empty" } else { "ok" };
            counter!(BLOG_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
            if !feed.is_empty() {
                gauge!(BLOGS_PUBLISHED).set(feed.total() as f64);
            }
            feed_response(&feed)
        }
        Err(err) => {
            counter!(BLOG_REQUESTS_TOTAL, "outcome" => "error").increment(1);
            content_error_response(&err)
        }
    }
}

pub(super) async fn health() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    set_no_store(&mut response);
    response
}

/// Status and body describing `feed`: 200 with the posts, or 404 when nothing is due.
pub fn feed_body(feed: &PublishedFeed) -> (StatusCode, FeedBody<'_>) {
    let current_date = feed.current_date_label();
    if feed.is_empty() {
        let body = NoBlogsBody {
            message: NO_PUBLISHED_BLOGS,
            current_date,
        };
        return (StatusCode::NOT_FOUND, FeedBody::Empty(body));
    }

    let body = BlogListBody {
        blogs: &feed.blogs,
        current_date,
        total_blogs: feed.total(),
    };
    (StatusCode::OK, FeedBody::Listed(body))
}

pub fn error_body(err: &ContentError) -> BlogErrorBody {
    BlogErrorBody {
        message: ERROR_READING_BLOGS,
        error: err.to_string(),
    }
}

fn feed_response(feed: &PublishedFeed) -> Response {
    let (status, body) = feed_body(feed);
    let mut response = (status, Json(body)).into_response();
    set_no_store(&mut response);
    response
}

fn content_error_response(err: &ContentError) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let mut response = (status, Json(error_body(err))).into_response();
    set_no_store(&mut response);
    ErrorReport::from_error("infra::http::blogs::list_blogs", status, err).attach(&mut response);
    response
}

fn set_no_store(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    headers.insert(PRAGMA, HeaderValue::from_static(NO_CACHE));
}
