mod blogs;
mod middleware;
pub mod models;

pub use blogs::{NO_CACHE, NO_STORE, error_body, feed_body};
pub use middleware::RequestContext;

use std::sync::Arc;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::application::blogs::BlogFeedService;

use self::middleware::{log_responses, set_request_context};

pub const BLOGS_PATH: &str = "/api/blogs";
pub const HEALTH_PATH: &str = "/_health";

#[derive(Clone)]
pub struct HttpState {
    pub blogs: Arc<BlogFeedService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route(BLOGS_PATH, get(blogs::list_blogs))
        .route(HEALTH_PATH, get(blogs::health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
