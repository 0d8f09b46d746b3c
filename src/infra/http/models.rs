use serde::Serialize;

use crate::domain::blog::BlogPost;

pub const NO_PUBLISHED_BLOGS: &str = "No published blogs found for the current date";
pub const ERROR_READING_BLOGS: &str = "Error reading blogs";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListBody<'a> {
    pub blogs: &'a [BlogPost],
    pub current_date: String,
    pub total_blogs: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoBlogsBody {
    pub message: &'static str,
    pub current_date: String,
}

/// Body of a successful lookup: the listing, or the empty-feed notice.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FeedBody<'a> {
    Listed(BlogListBody<'a>),
    Empty(NoBlogsBody),
}

#[derive(Debug, Serialize)]
pub struct BlogErrorBody {
    pub message: &'static str,
    pub error: String,
}
