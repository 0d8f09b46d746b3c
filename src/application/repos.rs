//! Content source abstraction consumed by the feed service.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::blog::RawBlogPost;

/// Failures while obtaining the raw blog records.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read blog content from `{path}`: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("blog content is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("blog content must be a JSON array of posts, found {found}")]
    NotAList { found: &'static str },
}

impl ContentError {
    pub fn unavailable(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Unavailable {
            path: path.into(),
            source,
        }
    }

    /// Short label for the failure, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::Malformed(_) => "malformed",
            Self::NotAList { .. } => "not_a_list",
        }
    }
}

/// Supplies the raw blog records, read fresh on every call.
#[async_trait]
pub trait BlogSource: Send + Sync {
    async fn load(&self) -> Result<Vec<RawBlogPost>, ContentError>;
}
