//! Filesystem-backed blog content.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use crate::application::repos::{BlogSource, ContentError};
use crate::domain::blog::RawBlogPost;

/// Reads the blog catalogue from a JSON file on every load. The file is never written.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BlogSource for JsonFileSource {
    async fn load(&self) -> Result<Vec<RawBlogPost>, ContentError> {
        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|err| ContentError::unavailable(self.path.display().to_string(), err))?;
        decode_posts(&text)
    }
}

/// Decode the content document: a JSON array whose elements are post records.
pub fn decode_posts(text: &str) -> Result<Vec<RawBlogPost>, ContentError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => Ok(items.into_iter().map(RawBlogPost::from_value).collect()),
        other => Err(ContentError::NotAList {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_array_elements_in_order() {
        let posts = decode_posts(r#"[{"title":"one"},null,{"title":"two"}]"#).expect("decode");

        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].field("title"), Some(&json!("one")));
        assert_eq!(posts[1], RawBlogPost::default());
        assert_eq!(posts[2].field("title"), Some(&json!("two")));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = decode_posts("[{").expect_err("should fail");
        assert!(matches!(err, ContentError::Malformed(_)));
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn rejects_non_array_documents() {
        let err = decode_posts(r#"{"blogs": []}"#).expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "blog content must be a JSON array of posts, found an object"
        );
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = JsonFileSource::new(dir.path().join("absent.json"));

        let err = source.load().await.expect_err("should fail");
        assert_eq!(err.kind(), "unavailable");
        assert!(err.to_string().contains("absent.json"));
    }

    #[tokio::test]
    async fn reads_file_fresh_on_every_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("blogs.json");
        std::fs::write(&path, r#"[{"title":"first"}]"#).expect("write");

        let source = JsonFileSource::new(&path);
        assert_eq!(source.load().await.expect("load").len(), 1);

        std::fs::write(&path, r#"[{"title":"first"},{"title":"second"}]"#).expect("rewrite");
        assert_eq!(source.load().await.expect("load").len(), 2);
    }
}
