//! Blog post records as stored in the content file and as served to clients.
//!
//! The content file is maintained by hand, so any field may be missing or left blank. Reading
//! a record never fails: blank fields are replaced with the values in [`POST_DEFAULTS`] and
//! everything else is passed through untouched, including values that are not strings.

use serde::Serialize;
use serde_json::{Map, Value};

/// Field names in the order they appear in served records.
pub const FIELD_NAMES: [&str; 12] = [
    "title",
    "metaTitle",
    "metaDescription",
    "category",
    "categoryName",
    "slug",
    "h1",
    "description",
    "postImageSrc",
    "postImageAlt",
    "publishedAt",
    "body",
];

/// Fallback values substituted for blank fields.
#[derive(Debug, Clone, Copy)]
pub struct PostDefaults {
    pub title: &'static str,
    pub meta_title: &'static str,
    pub meta_description: &'static str,
    pub category: &'static str,
    pub category_name: &'static str,
    pub slug_prefix: &'static str,
    pub h1: &'static str,
    pub description: &'static str,
    pub post_image_src: &'static str,
    pub post_image_alt: &'static str,
    pub published_at: &'static str,
    pub body: &'static str,
}

impl PostDefaults {
    /// Placeholder slug for the record at zero-based `index` in the source array.
    pub fn slug(&self, index: usize) -> String {
        format!("{}{}", self.slug_prefix, index + 1)
    }
}

pub const POST_DEFAULTS: PostDefaults = PostDefaults {
    title: "DEFAULT: Dumpster Rental Tips",
    meta_title: "DEFAULT: Dumpster Rental Information",
    meta_description: "DEFAULT: Learn about dumpster rental in [location].",
    category: "DEFAULT: general",
    category_name: "DEFAULT: General",
    slug_prefix: "DEFAULT: blog-post-",
    h1: "DEFAULT: Dumpster Rental Blog Post",
    description: "DEFAULT: Helpful information about dumpster rental.",
    post_image_src: "https://ik.imagekit.io/h7rza8886p/Default1.jpg?updatedAt=1757319001930",
    post_image_alt: "DEFAULT: blog post image",
    published_at: "DEFAULT: 2025-01-01",
    body: "DEFAULT: <p>Blog content about dumpster rental services.</p>",
};

/// Returns `true` when a field should be replaced by its default.
///
/// A field is blank when it is absent, `null`, an empty string, an empty array or an empty
/// object. Whitespace-only strings, `0` and `false` are values and are kept.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_) | Value::Number(_)) => false,
    }
}

/// A record exactly as found in the content file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBlogPost {
    fields: Map<String, Value>,
}

impl RawBlogPost {
    /// Wrap one element of the content array. Elements that are not objects carry no fields.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Produce the served form of this record, using `index` for the placeholder slug.
    pub fn normalize(&self, index: usize) -> BlogPost {
        self.normalize_with(&POST_DEFAULTS, index)
    }

    pub fn normalize_with(&self, defaults: &PostDefaults, index: usize) -> BlogPost {
        let pick = |name: &str, fallback: &str| self.value_or(name, || fallback.to_owned());

        BlogPost {
            title: pick("title", defaults.title),
            meta_title: pick("metaTitle", defaults.meta_title),
            meta_description: pick("metaDescription", defaults.meta_description),
            category: pick("category", defaults.category),
            category_name: pick("categoryName", defaults.category_name),
            slug: self.value_or("slug", || defaults.slug(index)),
            h1: pick("h1", defaults.h1),
            description: pick("description", defaults.description),
            post_image_src: pick("postImageSrc", defaults.post_image_src),
            post_image_alt: pick("postImageAlt", defaults.post_image_alt),
            published_at: pick("publishedAt", defaults.published_at),
            body: pick("body", defaults.body),
        }
    }

    fn value_or(&self, name: &str, fallback: impl FnOnce() -> String) -> Value {
        let value = self.field(name);
        if is_blank(value) {
            return Value::String(fallback());
        }
        value.cloned().unwrap_or(Value::Null)
    }
}

impl From<Value> for RawBlogPost {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// A record with every field populated, as returned by `GET /api/blogs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: Value,
    pub meta_title: Value,
    pub meta_description: Value,
    pub category: Value,
    pub category_name: Value,
    pub slug: Value,
    pub h1: Value,
    pub description: Value,
    pub post_image_src: Value,
    pub post_image_alt: Value,
    pub published_at: Value,
    pub body: Value,
}

/// Normalize a whole content array, preserving source order.
pub fn normalize_all(records: &[RawBlogPost]) -> Vec<BlogPost> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| record.normalize(index))
        .collect()
}
