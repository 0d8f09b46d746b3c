use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::application::repos::{BlogSource, ContentError};
use crate::domain::blog::{self, BlogPost};
use crate::domain::publish::{GateOutcome, PublishGate};
use crate::util::timezone::ReferenceZone;

pub const CURRENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Posts visible on `current_date`, newest first.
#[derive(Debug, Clone)]
pub struct PublishedFeed {
    pub blogs: Vec<BlogPost>,
    pub current_date: NaiveDate,
}

impl PublishedFeed {
    pub fn is_empty(&self) -> bool {
        self.blogs.is_empty()
    }

    pub fn total(&self) -> usize {
        self.blogs.len()
    }

    pub fn current_date_label(&self) -> String {
        self.current_date.format(CURRENT_DATE_FORMAT).to_string()
    }
}

/// A feed together with counts of the records it left out.
#[derive(Debug, Clone)]
pub struct FeedReport {
    pub feed: PublishedFeed,
    pub total_records: usize,
    pub scheduled: usize,
    pub undated: usize,
}

#[derive(Clone)]
pub struct BlogFeedService {
    source: Arc<dyn BlogSource>,
    clock: Arc<dyn Clock>,
    zone: ReferenceZone,
}

impl BlogFeedService {
    pub fn new(source: Arc<dyn BlogSource>, clock: Arc<dyn Clock>, zone: ReferenceZone) -> Self {
        Self {
            source,
            clock,
            zone,
        }
    }

    pub fn zone(&self) -> ReferenceZone {
        self.zone
    }

    /// The reference day in the configured zone.
    pub fn today(&self) -> NaiveDate {
        self.zone.date_of(self.clock.now())
    }

    /// Load, normalize and gate the posts for today.
    pub async fn published(&self) -> Result<PublishedFeed, ContentError> {
        self.published_on(self.today()).await
    }

    pub async fn published_on(&self, today: NaiveDate) -> Result<PublishedFeed, ContentError> {
        self.inspect_on(today).await.map(|report| report.feed)
    }

    /// Like [`Self::published_on`], also counting the records that were held back.
    pub async fn inspect_on(&self, today: NaiveDate) -> Result<FeedReport, ContentError> {
        let records = self.source.load().await?;
        let posts = blog::normalize_all(&records);
        let gate = PublishGate::new(today, self.zone);

        let GateOutcome {
            published: blogs,
            scheduled,
            undated,
        } = gate.partition(posts);
        debug!(
            target = "blogfeed::feed",
            today = %today,
            zone = %self.zone,
            records = records.len(),
            published = blogs.len(),
            scheduled,
            undated,
            "assembled blog feed"
        );

        Ok(FeedReport {
            feed: PublishedFeed {
                blogs,
                current_date: today,
            },
            total_records: records.len(),
            scheduled,
            undated,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::blog::RawBlogPost;

    struct StaticSource(Vec<Value>);

    #[async_trait]
    impl BlogSource for StaticSource {
        async fn load(&self) -> Result<Vec<RawBlogPost>, ContentError> {
            Ok(self.0.iter().cloned().map(RawBlogPost::from_value).collect())
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl BlogSource for BrokenSource {
        async fn load(&self) -> Result<Vec<RawBlogPost>, ContentError> {
            Err(ContentError::NotAList { found: "an object" })
        }
    }

    fn service(records: Vec<Value>, now: DateTime<Utc>) -> BlogFeedService {
        BlogFeedService::new(
            Arc::new(StaticSource(records)),
            Arc::new(FixedClock(now)),
            ReferenceZone::Named(chrono_tz::UTC),
        )
    }

    #[tokio::test]
    async fn publishes_past_posts_and_defaults_the_rest() {
        let now = Utc.with_ymd_and_hms(2030, 6, 15, 9, 0, 0).unwrap();
        let service = service(
            vec![
                json!({ "publishedAt": "2024-01-01", "title": "A" }),
                json!({ "publishedAt": "2099-01-01", "title": "B" }),
            ],
            now,
        );

        let feed = service.published().await.expect("feed");

        assert_eq!(feed.total(), 1);
        assert_eq!(feed.current_date_label(), "2030-06-15");
        let post = &feed.blogs[0];
        assert_eq!(post.title, json!("A"));
        assert_eq!(post.slug, json!("DEFAULT: blog-post-1"));
        assert_eq!(post.category, json!("DEFAULT: general"));
    }

    #[tokio::test]
    async fn today_follows_the_configured_zone() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
        let service = BlogFeedService::new(
            Arc::new(StaticSource(vec![json!({ "publishedAt": "2025-01-01" })])),
            Arc::new(FixedClock(now)),
            ReferenceZone::Named(chrono_tz::Asia::Tokyo),
        );

        assert_eq!(service.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(service.published().await.expect("feed").total(), 1);
    }

    #[tokio::test]
    async fn inspect_counts_held_back_records() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let service = service(
            vec![
                json!({ "publishedAt": "2024-05-01" }),
                json!({ "publishedAt": "2024-07-01" }),
                json!({ "publishedAt": "someday" }),
                json!({}),
                json!({ "publishedAt": "2024-01-15" }),
            ],
            now,
        );

        let report = service
            .inspect_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .await
            .expect("report");

        assert_eq!(report.total_records, 5);
        assert_eq!(report.feed.total(), 2);
        assert_eq!(report.scheduled, 2);
        assert_eq!(report.undated, 1);
    }

    #[tokio::test]
    async fn an_earlier_date_can_be_previewed() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let service = service(vec![json!({ "publishedAt": "2024-05-01" })], now);

        let feed = service
            .published_on(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap())
            .await
            .expect("feed");

        assert!(feed.is_empty());
        assert_eq!(feed.current_date_label(), "2024-04-30");
    }

    #[tokio::test]
    async fn source_errors_propagate() {
        let service = BlogFeedService::new(
            Arc::new(BrokenSource),
            Arc::new(SystemClock),
            ReferenceZone::Local,
        );

        let err = service.published().await.expect_err("should fail");
        assert_eq!(err.kind(), "not_a_list");
    }
}
