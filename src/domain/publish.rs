//! The publish gate: which posts are due on a given day, and in what order they are listed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;

use crate::domain::blog::BlogPost;
use crate::util::timezone::ReferenceZone;

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %I:%M %p",
];
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
];

/// Label carried by placeholder values; the date after it still counts.
const DEFAULT_LABEL: &str = "DEFAULT:";

/// Read a `publishedAt` value as a wall-clock time in `zone`.
///
/// Strings carrying an explicit offset are converted into the zone; plain dates and naive
/// date-times are taken as already local. Numbers are milliseconds since the Unix epoch.
/// A leading `DEFAULT:` label is skipped, so the placeholder `DEFAULT: 2025-01-01` reads as
/// 2025-01-01. Returns `None` for anything that cannot be read as a date.
pub fn parse_published_at(value: &Value, zone: ReferenceZone) -> Option<NaiveDateTime> {
    match value {
        Value::String(text) => parse_text(text.trim(), zone),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|millis| millis.is_finite())
                    .map(|millis| millis.trunc() as i64)
            })
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|instant| zone.wall_clock(instant)),
        _ => None,
    }
}

fn parse_text(text: &str, zone: ReferenceZone) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    parse_dated(text, zone).or_else(|| {
        let rest = text.strip_prefix(DEFAULT_LABEL)?.trim_start();
        parse_dated(rest, zone)
    })
}

fn parse_dated(text: &str, zone: ReferenceZone) -> Option<NaiveDateTime> {
    let with_offset = DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
        .or_else(|| {
            OFFSET_DATETIME_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(text, format).ok())
        });
    if let Some(instant) = with_offset {
        return Some(zone.wall_clock(instant.with_timezone(&Utc)));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Where a post stands relative to the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Published(NaiveDateTime),
    Scheduled(NaiveDateTime),
    /// `publishedAt` could not be read as a date; such posts are never listed.
    Undated,
}

/// Decides visibility for a single reference day.
#[derive(Debug, Clone, Copy)]
pub struct PublishGate {
    today: NaiveDate,
    zone: ReferenceZone,
}

impl PublishGate {
    pub fn new(today: NaiveDate, zone: ReferenceZone) -> Self {
        Self { today, zone }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn state(&self, post: &BlogPost) -> PublishState {
        match parse_published_at(&post.published_at, self.zone) {
            Some(at) if at.date() <= self.today => PublishState::Published(at),
            Some(at) => PublishState::Scheduled(at),
            None => PublishState::Undated,
        }
    }

    /// Keep the posts that are due and order them newest first.
    ///
    /// Posts sharing a publish time keep their relative order.
    pub fn apply(&self, posts: Vec<BlogPost>) -> Vec<BlogPost> {
        self.partition(posts).published
    }

    /// Like [`Self::apply`], also counting the posts that were held back.
    pub fn partition(&self, posts: Vec<BlogPost>) -> GateOutcome {
        let mut due: Vec<(NaiveDateTime, BlogPost)> = Vec::with_capacity(posts.len());
        let (mut scheduled, mut undated) = (0, 0);
        for post in posts {
            match self.state(&post) {
                PublishState::Published(at) => due.push((at, post)),
                PublishState::Scheduled(_) => scheduled += 1,
                PublishState::Undated => undated += 1,
            }
        }

        due.sort_by(|(left, _), (right, _)| right.cmp(left));
        GateOutcome {
            published: due.into_iter().map(|(_, post)| post).collect(),
            scheduled,
            undated,
        }
    }
}

/// Result of running a batch of posts through a [`PublishGate`].
#[derive(Debug, Clone, Default)]
pub struct GateOutcome {
    pub published: Vec<BlogPost>,
    pub scheduled: usize,
    pub undated: usize,
}
