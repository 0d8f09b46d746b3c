use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Time zone in which "today" and publish dates are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceZone {
    /// The zone of the host running the service.
    #[default]
    Local,
    Named(Tz),
}

impl ReferenceZone {
    /// Wall-clock reading of `instant` in this zone.
    pub fn wall_clock(self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => instant.with_timezone(&Local).naive_local(),
            Self::Named(tz) => instant.with_timezone(&tz).naive_local(),
        }
    }

    /// Calendar date of `instant` in this zone.
    pub fn date_of(self, instant: DateTime<Utc>) -> NaiveDate {
        self.wall_clock(instant).date()
    }
}

impl FromStr for ReferenceZone {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        trimmed
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|err| format!("unknown time zone `{trimmed}`: {err}"))
    }
}

impl fmt::Display for ReferenceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_local_and_iana_names() {
        assert_eq!("local".parse::<ReferenceZone>(), Ok(ReferenceZone::Local));
        assert_eq!(" Local ".parse::<ReferenceZone>(), Ok(ReferenceZone::Local));
        assert_eq!(
            "Asia/Tokyo".parse::<ReferenceZone>(),
            Ok(ReferenceZone::Named(chrono_tz::Asia::Tokyo))
        );
        assert!("Mars/Olympus".parse::<ReferenceZone>().is_err());
    }

    #[test]
    fn date_of_follows_the_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 20, 30, 0).unwrap();

        let tokyo = ReferenceZone::Named(chrono_tz::Asia::Tokyo);
        let utc = ReferenceZone::Named(chrono_tz::UTC);

        assert_eq!(
            tokyo.date_of(instant),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(
            utc.date_of(instant),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
    }

    #[test]
    fn display_round_trips_names() {
        assert_eq!(ReferenceZone::Local.to_string(), "local");
        assert_eq!(
            ReferenceZone::Named(chrono_tz::Europe::Berlin).to_string(),
            "Europe/Berlin"
        );
    }
}
