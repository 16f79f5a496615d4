//! # Till-Local Time
//!
//! Instants are stored in UTC. Business dates, hourly buckets and
//! time-of-day filters are read in the deployment's IANA time zone, so
//! they follow daylight saving.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{CoreError, CoreResult};

pub use chrono_tz::Tz;

/// Parses an IANA zone name such as `Europe/Dublin` or `UTC`.
///
/// ## Example
/// ```rust
/// use tally_core::clock::parse_time_zone;
///
/// assert_eq!(parse_time_zone("Europe/Dublin").unwrap().name(), "Europe/Dublin");
/// assert!(parse_time_zone("+01:00").is_err());
/// ```
pub fn parse_time_zone(name: &str) -> CoreResult<Tz> {
    let name = name.trim();
    name.parse::<Tz>()
        .map_err(|_| CoreError::InvalidTimeZone(name.to_string()))
}

pub fn utc() -> Tz {
    Tz::UTC
}

/// The business date `instant` falls on in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// The instant a wall-clock time on `date` denotes in `tz`.
///
/// In the autumn fold the earlier reading wins when `earliest` is set and
/// the later one otherwise. A time skipped by the spring gap is read one
/// hour on, which is the instant the clock jumped past it.
pub fn local_instant(
    date: NaiveDate,
    time: NaiveTime,
    tz: Tz,
    earliest: bool,
) -> Option<DateTime<Utc>> {
    let wall = date.and_time(time);
    let local = match tz.from_local_datetime(&wall) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(early, late) => {
            if earliest {
                early
            } else {
                late
            }
        }
        LocalResult::None => tz
            .from_local_datetime(&(wall + Duration::hours(1)))
            .earliest()?,
    };
    Some(local.with_timezone(&Utc))
}
