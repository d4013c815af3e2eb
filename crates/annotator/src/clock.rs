//! Wall clock used for annotation timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use std::cell::Cell;

thread_local! {
    static FIXED_NOW: Cell<Option<DateTime<Utc>>> = const { Cell::new(None) };
}

/// Runs `f` with the clock pinned to `now` on the current thread. `None` uses the system clock.
pub fn with_fixed_now<R>(now: Option<DateTime<Utc>>, f: impl FnOnce() -> R) -> R {
    FIXED_NOW.with(|cell| {
        let prev = cell.replace(now);
        let out = f();
        cell.set(prev);
        out
    })
}

pub fn now() -> DateTime<Utc> {
    FIXED_NOW
        .with(|cell| cell.get())
        .unwrap_or_else(Utc::now)
}

/// ISO-8601 UTC timestamp, `Z` suffixed (`2024-01-01T12:00:00.000Z` at millisecond precision).
pub fn timestamp(precision: SecondsFormat) -> String {
    now().to_rfc3339_opts(precision, true)
}

/// Maps a configured precision name onto chrono's formats. Unknown names fall back to
/// milliseconds.
pub fn precision_from_name(name: &str) -> SecondsFormat {
    match name {
        "secs" | "seconds" => SecondsFormat::Secs,
        "micros" => SecondsFormat::Micros,
        "nanos" => SecondsFormat::Nanos,
        _ => SecondsFormat::Millis,
    }
}
