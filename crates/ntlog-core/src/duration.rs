//! Human duration strings ("7d", "2w", "36 hours") converted to a `Duration`
//!
//! A unit-less number is read as days, which keeps `--keep-for 7` meaning a week.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use crate::bail_invalid;
use crate::error::{NtlogError, Result};

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Unit spellings and their length in seconds
const UNITS: &[(&[&str], f64)] = &[
    (&["s", "sec", "secs", "second", "seconds"], 1.0),
    (&["m", "min", "mins", "minute", "minutes"], MINUTE),
    (&["h", "hr", "hrs", "hour", "hours"], HOUR),
    (&["d", "day", "days"], DAY),
    (&["w", "W", "week", "weeks"], 7.0 * DAY),
    (&["M", "month", "months"], 30.0 * DAY),
    (&["y", "Y", "year", "years"], 365.0 * DAY),
];

/// Unit applied to bare numbers
const DEFAULT_UNIT: &str = "d";

static UNIT_TABLE: OnceLock<HashMap<&'static str, f64>> = OnceLock::new();
static DURATION_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn unit_table() -> &'static HashMap<&'static str, f64> {
    UNIT_TABLE.get_or_init(|| {
        UNITS
            .iter()
            .flat_map(|(names, seconds)| names.iter().map(move |name| (*name, *seconds)))
            .collect()
    })
}

fn duration_re() -> Option<&'static Regex> {
    DURATION_RE
        .get_or_init(|| {
            match Regex::new(
                r"^\s*([0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE]([-+]?[0-9]+))?\s*([A-Za-z]*)\s*$",
            ) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("Failed to compile duration regex: {}", e);
                    None
                }
            }
        })
        .as_ref()
}

/// Parse a duration string such as `7d`, `1.5 weeks` or `12h`.
pub fn parse_duration(text: &str) -> Result<Duration> {
    let Some(re) = duration_re() else {
        return Err(NtlogError::Other(
            "duration pattern is unavailable".to_string(),
        ));
    };
    let Some(caps) = re.captures(text) else {
        bail_invalid!(text, "unable to convert to seconds");
    };

    let mantissa = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let exponent = caps.get(2).map(|m| m.as_str());
    let unit = match caps.get(3).map(|m| m.as_str()) {
        Some("") | None => DEFAULT_UNIT,
        Some(unit) => unit,
    };

    let number = match exponent {
        Some(exp) => format!("{mantissa}e{exp}"),
        None => mantissa.to_string(),
    };
    let Ok(value) = number.parse::<f64>() else {
        bail_invalid!(text, "unable to convert to seconds");
    };

    let Some(scale) = unit_table().get(unit) else {
        bail_invalid!(text, format!("unable to convert to seconds: unknown unit '{unit}'"));
    };

    let seconds = value * scale;
    match Duration::try_from_secs_f64(seconds) {
        Ok(duration) => Ok(duration),
        Err(_) => bail_invalid!(text, "unable to convert to seconds: out of range"),
    }
}
