//! # Query Overlay Resolver
//!
//! Builds a request-scoped [`Config`] from the shared base configuration and
//! two sources of overrides:
//!
//! 1. the request's own query string, and
//! 2. the query string of the `Referer` URL.
//!
//! The slideshow page fetches `/image` and `/clock` without repeating its own
//! query string; the browser's `Referer` carries it instead. When both sources
//! name the same parameter, the request's own value wins.
//!
//! The base configuration is only ever read. [`apply_overrides`] clones it
//! and mutates the clone.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::KioskError;

/// Override parameters for one request, keyed by lowercase parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    values: BTreeMap<String, Vec<String>>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from query pairs. Repeated keys keep every value in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (key, value) in pairs {
            set.push(key.as_ref(), value);
        }
        set
    }

    /// Append a value for `key`.
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_ascii_lowercase())
    }

    /// First value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Add every key of `other` that this set does not already have.
    fn fill_from(&mut self, other: OverrideSet) {
        for (key, values) in other.values {
            self.values.entry(key).or_insert(values);
        }
    }
}

/// Combine request query parameters with the referer's query parameters.
///
/// Always returns a usable set. If the referer is present but cannot be
/// parsed, the set holds only the request's parameters and the parse error is
/// returned alongside it for the caller to log.
pub fn resolve_overrides(
    request_query: &[(String, String)],
    referer: Option<&str>,
) -> (OverrideSet, Option<KioskError>) {
    let mut overrides = OverrideSet::from_pairs(request_query.iter().map(|(k, v)| (k, v.clone())));

    let Some(referer) = referer.filter(|r| !r.trim().is_empty()) else {
        return (overrides, None);
    };

    match referer_query(referer) {
        Ok(from_referer) => {
            overrides.fill_from(from_referer);
            (overrides, None)
        }
        Err(e) => (overrides, Some(e)),
    }
}

fn referer_query(referer: &str) -> Result<OverrideSet, KioskError> {
    let url = reqwest::Url::parse(referer)
        .map_err(|e| KioskError::Referer(format!("Invalid referer '{}': {}", referer, e)))?;
    Ok(OverrideSet::from_pairs(
        url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())),
    ))
}

/// Produce an instance configuration: a copy of `base` with every recognised
/// override applied.
///
/// Unknown keys are ignored. Values that cannot be coerced to the field's
/// type leave the base value in place.
pub fn apply_overrides(base: &Config, overrides: &OverrideSet) -> Config {
    let mut config = base.clone();

    for (key, values) in overrides.iter() {
        let Some(value) = values.first().map(|v| v.trim()) else {
            continue;
        };

        let applied = match key {
            "album" => set_string(&mut config.album, value),
            "person" => set_string(&mut config.person, value),
            "refresh" => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config.refresh = secs;
                    true
                }
                _ => false,
            },
            "backgroundblur" => set_bool(&mut config.background_blur, value),
            "showimagedate" => set_bool(&mut config.show_image_date, value),
            "showimagetime" => set_bool(&mut config.show_image_time, value),
            "imagedateformat" => set_string(&mut config.image_date_format, value),
            "imagetimeformat" => set_string(&mut config.image_time_format, value),
            "showdate" => set_bool(&mut config.show_date, value),
            "showtime" => set_bool(&mut config.show_time, value),
            "dateformat" => set_string(&mut config.date_format, value),
            "timeformat" => set_string(&mut config.time_format, value),
            _ => continue,
        };

        if !applied {
            debug!(key, value, "ignoring unparseable override");
        }
    }

    config
}

/// Build the instance configuration for a request, logging (but otherwise
/// ignoring) a malformed referer.
pub fn instance_config(
    base: &Config,
    request_query: &[(String, String)],
    referer: Option<&str>,
    request_id: &str,
) -> Config {
    let (overrides, referer_err) = resolve_overrides(request_query, referer);
    if let Some(e) = referer_err {
        warn!(request_id, error = %e, "err combining queries");
    }

    if overrides.is_empty() {
        base.clone()
    } else {
        apply_overrides(base, &overrides)
    }
}

/// Parse a boolean query value.
///
/// Accepts `1/t/true/yes/on` and `0/f/false/no/off`, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn set_bool(field: &mut bool, value: &str) -> bool {
    match parse_bool(value) {
        Some(b) => {
            *field = b;
            true
        }
        None => false,
    }
}

fn set_string(field: &mut String, value: &str) -> bool {
    *field = value.to_string();
    true
}
