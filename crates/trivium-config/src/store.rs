//! The key-value store and its typed accessors.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use url::Url;

use crate::error::ConfigError;

/// A key-value configuration store.
///
/// Loaded from a line-based `KEY=value` file. Lines that are comments
/// (`#`), too short to hold a binding, or missing a key or value are
/// skipped rather than rejected, so a config file can be edited freely
/// without breaking startup.
///
/// Every typed accessor comes in three flavors, e.g. for integers:
/// [`int`](Config::int) (errors on a missing key or a bad value),
/// [`int_or`](Config::int_or) (falls back to a default), and
/// [`set_int`](Config::set_int).
///
/// # Example
///
/// ```rust
/// use trivium_config::Config;
///
/// let config = Config::parse("PORT=8080\n# comment\nNAME=trivium\n");
/// assert_eq!(config.int("PORT").unwrap(), 8080);
/// assert_eq!(config.string_or("MISSING", "fallback"), "fallback");
/// ```
#[derive(Debug, Default)]
pub struct Config {
    entries: RwLock<HashMap<String, String>>,
}

impl Config {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();

        for line in text.lines() {
            // A binding needs at least "k=v".
            if line.len() < 3 {
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
            let Some(separator) = line.find('=') else {
                continue;
            };
            // Reject keyless ("=v") and valueless ("k=") lines.
            if separator == 0 || separator == line.len() - 1 {
                continue;
            }

            entries.insert(line[..separator].to_string(), line[separator + 1..].to_string());
        }

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Loads configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Returns `true` when `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` when the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Renders the store for logging, skipping keys that contain `PASS`.
    #[must_use]
    pub fn redacted(&self) -> String {
        let entries = self.entries.read();
        let mut keys: Vec<&String> = entries.keys().filter(|k| !k.contains("PASS")).collect();
        keys.sort();

        let mut out = String::new();
        for key in keys {
            let _ = writeln!(out, "{}={}", key, entries[key]);
        }
        out
    }

    fn raw(&self, key: &str) -> Result<String, ConfigError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::unknown_key(key))
    }

    /// Returns the string value for `key`.
    pub fn string(&self, key: &str) -> Result<String, ConfigError> {
        self.raw(key)
    }

    /// Returns the string value for `key`, or `default`.
    #[must_use]
    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.raw(key).unwrap_or_else(|_| default.to_string())
    }

    /// Stores a string value.
    pub fn set_string(&self, key: &str, value: &str) {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
    }

    /// Returns the integer value for `key`.
    pub fn int(&self, key: &str) -> Result<i64, ConfigError> {
        let value = self.raw(key)?;
        value
            .parse()
            .map_err(|_| ConfigError::invalid_value(key, &value, "integer"))
    }

    /// Returns the integer value for `key`, or `default`.
    #[must_use]
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.int(key).unwrap_or(default)
    }

    /// Stores an integer value.
    pub fn set_int(&self, key: &str, value: i64) {
        self.set_string(key, &value.to_string());
    }

    /// Returns the boolean value for `key`.
    ///
    /// Accepts `true`/`false` and the synonyms `on`/`yes`/`enable` and
    /// `off`/`no`/`disable`, case-insensitively.
    pub fn bool(&self, key: &str) -> Result<bool, ConfigError> {
        let value = self.raw(key)?;
        parse_bool(&value).ok_or_else(|| ConfigError::invalid_value(key, &value, "boolean"))
    }

    /// Returns the boolean value for `key`, or `default`.
    #[must_use]
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    /// Stores a boolean value.
    pub fn set_bool(&self, key: &str, value: bool) {
        self.set_string(key, if value { "true" } else { "false" });
    }

    /// Returns the duration value for `key`.
    ///
    /// The format is an integer with an `ms`, `s`, `m`, or `h` suffix,
    /// e.g. `500ms` or `30s`.
    pub fn duration(&self, key: &str) -> Result<Duration, ConfigError> {
        let value = self.raw(key)?;
        parse_duration(&value).ok_or_else(|| ConfigError::invalid_value(key, &value, "duration"))
    }

    /// Returns the duration value for `key`, or `default`.
    #[must_use]
    pub fn duration_or(&self, key: &str, default: Duration) -> Duration {
        self.duration(key).unwrap_or(default)
    }

    /// Stores a duration value.
    pub fn set_duration(&self, key: &str, value: Duration) {
        let rendered = if value.subsec_millis() > 0 {
            format!("{}ms", value.as_millis())
        } else {
            format!("{}s", value.as_secs())
        };
        self.set_string(key, &rendered);
    }

    /// Returns the RFC 3339 timestamp value for `key`.
    pub fn time(&self, key: &str) -> Result<DateTime<Utc>, ConfigError> {
        let value = self.raw(key)?;
        DateTime::parse_from_rfc3339(&value)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| ConfigError::invalid_value(key, &value, "RFC 3339 timestamp"))
    }

    /// Returns the timestamp value for `key`, or `default`.
    #[must_use]
    pub fn time_or(&self, key: &str, default: DateTime<Utc>) -> DateTime<Utc> {
        self.time(key).unwrap_or(default)
    }

    /// Stores a timestamp value.
    pub fn set_time(&self, key: &str, value: DateTime<Utc>) {
        self.set_string(key, &value.to_rfc3339());
    }

    /// Returns the URL value for `key`.
    pub fn url(&self, key: &str) -> Result<Url, ConfigError> {
        let value = self.raw(key)?;
        Url::parse(&value).map_err(|_| ConfigError::invalid_value(key, &value, "URL"))
    }

    /// Returns the URL value for `key`, or `default`.
    #[must_use]
    pub fn url_or(&self, key: &str, default: Url) -> Url {
        self.url(key).unwrap_or(default)
    }

    /// Stores a URL value.
    pub fn set_url(&self, key: &str, value: &Url) {
        self.set_string(key, value.as_str());
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "enable" => Some(true),
        "false" | "off" | "no" | "disable" => Some(false),
        _ => None,
    }
}

fn parse_duration(value: &str) -> Option<Duration> {
    // "ms" must be tried before "s".
    if let Some(number) = value.strip_suffix("ms") {
        return number.parse().ok().map(Duration::from_millis);
    }
    if let Some(number) = value.strip_suffix('s') {
        return number.parse().ok().map(Duration::from_secs);
    }
    if let Some(number) = value.strip_suffix('m') {
        return number.parse().ok().map(|m: u64| Duration::from_secs(m * 60));
    }
    if let Some(number) = value.strip_suffix('h') {
        return number
            .parse()
            .ok()
            .map(|h: u64| Duration::from_secs(h * 3600));
    }
    None
}
