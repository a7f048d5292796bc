//! Runtime configuration.
//!
//! Values come from an optional YAML file named by `GMTABLE_CONFIG`, then
//! individual environment variables override the file:
//!
//! | Variable                   | Meaning                                   |
//! |----------------------------|-------------------------------------------|
//! | `GMTABLE_WATCH`            | comma separated `tag:id` list             |
//! | `GMTABLE_FEED`             | feed path, `-` for standard input         |
//! | `GMTABLE_CHANNEL_CAPACITY` | bound of the worker-to-hub channel        |

use std::path::{Path, PathBuf};
use std::str::FromStr;

use gmtable_core::identity::Id;
use gmtable_core::record::RecordTag;
use serde::Deserialize;

use crate::error::AppError;

const CONFIG_VAR: &str = "GMTABLE_CONFIG";
const WATCH_VAR: &str = "GMTABLE_WATCH";
const FEED_VAR: &str = "GMTABLE_FEED";
const CHANNEL_CAPACITY_VAR: &str = "GMTABLE_CHANNEL_CAPACITY";

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A `(tag, id)` pair to watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WatchTarget {
    /// Record tag.
    pub tag: RecordTag,
    /// Record id.
    pub id: Id,
}

impl FromStr for WatchTarget {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, id) = s
            .split_once(':')
            .ok_or_else(|| AppError::Config(format!("watch target must be tag:id, got {s:?}")))?;
        let tag = tag.trim().parse::<RecordTag>()?;
        let id = id
            .trim()
            .parse::<Id>()
            .map_err(|e| AppError::Config(format!("invalid id in watch target {s:?}: {e}")))?;
        Ok(Self { tag, id })
    }
}

/// Where records are read from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum FeedSource {
    /// Standard input.
    #[default]
    Stdin,
    /// A newline-delimited JSON file.
    File(PathBuf),
}

impl From<String> for FeedSource {
    fn from(value: String) -> Self {
        if value == "-" {
            FeedSource::Stdin
        } else {
            FeedSource::File(PathBuf::from(value))
        }
    }
}

/// Bootstrap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Pairs to attach logging watchers to.
    pub watch: Vec<WatchTarget>,
    /// Record feed.
    pub feed: FeedSource,
    /// Bound of the channel between the feed worker and the hub.
    pub channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watch: Vec::new(),
            feed: FeedSource::Stdin,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the configuration file or any variable is
    /// invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration, resolving variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for invalid values, `AppError::Io` or
    /// `AppError::Yaml` if the configuration file cannot be read or parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_VAR) {
            Some(path) => Self::from_yaml_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(list) = lookup(WATCH_VAR) {
            config.watch = parse_watch_list(&list)?;
        }
        if let Some(feed) = lookup(FEED_VAR) {
            config.feed = FeedSource::from(feed);
        }
        if let Some(capacity) = lookup(CHANNEL_CAPACITY_VAR) {
            config.channel_capacity = capacity.trim().parse().map_err(|e| {
                AppError::Config(format!("{CHANNEL_CAPACITY_VAR} must be a positive integer: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Yaml` if the text is not a valid configuration.
    pub fn from_yaml_str(text: &str) -> Result<Self, AppError> {
        Ok(serde_yaml::from_str(text)?)
    }

    fn from_yaml_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.channel_capacity == 0 {
            return Err(AppError::Config(format!(
                "{CHANNEL_CAPACITY_VAR} must be a positive integer: got 0"
            )));
        }
        Ok(())
    }
}

/// Parses a comma separated `tag:id` list. Blank entries are ignored.
///
/// # Errors
///
/// Returns `AppError` for the first malformed entry.
pub fn parse_watch_list(list: &str) -> Result<Vec<WatchTarget>, AppError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use gmtable_core::RecordError;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.feed, FeedSource::Stdin);
        assert_eq!(config.channel_capacity, 256);
    }

    #[test]
    fn test_environment_variables_populate_config() {
        // Arrange
        let lookup = lookup_from(&[
            ("GMTABLE_WATCH", "gmc:42, scene:7"),
            ("GMTABLE_FEED", "/tmp/records.jsonl"),
            ("GMTABLE_CHANNEL_CAPACITY", "16"),
        ]);

        // Act
        let config = AppConfig::from_lookup(lookup).unwrap();

        // Assert
        assert_eq!(
            config.watch,
            vec![
                WatchTarget {
                    tag: RecordTag::Gmc,
                    id: 42
                },
                WatchTarget {
                    tag: RecordTag::Scene,
                    id: 7
                },
            ]
        );
        assert_eq!(
            config.feed,
            FeedSource::File(PathBuf::from("/tmp/records.jsonl"))
        );
        assert_eq!(config.channel_capacity, 16);
    }

    #[test]
    fn test_dash_feed_means_stdin() {
        let config = AppConfig::from_lookup(lookup_from(&[("GMTABLE_FEED", "-")])).unwrap();

        assert_eq!(config.feed, FeedSource::Stdin);
    }

    #[test]
    fn test_unknown_watch_tag_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("GMTABLE_WATCH", "monster:1")]));

        match result {
            Err(AppError::Record(RecordError::UnknownTag(tag))) => assert_eq!(tag, "monster"),
            other => panic!("expected unknown tag error, got {other:?}"),
        }
    }

    #[test]
    fn test_watch_entry_without_colon_is_rejected() {
        let result = parse_watch_list("gmc42");

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_non_numeric_watch_id_is_rejected() {
        let result = parse_watch_list("gmc:forty-two");

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_blank_watch_entries_are_ignored() {
        let targets = parse_watch_list(" , act:3 ,, ").unwrap();

        assert_eq!(
            targets,
            vec![WatchTarget {
                tag: RecordTag::Act,
                id: 3
            }]
        );
    }

    #[test]
    fn test_zero_channel_capacity_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("GMTABLE_CHANNEL_CAPACITY", "0")]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_yaml_config_parses_all_fields() {
        // Arrange
        let text = "\
watch:
  - { tag: gmc, id: 42 }
  - { tag: gmcPrototype, id: 1 }
feed: ./records.jsonl
channel_capacity: 64
";

        // Act
        let config = AppConfig::from_yaml_str(text).unwrap();

        // Assert
        assert_eq!(config.watch.len(), 2);
        assert_eq!(config.watch[1].tag, RecordTag::GmcPrototype);
        assert_eq!(config.feed, FeedSource::File(PathBuf::from("./records.jsonl")));
        assert_eq!(config.channel_capacity, 64);
    }

    #[test]
    fn test_yaml_config_fills_missing_fields_with_defaults() {
        let config = AppConfig::from_yaml_str("watch: []").unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_yaml_config_rejects_unknown_fields() {
        let result = AppConfig::from_yaml_str("port: 3000");

        assert!(matches!(result, Err(AppError::Yaml(_))));
    }

    #[test]
    fn test_missing_config_file_is_an_io_error() {
        let result = AppConfig::from_lookup(lookup_from(&[(
            "GMTABLE_CONFIG",
            "/nonexistent/gmtable.yaml",
        )]));

        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
