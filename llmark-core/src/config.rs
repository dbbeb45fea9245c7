use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Write discipline for the shared storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Unsynchronized read-modify-write; concurrent writers silently lose.
    /// This is the original extension's behavior and the default.
    #[default]
    LastWriteWins,
    /// Optimistic compare-and-swap with bounded retries. Opt-in hardening;
    /// changes no semantics when only one writer exists.
    Guarded,
}

/// Top-level LLMark configuration, matching `llmark.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkConfig {
    #[serde(default)]
    pub capture: CaptureSection,
    #[serde(default)]
    pub matching: MatchSection,
    #[serde(default)]
    pub retention: RetentionSection,
    #[serde(default)]
    pub storage: StorageSection,
}

impl MarkConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration file, or defaults when the path does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::NotFound(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

/// Anchor capture parameters (visible-anchor selection).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSection {
    /// Block-level selectors scanned for anchor candidates, in priority
    /// order. `.class` entries match by class, anything else by tag.
    pub selectors: Vec<String>,
    /// Top of the visibility band, as a fraction of viewport height.
    pub band_top: f64,
    /// Bottom of the visibility band, as a fraction of viewport height.
    pub band_bottom: f64,
    /// Minimum anchor text length, in characters. Shorter blocks are noise.
    pub min_anchor_chars: usize,
    /// Cap on captured pre/post sibling context, in characters.
    pub context_chars: usize,
    /// Cap on derived bookmark titles, in characters (before the ellipsis).
    pub title_chars: usize,
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            selectors: vec![
                "p".into(),
                "li".into(),
                "h1".into(),
                "h2".into(),
                "h3".into(),
                "pre".into(),
                ".message-content".into(),
                "code".into(),
            ],
            band_top: 0.3,
            band_bottom: 0.7,
            min_anchor_chars: 20,
            context_chars: 200,
            title_chars: 50,
        }
    }
}

/// Anchor re-matching parameters (recall).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSection {
    /// Length of the stored anchor text prefix a candidate must contain.
    /// A prefix rather than the whole text, so re-rendered trailing
    /// content does not defeat the match.
    pub anchor_prefix_chars: usize,
    /// Length of the pre/post context prefixes used for score bonuses.
    pub context_prefix_chars: usize,
    /// Duration of the cosmetic highlight pulse on a successful match.
    pub highlight_ms: u64,
}

impl Default for MatchSection {
    fn default() -> Self {
        Self {
            anchor_prefix_chars: 80,
            context_prefix_chars: 40,
            highlight_ms: 1500,
        }
    }
}

/// Bookmark retention parameters (the sweeper).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSection {
    /// Bookmarks strictly older than this are evicted.
    pub ttl_days: i64,
    /// Suggested sweep period for the scheduling collaborator.
    pub sweep_minutes: u64,
}

impl Default for RetentionSection {
    fn default() -> Self {
        Self {
            ttl_days: 14,
            sweep_minutes: 60,
        }
    }
}

impl RetentionSection {
    pub fn ttl_ms(&self) -> i64 {
        self.ttl_days * 24 * 60 * 60 * 1000
    }
}

/// Shared-store parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// The single storage key holding every bookmark across all URLs.
    /// Must stay `llmarks` to interoperate with existing stores.
    pub key: String,
    #[serde(default)]
    pub write_policy: WritePolicy,
    /// Compare-and-swap attempts under [`WritePolicy::Guarded`].
    pub cas_retries: u32,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            key: "llmarks".into(),
            write_policy: WritePolicy::LastWriteWins,
            cas_retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_shipped_constants() {
        let cfg = MarkConfig::default();
        assert!((cfg.capture.band_top - 0.3).abs() < f64::EPSILON);
        assert!((cfg.capture.band_bottom - 0.7).abs() < f64::EPSILON);
        assert_eq!(cfg.capture.min_anchor_chars, 20);
        assert_eq!(cfg.capture.context_chars, 200);
        assert_eq!(cfg.matching.anchor_prefix_chars, 80);
        assert_eq!(cfg.matching.context_prefix_chars, 40);
        assert_eq!(cfg.retention.ttl_days, 14);
        assert_eq!(cfg.retention.ttl_ms(), 14 * 24 * 60 * 60 * 1000);
        assert_eq!(cfg.storage.key, "llmarks");
        assert_eq!(cfg.storage.write_policy, WritePolicy::LastWriteWins);
    }

    #[test]
    fn partial_toml_overrides_merge_with_defaults() {
        let cfg = MarkConfig::from_toml_str(
            r#"
            [retention]
            ttl_days = 7
            sweep_minutes = 30

            [storage]
            key = "llmarks"
            write_policy = "guarded"
            cas_retries = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.retention.ttl_days, 7);
        assert_eq!(cfg.storage.write_policy, WritePolicy::Guarded);
        assert_eq!(cfg.storage.cas_retries, 5);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.capture.min_anchor_chars, 20);
    }

    #[test]
    fn garbage_toml_is_a_parse_error() {
        let err = MarkConfig::from_toml_str("not = [toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
