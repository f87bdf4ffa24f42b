#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every field has a default matching the shipped page, so an empty JSON
//! object (or no config at all) reproduces it exactly. Hosts may override
//! any subset.
//!
//! ```
//! use causeboard_site::config::SiteConfig;
//!
//! let config = SiteConfig::from_json(r#"{"toast_ms": 2500}"#).unwrap();
//! assert_eq!(config.toast_ms, 2500);
//! assert_eq!(config.card_stagger_ms, 80);
//! ```

use std::fmt;
use std::time::Duration;

use causeboard_core::animation::CounterTiming;
use causeboard_core::geometry::{DEFAULT_REVEAL_MARGIN_PX, VisibilityThreshold};
use serde::{Deserialize, Serialize};

/// Floating-heart animation knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlourishConfig {
    pub duration_ms: u64,
    /// Interval between animation frames.
    pub frame_ms: u64,
    /// Total upward travel in CSS pixels.
    pub rise_px: f64,
    /// Scale added at the end of the animation.
    pub scale_gain: f64,
}

impl Default for FlourishConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1200,
            frame_ms: 16,
            rise_px: 140.0,
            scale_gain: 0.2,
        }
    }
}

/// Acknowledgment texts shown after a form submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub volunteer: String,
    pub donate: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            volunteer: "🎉 Thank you for volunteering! We'll reach out soon.".to_owned(),
            donate: "💖 Thank you for your donation!".to_owned(),
        }
    }
}

/// Page configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Distance above the viewport bottom at which counters start and
    /// reveal targets latch.
    pub reveal_margin_px: f64,
    pub counter: CounterTiming,
    /// Entrance delay between consecutive cause cards.
    pub card_stagger_ms: u64,
    pub flourish: FlourishConfig,
    /// How long a toast stays up.
    pub toast_ms: u64,
    /// Delay before the preloader is hidden; `None` leaves it alone.
    pub preloader_hide_ms: Option<u64>,
    pub messages: Messages,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            reveal_margin_px: DEFAULT_REVEAL_MARGIN_PX,
            counter: CounterTiming::default(),
            card_stagger_ms: 80,
            flourish: FlourishConfig::default(),
            toast_ms: 4000,
            preloader_hide_ms: Some(2800),
            messages: Messages::default(),
        }
    }
}

/// Configuration rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON could not be decoded.
    Parse(String),
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid config json: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SiteConfig {
    /// Decode and validate a host-supplied config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(msg: &str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_owned()))
        }
        if !self.reveal_margin_px.is_finite() {
            return invalid("reveal_margin_px must be finite");
        }
        if self.counter.max_steps == 0 || self.counter.min_steps > self.counter.max_steps {
            return invalid("counter steps must satisfy 0 < min_steps <= max_steps");
        }
        if self.flourish.duration_ms == 0 || self.flourish.frame_ms == 0 {
            return invalid("flourish duration_ms and frame_ms must be positive");
        }
        if !self.flourish.rise_px.is_finite() || !self.flourish.scale_gain.is_finite() {
            return invalid("flourish rise_px and scale_gain must be finite");
        }
        if self.toast_ms == 0 {
            return invalid("toast_ms must be positive");
        }
        Ok(())
    }

    #[must_use]
    pub fn with_reveal_margin(mut self, margin_px: f64) -> Self {
        self.reveal_margin_px = margin_px;
        self
    }

    #[must_use]
    pub fn with_counter_timing(mut self, timing: CounterTiming) -> Self {
        self.counter = timing;
        self
    }

    #[must_use]
    pub fn with_card_stagger_ms(mut self, ms: u64) -> Self {
        self.card_stagger_ms = ms;
        self
    }

    #[must_use]
    pub fn with_flourish(mut self, flourish: FlourishConfig) -> Self {
        self.flourish = flourish;
        self
    }

    #[must_use]
    pub fn with_toast_ms(mut self, ms: u64) -> Self {
        self.toast_ms = ms;
        self
    }

    #[must_use]
    pub fn with_preloader_hide_ms(mut self, ms: Option<u64>) -> Self {
        self.preloader_hide_ms = ms;
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// The shared "nearly visible" test.
    #[must_use]
    pub fn threshold(&self) -> VisibilityThreshold {
        VisibilityThreshold::new(self.reveal_margin_px)
    }

    #[must_use]
    pub fn card_stagger(&self) -> Duration {
        Duration::from_millis(self.card_stagger_ms)
    }

    #[must_use]
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_the_default_page() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn nested_overrides_keep_sibling_defaults() {
        let config = SiteConfig::from_json(
            r#"{"counter": {"duration_ms": 2000}, "messages": {"donate": "thanks"}, "preloader_hide_ms": null}"#,
        )
        .unwrap();
        assert_eq!(config.counter.duration_ms, 2000);
        assert_eq!(config.counter.tick_ms, 20);
        assert_eq!(config.messages.donate, "thanks");
        assert_eq!(config.messages.volunteer, Messages::default().volunteer);
        assert_eq!(config.preloader_hide_ms, None);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SiteConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SiteConfig::from_json(r#"{"toast_ms": "soon"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cases = [
            SiteConfig::default().with_toast_ms(0),
            SiteConfig::default().with_reveal_margin(f64::NAN),
            SiteConfig::default().with_flourish(FlourishConfig {
                frame_ms: 0,
                ..FlourishConfig::default()
            }),
            SiteConfig::default().with_counter_timing(CounterTiming {
                min_steps: 70,
                ..CounterTiming::default()
            }),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn derived_values() {
        let config = SiteConfig::default().with_card_stagger_ms(50);
        assert_eq!(config.card_stagger(), Duration::from_millis(50));
        assert_eq!(config.toast_duration(), Duration::from_secs(4));
        assert!(config.threshold().is_nearly_visible(719.0, 800.0));
        assert!(!config.threshold().is_nearly_visible(720.0, 800.0));
    }
}
