#![forbid(unsafe_code)]

//! JSON bridge between the host page and [`SiteModel`].
//!
//! The wasm surface is a thin shim over [`SiteEngine`]: every event arrives
//! as a JSON object tagged by `type`, and every frame leaves as one JSON
//! object. Keeping the engine free of `wasm-bindgen` types lets native tests
//! drive exactly what the browser drives.
//!
//! ```
//! use causeboard_site::bridge::SiteEngine;
//!
//! let mut engine = SiteEngine::new(None, None).unwrap();
//! let first = engine.init(0).unwrap();
//! assert!(first.full_repaint);
//!
//! engine.push(r#"{"type":"search","value":"water"}"#).unwrap();
//! let frame = engine.step(16).unwrap();
//! assert!(frame.rendered);
//! ```

use std::fmt;
use std::time::Duration;

use causeboard_core::catalog::{Catalog, CatalogError};
use causeboard_core::input::{ElementKey, FormKind, InputEvent, PageMount, ScrollSnapshot};
use causeboard_render::DomPatch;
use causeboard_web::HostError;
use causeboard_web::step_program::{StepProgram, StepResult};
use serde::{Deserialize, Serialize};

use crate::app::SiteModel;
use crate::config::{ConfigError, SiteConfig};

/// Event shape accepted from the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Search {
        value: String,
    },
    Category {
        value: String,
    },
    CardClick {
        /// The nearest card's `data-id`, if any.
        #[serde(default)]
        id: Option<String>,
    },
    Submit {
        form: FormKind,
    },
    Mount(PageMount),
    Scroll(ScrollSnapshot),
    Unmount {
        key: ElementKey,
    },
}

impl From<HostEvent> for InputEvent {
    fn from(event: HostEvent) -> Self {
        match event {
            HostEvent::Search { value } => Self::Search(value),
            HostEvent::Category { value } => Self::Category(value),
            HostEvent::CardClick { id } => Self::CardClick(id),
            HostEvent::Submit { form } => Self::Submit(form),
            HostEvent::Mount(mount) => Self::Mount(mount),
            HostEvent::Scroll(snapshot) => Self::Scroll(snapshot),
            HostEvent::Unmount { key } => Self::Unmount(key),
        }
    }
}

/// One step's worth of output for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub rendered: bool,
    pub frame_idx: u64,
    pub events_processed: u32,
    pub timers_fired: u32,
    /// The host should rebuild every region rather than patch.
    pub full_repaint: bool,
    pub patches: Vec<DomPatch>,
    pub logs: Vec<String>,
    /// `fnv1a64:` hash of `patches`, present when a frame was rendered.
    pub hash: Option<String>,
    /// When the host should call `step` again even without input.
    pub next_wakeup_ms: Option<u64>,
}

/// Bridge failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    Config(ConfigError),
    Catalog(CatalogError),
    Host(HostError),
    /// An event did not decode.
    Event(String),
    /// A frame did not encode.
    Encode(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Host(err) => write!(f, "{err}"),
            Self::Event(msg) => write!(f, "invalid host event: {msg}"),
            Self::Encode(msg) => write!(f, "frame encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Host(err) => Some(err),
            Self::Event(_) | Self::Encode(_) => None,
        }
    }
}

impl From<ConfigError> for BridgeError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<CatalogError> for BridgeError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<HostError> for BridgeError {
    fn from(err: HostError) -> Self {
        Self::Host(err)
    }
}

/// The page engine as seen from the host.
pub struct SiteEngine {
    program: StepProgram<SiteModel>,
}

impl fmt::Debug for SiteEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteEngine")
            .field("initialized", &self.program.is_initialized())
            .field("frame_idx", &self.program.frame_idx())
            .field("now", &self.program.now())
            .finish()
    }
}

impl SiteEngine {
    /// Build an engine. `None` selects the built-in config or catalog.
    pub fn new(config_json: Option<&str>, catalog_json: Option<&str>) -> Result<Self, BridgeError> {
        let config = match config_json {
            Some(json) => SiteConfig::from_json(json)?,
            None => SiteConfig::default(),
        };
        let catalog = match catalog_json {
            Some(json) => Catalog::from_json(json)?,
            None => Catalog::builtin(),
        };
        Ok(Self::with_model(SiteModel::new(catalog, config)))
    }

    #[must_use]
    pub fn with_model(model: SiteModel) -> Self {
        Self {
            program: StepProgram::new(model),
        }
    }

    /// Render the first frame at host time `now_ms`. Call once.
    ///
    /// Timers the model declares at init, such as the preloader delay, are
    /// measured from `now_ms`.
    pub fn init(&mut self, now_ms: u64) -> Result<Frame, BridgeError> {
        if !self.program.is_initialized() {
            self.program.set_time(Duration::from_millis(now_ms));
        }
        self.program.init()?;
        Ok(self.collect(StepResult {
            rendered: true,
            events_processed: 0,
            timers_fired: 0,
            frame_idx: self.program.frame_idx(),
        }))
    }

    /// Queue one JSON-encoded host event.
    pub fn push(&mut self, json: &str) -> Result<(), BridgeError> {
        let event: HostEvent =
            serde_json::from_str(json).map_err(|err| BridgeError::Event(err.to_string()))?;
        self.push_event(event.into());
        Ok(())
    }

    pub fn push_event(&mut self, event: InputEvent) {
        self.program.push_event(event);
    }

    /// Move the clock to `now_ms` and run one step.
    ///
    /// Times earlier than the current clock are treated as "now"; the clock
    /// never runs backwards.
    pub fn step(&mut self, now_ms: u64) -> Result<Frame, BridgeError> {
        let now = Duration::from_millis(now_ms).max(self.program.now());
        self.program.set_time(now);
        let result = self.program.step()?;
        Ok(self.collect(result))
    }

    /// [`step`](Self::step), encoded for the host.
    pub fn step_json(&mut self, now_ms: u64) -> Result<String, BridgeError> {
        let frame = self.step(now_ms)?;
        encode(&frame)
    }

    #[must_use]
    pub fn program(&self) -> &StepProgram<SiteModel> {
        &self.program
    }

    #[must_use]
    pub fn model(&self) -> &SiteModel {
        self.program.model()
    }

    fn collect(&mut self, result: StepResult) -> Frame {
        let outputs = self.program.take_outputs();
        let (patches, hash, full_repaint) = if result.rendered {
            (
                outputs.last_patches,
                outputs.last_patch_hash,
                outputs.last_full_repaint_hint,
            )
        } else {
            (Vec::new(), None, false)
        };
        Frame {
            rendered: result.rendered,
            frame_idx: result.frame_idx,
            events_processed: result.events_processed,
            timers_fired: result.timers_fired,
            full_repaint,
            patches,
            logs: outputs.logs,
            hash,
            next_wakeup_ms: self
                .program
                .next_wakeup()
                .map(|at| u64::try_from(at.as_millis()).unwrap_or(u64::MAX)),
        }
    }
}

/// Serialize a frame for the host.
pub fn encode(frame: &Frame) -> Result<String, BridgeError> {
    serde_json::to_string(frame).map_err(|err| BridgeError::Encode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeboard_render::{HostEffect, RegionId};
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_every_event_type() {
        let cases = [
            (r#"{"type":"search","value":"Water"}"#, InputEvent::Search("Water".into())),
            (r#"{"type":"category","value":"health"}"#, InputEvent::Category("health".into())),
            (r#"{"type":"card_click","id":"2"}"#, InputEvent::CardClick(Some("2".into()))),
            (r#"{"type":"card_click"}"#, InputEvent::CardClick(None)),
            (r#"{"type":"submit","form":"donate"}"#, InputEvent::Submit(FormKind::Donate)),
            (
                r#"{"type":"mount","counters":[{"key":"c1","target":"2500"}]}"#,
                InputEvent::Mount(PageMount {
                    counters: vec![causeboard_core::input::CounterMount {
                        key: "c1".into(),
                        target: Some("2500".into()),
                    }],
                    reveals: vec![],
                }),
            ),
            (
                r#"{"type":"scroll","viewport_height":800,"tops":[{"key":"c1","top":12}]}"#,
                InputEvent::Scroll(ScrollSnapshot::new(800.0).with_top("c1", 12.0)),
            ),
            (r#"{"type":"unmount","key":"c1"}"#, InputEvent::Unmount("c1".into())),
        ];
        for (json, expected) in cases {
            let event: HostEvent = serde_json::from_str(json).unwrap();
            assert_eq!(InputEvent::from(event), expected, "{json}");
        }
    }

    #[test]
    fn unknown_event_is_an_error() {
        let mut engine = SiteEngine::new(None, None).unwrap();
        let err = engine.push(r#"{"type":"hover"}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Event(_)));
        // Timers are driven by `step`; there is no bare tick event.
        let err = engine.push(r#"{"type":"tick"}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Event(_)));
    }

    #[test]
    fn bad_config_is_rejected() {
        let err = SiteEngine::new(Some(r#"{"toast_ms": 0}"#), None).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn step_before_init_fails() {
        let mut engine = SiteEngine::new(None, None).unwrap();
        assert_eq!(
            engine.step(0).unwrap_err(),
            BridgeError::Host(HostError::NotInitialized)
        );
    }

    #[test]
    fn init_frame_fills_regions_and_schedules_preloader() {
        let mut engine = SiteEngine::new(None, None).unwrap();
        let frame = engine.init(0).unwrap();
        assert!(frame.rendered && frame.full_repaint);
        assert_eq!(frame.next_wakeup_ms, Some(2800));
        assert!(frame.hash.as_deref().is_some_and(|h| h.starts_with("fnv1a64:")));
        assert!(frame.patches.iter().any(|p| matches!(
            p,
            DomPatch::ReplaceRegion {
                region: RegionId::EventList,
                ..
            }
        )));
    }

    #[test]
    fn preloader_delay_counts_from_host_init_time() {
        let mut engine = SiteEngine::new(None, None).unwrap();
        let first = engine.init(2500).unwrap();
        assert_eq!(first.next_wakeup_ms, Some(5300));

        let frame = engine.step(5299).unwrap();
        assert!(!engine.model().is_preloader_hidden());
        assert_eq!(frame.timers_fired, 0);

        let frame = engine.step(5300).unwrap();
        assert!(engine.model().is_preloader_hidden());
        assert_eq!(
            frame.patches,
            vec![DomPatch::SetStyle {
                element: "preloader".into(),
                style: "display:none".into()
            }]
        );
    }

    #[test]
    fn second_init_fails_without_moving_the_clock() {
        let mut engine = SiteEngine::new(None, None).unwrap();
        engine.init(1000).unwrap();
        assert_eq!(
            engine.init(9000).unwrap_err(),
            BridgeError::Host(HostError::AlreadyInitialized)
        );
        assert_eq!(engine.program().now(), Duration::from_millis(1000));
    }

    #[test]
    fn click_frame_serializes_show_modal() {
        let mut engine = SiteEngine::new(None, None).unwrap();
        engine.init(0).unwrap();
        engine.push(r#"{"type":"card_click","id":"3"}"#).unwrap();
        let frame = engine.step(5).unwrap();
        assert_eq!(
            frame.patches.last(),
            Some(&DomPatch::Effect {
                effect: HostEffect::ShowModal
            })
        );
        let json = encode(&frame).unwrap();
        assert!(json.contains(r#"{"op":"effect","effect":{"kind":"show_modal"}}"#));
        assert!(json.contains(r#""region":"causeTitle""#));
    }

    #[test]
    fn idle_step_renders_nothing() {
        let mut engine = SiteEngine::new(None, None).unwrap();
        engine.init(0).unwrap();
        let frame = engine.step(100).unwrap();
        assert!(!frame.rendered);
        assert!(frame.patches.is_empty());
        assert_eq!(frame.hash, None);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut engine = SiteEngine::new(None, None).unwrap();
        engine.init(0).unwrap();
        engine.step(500).unwrap();
        engine.step(100).unwrap();
        assert_eq!(engine.program().now(), Duration::from_millis(500));
    }
}
