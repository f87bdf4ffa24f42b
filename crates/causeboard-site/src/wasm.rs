#![forbid(unsafe_code)]

use wasm_bindgen::prelude::*;

use crate::bridge::{BridgeError, SiteEngine, encode};

fn to_js(err: BridgeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Host clock readings arrive as `performance.now()` doubles.
fn millis(now_ms: f64) -> u64 {
    if now_ms.is_finite() && now_ms > 0.0 {
        // `as` saturates at u64::MAX.
        now_ms as u64
    } else {
        0
    }
}

/// JS-facing page engine.
///
/// Events go in as JSON strings through `input`; each `step` returns one
/// JSON frame holding the patch batch to apply.
#[wasm_bindgen]
pub struct CauseboardSite {
    engine: SiteEngine,
}

#[wasm_bindgen]
impl CauseboardSite {
    /// Both arguments are optional JSON documents; omitted ones select the
    /// built-in page.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        catalog_json: Option<String>,
    ) -> Result<CauseboardSite, JsValue> {
        let engine =
            SiteEngine::new(config_json.as_deref(), catalog_json.as_deref()).map_err(to_js)?;
        Ok(Self { engine })
    }

    /// Render the first frame at host time `now_ms` (`performance.now()`).
    pub fn init(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let frame = self.engine.init(millis(now_ms)).map_err(to_js)?;
        encode(&frame).map_err(to_js)
    }

    /// Queue one host event.
    pub fn input(&mut self, event_json: &str) -> Result<(), JsValue> {
        self.engine.push(event_json).map_err(to_js)
    }

    /// Advance to `now_ms`, run queued input and due timers, return the frame.
    pub fn step(&mut self, now_ms: f64) -> Result<String, JsValue> {
        self.engine.step_json(millis(now_ms)).map_err(to_js)
    }

    /// Earliest pending timer, for scheduling the next wakeup.
    #[wasm_bindgen(js_name = nextWakeupMs)]
    pub fn next_wakeup_ms(&self) -> Option<f64> {
        self.engine
            .program()
            .next_wakeup()
            .map(|at| at.as_secs_f64() * 1000.0)
    }
}
