//! Analytics event envelopes and dispatch
//!
//! Every discrete game event becomes one JSON envelope POSTed to the
//! analytics sink. Dispatch is fire-and-forget: the simulation never
//! waits on, retries, or even observes the result, so a dead backend
//! costs nothing but the telemetry itself.

use serde::Serialize;
use uuid::Uuid;

use crate::sim::{GameEvent, GameState};

/// Game-type tag stamped on `game_start`
const GAME_TAG: &str = "2d_car_racer";

/// Event-specific payload; the tag becomes the envelope's `event` field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventPayload {
    GameStart {
        game: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        restart: Option<bool>,
    },
    Pause,
    Resume,
    CoinCollected {
        total_coins: u32,
    },
    Crash {
        reason: &'static str,
    },
    GameEnd {
        reason: &'static str,
        final_score: u32,
        total_coins: u32,
    },
    NewHighScore {
        best_score: u32,
    },
}

/// One dispatched analytics record
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Unique per dispatch, not per session
    pub event_id: String,
    pub player_id: String,
    pub session_id: Option<String>,
    /// ISO-8601 at dispatch time (web builds)
    pub ts: String,
    /// Floored score at dispatch time
    pub score: u32,
    pub speed: f32,
    pub coins: u32,
    #[serde(flatten)]
    pub payload: EventPayload,
}

/// Where envelopes go. Implementations must not block the caller; any
/// failure is the sink's problem, not the simulation's.
pub trait EventSink {
    fn submit(&self, envelope: EventEnvelope);
}

/// Packages game events with player identity and state snapshots
pub struct Telemetry<S: EventSink> {
    player_id: String,
    sink: S,
}

impl<S: EventSink> Telemetry<S> {
    pub fn new(player_id: String, sink: S) -> Self {
        Self { player_id, sink }
    }

    /// Dispatch one simulation event against the current state snapshot
    pub fn emit(&self, state: &GameState, event: &GameEvent) {
        self.dispatch(state, payload_for(event));
    }

    /// Dispatch a `new_high_score` record; raised by the score tracker,
    /// not the simulation
    pub fn emit_high_score(&self, state: &GameState, best_score: u32) {
        self.dispatch(state, EventPayload::NewHighScore { best_score });
    }

    fn dispatch(&self, state: &GameState, payload: EventPayload) {
        self.sink.submit(EventEnvelope {
            event_id: Uuid::new_v4().to_string(),
            player_id: self.player_id.clone(),
            session_id: state.session.clone(),
            ts: timestamp(),
            score: state.displayed_score(),
            speed: state.speed,
            coins: state.coin_count,
            payload,
        });
    }
}

fn payload_for(event: &GameEvent) -> EventPayload {
    match event {
        GameEvent::GameStart { restart } => EventPayload::GameStart {
            game: GAME_TAG,
            restart: restart.then_some(true),
        },
        GameEvent::Pause => EventPayload::Pause,
        GameEvent::Resume => EventPayload::Resume,
        GameEvent::CoinCollected { total_coins } => EventPayload::CoinCollected {
            total_coins: *total_coins,
        },
        GameEvent::Crash => EventPayload::Crash {
            reason: "collision",
        },
        GameEvent::GameEnd {
            final_score,
            total_coins,
        } => EventPayload::GameEnd {
            reason: "collision",
            final_score: *final_score,
            total_coins: *total_coins,
        },
    }
}

/// ISO-8601 on the web; an opaque epoch tag on native builds, where the
/// envelope never leaves the process
#[cfg(target_arch = "wasm32")]
fn timestamp() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

#[cfg(not(target_arch = "wasm32"))]
fn timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("unix_ms:{ms}")
}

/// POSTs envelopes to `{base_url}/event` in a detached task; errors are
/// dropped on the floor, exactly like a backend that is simply off
#[cfg(target_arch = "wasm32")]
pub struct HttpSink {
    base_url: String,
}

#[cfg(target_arch = "wasm32")]
impl HttpSink {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl EventSink for HttpSink {
    fn submit(&self, envelope: EventEnvelope) {
        let Ok(body) = serde_json::to_string(&envelope) else {
            return;
        };
        let url = format!("{}/event", self.base_url);
        wasm_bindgen_futures::spawn_local(async move {
            use wasm_bindgen::JsValue;
            use wasm_bindgen_futures::JsFuture;
            use web_sys::{Request, RequestInit, RequestMode};

            let opts = RequestInit::new();
            opts.set_method("POST");
            opts.set_mode(RequestMode::Cors);
            opts.set_body(&JsValue::from_str(&body));

            let Ok(request) = Request::new_with_str_and_init(&url, &opts) else {
                return;
            };
            let _ = request.headers().set("Content-Type", "application/json");

            let Some(window) = web_sys::window() else {
                return;
            };
            let _ = JsFuture::from(window.fetch_with_request(&request)).await;
        });
    }
}

/// Sink for builds without a backend
pub struct NullSink;

impl EventSink for NullSink {
    fn submit(&self, _envelope: EventEnvelope) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::cell::RefCell;

    /// Captures envelopes for assertions
    #[derive(Default)]
    struct RecordingSink {
        submitted: RefCell<Vec<EventEnvelope>>,
    }

    impl EventSink for &RecordingSink {
        fn submit(&self, envelope: EventEnvelope) {
            self.submitted.borrow_mut().push(envelope);
        }
    }

    fn running_state() -> GameState {
        let mut state = GameState::new(1);
        state.start_session("session-1".into(), false);
        state.take_events();
        state
    }

    fn to_json(envelope: &EventEnvelope) -> Value {
        serde_json::to_value(envelope).unwrap()
    }

    #[test]
    fn test_envelope_carries_identity_and_snapshot() {
        let sink = RecordingSink::default();
        let telemetry = Telemetry::new("player-1".into(), &sink);
        let mut state = running_state();
        state.score = 42.9;
        state.coin_count = 3;

        telemetry.emit(&state, &GameEvent::Pause);

        let submitted = sink.submitted.borrow();
        let value = to_json(&submitted[0]);
        assert_eq!(value["event"], "pause");
        assert_eq!(value["player_id"], "player-1");
        assert_eq!(value["session_id"], "session-1");
        assert_eq!(value["score"], 42);
        assert_eq!(value["coins"], 3);
        assert!(value["ts"].is_string());
    }

    #[test]
    fn test_event_ids_are_unique_per_dispatch() {
        let sink = RecordingSink::default();
        let telemetry = Telemetry::new("player-1".into(), &sink);
        let state = running_state();

        telemetry.emit(&state, &GameEvent::Pause);
        telemetry.emit(&state, &GameEvent::Resume);

        let submitted = sink.submitted.borrow();
        assert_ne!(submitted[0].event_id, submitted[1].event_id);
    }

    #[test]
    fn test_game_start_payloads() {
        let start = payload_for(&GameEvent::GameStart { restart: false });
        assert_eq!(
            serde_json::to_value(&start).unwrap(),
            json!({"event": "game_start", "game": "2d_car_racer"})
        );

        let restart = payload_for(&GameEvent::GameStart { restart: true });
        assert_eq!(
            serde_json::to_value(&restart).unwrap(),
            json!({"event": "game_start", "game": "2d_car_racer", "restart": true})
        );
    }

    #[test]
    fn test_crash_and_game_end_payloads() {
        let crash = payload_for(&GameEvent::Crash);
        assert_eq!(
            serde_json::to_value(&crash).unwrap(),
            json!({"event": "crash", "reason": "collision"})
        );

        let end = payload_for(&GameEvent::GameEnd {
            final_score: 1200,
            total_coins: 9,
        });
        assert_eq!(
            serde_json::to_value(&end).unwrap(),
            json!({
                "event": "game_end",
                "reason": "collision",
                "final_score": 1200,
                "total_coins": 9
            })
        );
    }

    #[test]
    fn test_coin_and_high_score_payloads() {
        let coin = payload_for(&GameEvent::CoinCollected { total_coins: 4 });
        assert_eq!(
            serde_json::to_value(&coin).unwrap(),
            json!({"event": "coin_collected", "total_coins": 4})
        );

        let sink = RecordingSink::default();
        let telemetry = Telemetry::new("player-1".into(), &sink);
        telemetry.emit_high_score(&running_state(), 1200);
        let value = to_json(&sink.submitted.borrow()[0]);
        assert_eq!(value["event"], "new_high_score");
        assert_eq!(value["best_score"], 1200);
    }

    #[test]
    fn test_high_score_is_emitted_once_per_record() {
        use crate::scores::BestScore;

        let sink = RecordingSink::default();
        let telemetry = Telemetry::new("player-1".into(), &sink);
        let mut best = BestScore::new(1000);

        // First session beats the stored best
        let state = running_state();
        if let Some(new_best) = best.record(1200) {
            telemetry.emit_high_score(&state, new_best);
        }

        // A later session ties it; strict comparison emits nothing
        if let Some(new_best) = best.record(1200) {
            telemetry.emit_high_score(&state, new_best);
        }

        let submitted = sink.submitted.borrow();
        assert_eq!(submitted.len(), 1);
        let value = to_json(&submitted[0]);
        assert_eq!(value["best_score"], 1200);
    }

    #[test]
    fn test_no_session_serializes_as_null() {
        let sink = RecordingSink::default();
        let telemetry = Telemetry::new("player-1".into(), &sink);
        let state = GameState::new(1);

        telemetry.emit(&state, &GameEvent::Pause);

        let value = to_json(&sink.submitted.borrow()[0]);
        assert_eq!(value["session_id"], Value::Null);
    }
}
