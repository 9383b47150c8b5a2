//! Session driver: the full per-command pipeline.
//!
//! One submitted line flows through policy check, dispatch, and flight
//! recording. The interactive loop and the HTTP endpoint both go through
//! this driver, so every entry point gets the same gating and audit
//! behavior.

use leitstand_net::{CommandService, FlightRecord, FlightRecorder, PolicyGate};
use leitstand_shell::Dispatcher;
use leitstand_types::Outcome;

/// Where a command entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Interactive,
    Http,
}

impl Source {
    fn as_str(self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::Http => "http",
        }
    }
}

/// Ties the dispatcher to its collaborators.
pub struct SessionDriver {
    dispatcher: Dispatcher,
    gate: PolicyGate,
    recorder: FlightRecorder,
}

impl SessionDriver {
    pub fn new(dispatcher: Dispatcher, gate: PolicyGate, recorder: FlightRecorder) -> Self {
        Self {
            dispatcher,
            gate,
            recorder,
        }
    }

    /// Run one raw command line through the full pipeline.
    pub fn run(&self, raw: &str, source: Source) -> Outcome {
        let context = serde_json::json!({"source": source.as_str()});
        let decision = self.gate.check(raw, &context);

        let outcome = if decision.allows_dispatch() {
            self.dispatcher.process(raw)
        } else {
            log::info!("policy blocked '{raw}': {}", decision.reason);
            Outcome::error(format!("command blocked by policy: {}", decision.reason))
        };

        self.recorder.record(&FlightRecord::now(
            raw,
            decision.policy_status.as_str(),
            outcome.result.as_str(),
            serde_json::json!({
                "source": source.as_str(),
                "status": outcome.status,
            }),
        ));

        outcome
    }
}

impl CommandService for SessionDriver {
    fn submit(&self, raw: &str) -> Outcome {
        self.run(raw, Source::Http)
    }
}
