//! Policy-gate collaborator client.
//!
//! Before dispatching, the driver may ask an external policy service for
//! a verdict on the raw command. The gate is advisory infrastructure: an
//! unconfigured or unreachable gate degrades to "proceed", while an
//! explicit non-approved verdict from a reachable gate blocks dispatch.

use std::time::Duration;

use serde::Deserialize;

use crate::http;

/// Verdict returned by the policy endpoint, plus the two local
/// degradation states.
pub const STATUS_APPROVED: &str = "approved";
/// Gate not configured; dispatch proceeds.
pub const STATUS_SKIPPED: &str = "skipped";
/// Gate configured but unreachable or unparsable; dispatch proceeds.
pub const STATUS_UNAVAILABLE: &str = "unavailable";

/// Request timeout for the policy endpoint.
const POLICY_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    /// `approved`, `denied`, `skipped`, `unavailable`, or whatever the
    /// service returned verbatim.
    pub policy_status: String,
    /// Human-readable reason.
    pub reason: String,
}

impl PolicyDecision {
    /// Whether the driver should go ahead and dispatch.
    ///
    /// Only an explicit verdict other than `approved` from a reachable
    /// gate blocks; the degradation states allow dispatch.
    pub fn allows_dispatch(&self) -> bool {
        matches!(
            self.policy_status.as_str(),
            STATUS_APPROVED | STATUS_SKIPPED | STATUS_UNAVAILABLE,
        )
    }
}

/// Wire shape of the policy endpoint's reply.
#[derive(Debug, Deserialize)]
struct PolicyReply {
    policy_status: String,
    #[serde(default)]
    reason: String,
}

/// Client for the external policy-check endpoint.
#[derive(Debug, Clone)]
pub struct PolicyGate {
    url: Option<String>,
}

impl PolicyGate {
    /// A gate posting to `url`; `None` disables the gate entirely.
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }

    /// Whether a policy endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Check one raw command line against the policy endpoint.
    ///
    /// POSTs `{command, context}` and expects `{policy_status, reason}`.
    pub fn check(&self, command: &str, context: &serde_json::Value) -> PolicyDecision {
        let Some(url) = &self.url else {
            return PolicyDecision {
                policy_status: STATUS_SKIPPED.to_string(),
                reason: "policy gate not configured".to_string(),
            };
        };

        let payload = serde_json::json!({
            "command": command,
            "context": context,
        });

        match http::http_post_json(url, &payload, POLICY_TIMEOUT) {
            Ok(resp) if resp.status_code == 200 => {
                match serde_json::from_slice::<PolicyReply>(&resp.body) {
                    Ok(reply) => PolicyDecision {
                        policy_status: reply.policy_status,
                        reason: reply.reason,
                    },
                    Err(e) => {
                        log::warn!("policy gate returned unparsable reply: {e}");
                        PolicyDecision {
                            policy_status: STATUS_UNAVAILABLE.to_string(),
                            reason: format!("unparsable policy reply: {e}"),
                        }
                    },
                }
            },
            Ok(resp) => {
                log::warn!("policy gate returned HTTP {}", resp.status_code);
                PolicyDecision {
                    policy_status: STATUS_UNAVAILABLE.to_string(),
                    reason: format!("policy gate returned HTTP {}", resp.status_code),
                }
            },
            Err(e) => {
                log::warn!("policy gate unreachable: {e}");
                PolicyDecision {
                    policy_status: STATUS_UNAVAILABLE.to_string(),
                    reason: format!("policy gate unreachable: {e}"),
                }
            },
        }
    }
}
