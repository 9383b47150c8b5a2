//! Networking for Leitstand.
//!
//! A minimal HTTP/1.1 client over `std::net`, the two collaborator
//! clients (policy gate, flight recorder), and the HTTP driver that
//! exposes the shell over a network endpoint.

pub mod http;
pub mod policy;
pub mod recorder;
pub mod server;
mod url;

pub use http::{HttpResponse, http_get, http_post_json};
pub use policy::{PolicyDecision, PolicyGate};
pub use recorder::{FlightRecord, FlightRecorder};
pub use server::{CommandService, HttpDriver};
pub use url::Url;
