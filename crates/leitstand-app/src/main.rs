//! Leitstand entry point.
//!
//! Loads the configuration, builds the frozen command registry, wires
//! the policy gate and flight recorder, then serves commands from two
//! entry points: an interactive stdin loop and (if configured) an HTTP
//! endpoint on a background thread. Type `help` for commands, `exit` or
//! `quit` to leave.

mod driver;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use driver::{SessionDriver, Source};
use leitstand_net::{FlightRecorder, HttpDriver, PolicyGate};
use leitstand_shell::{CommandRegistry, Dispatcher};
use leitstand_types::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("loading configuration from {config_path}"))?;

    let registry = CommandRegistry::build(&config);
    log::info!("Starting Leitstand with {} commands", registry.len());

    let gate = PolicyGate::new(config.policy.url.clone());
    if !gate.is_configured() {
        log::info!("Policy gate not configured, all commands pass");
    }
    let recorder = FlightRecorder::new(
        config.flight_recorder.url.clone(),
        config.flight_recorder.log_file.clone().map(PathBuf::from),
    );
    if !recorder.is_configured() {
        log::info!("Flight recorder not configured, dispatches are not audited");
    }

    let session = Arc::new(SessionDriver::new(Dispatcher::new(registry), gate, recorder));

    if config.server.port > 0 {
        let http = HttpDriver::bind(config.server.port)?;
        log::info!("HTTP driver listening on {}", http.local_addr()?);
        let service = Arc::clone(&session) as Arc<dyn leitstand_net::CommandService>;
        std::thread::spawn(move || http.run(service));
    }

    interactive_loop(&session)
}

/// Read `Name:Value` lines from stdin until EOF or an exit keyword.
fn interactive_loop(session: &SessionDriver) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("Leitstand -- type 'help' for commands, 'exit' to leave");
    loop {
        print!("> ");
        stdout.flush().context("flushing prompt")?;

        let mut line = String::new();
        let n = stdin
            .lock()
            .read_line(&mut line)
            .context("reading from stdin")?;
        if n == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let outcome = session.run(trimmed, Source::Interactive);
        if outcome.is_success() {
            println!("{}", outcome.result);
        } else {
            println!("error: {}", outcome.result);
        }
    }

    log::info!("Leitstand shut down cleanly");
    Ok(())
}
