//! Printer operations: single-printer dispatch, fleet-wide loops, and the
//! metrics exposition.
//!
//! Every operation starts from the same resolve step: look up the printer's
//! credentials in the configuration, fetch its current job id, and refuse to
//! proceed when either is missing. The stop sequencer lives in [`stop`].

pub mod stop;

use std::fmt::Write;

use crate::config::Config;
use crate::error::ProxyError;
use crate::printer::PrinterClient;

/// A control operation on a printer's active job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Pause,
    Resume,
    Stop,
}

impl Operation {
    /// Path segment under `/api/v1/job/{id}/`. Stop addresses the bare
    /// job-deletion path, so its segment is empty.
    pub fn segment(self) -> &'static str {
        match self {
            Operation::Pause => "pause",
            Operation::Resume => "resume",
            Operation::Stop => "",
        }
    }

    /// Verb used in report lines and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Pause => "pause",
            Operation::Resume => "resume",
            Operation::Stop => "stop",
        }
    }

    /// Past tense of [`Operation::name`], for success report lines.
    pub fn past(self) -> &'static str {
        match self {
            Operation::Pause => "paused",
            Operation::Resume => "resumed",
            Operation::Stop => "stopped",
        }
    }
}

/// Credentials plus active job id for one printer, resolved from the
/// configuration and a live status fetch.
pub(crate) struct Necessities {
    pub username: String,
    pub password: String,
    pub job_id: i64,
}

/// Resolve everything an operation needs for the printer at `address`.
///
/// Missing username or password and a zero job id are errors, never silent
/// no-ops; a failing status fetch propagates as-is.
pub(crate) async fn resolve(
    config: &Config,
    client: &PrinterClient,
    address: &str,
) -> Result<Necessities, ProxyError> {
    let username = config.username(address);
    if username.is_empty() {
        return Err(ProxyError::MissingUsername(address.to_string()));
    }
    let password = config.password(address);
    if password.is_empty() {
        return Err(ProxyError::MissingPassword(address.to_string()));
    }

    let job_id = client.job_id(address, username, password).await?;
    if job_id == 0 {
        return Err(ProxyError::NoActiveJob(address.to_string()));
    }

    Ok(Necessities {
        username: username.to_string(),
        password: password.to_string(),
        job_id,
    })
}

/// Target URL for an operation on a specific job.
pub fn operation_url(address: &str, job_id: i64, op: Operation) -> String {
    format!("http://{address}/api/v1/job/{job_id}/{}", op.segment())
}

/// Perform one operation against one printer.
///
/// Resolution failures surface unwrapped (400 on the proxy API); failures of
/// the operation call itself are wrapped with the operation name.
pub async fn dispatch(
    config: &Config,
    client: &PrinterClient,
    address: &str,
    op: Operation,
) -> Result<(), ProxyError> {
    let necessities = resolve(config, client, address).await?;
    let url = operation_url(address, necessities.job_id, op);

    let result = match op {
        Operation::Pause | Operation::Resume => {
            client.put(&url, &necessities.username, &necessities.password).await
        }
        Operation::Stop => {
            client.delete(&url, &necessities.username, &necessities.password).await
        }
    };

    result
        .map(|_| ())
        .map_err(|source| ProxyError::Operation {
            op: op.name(),
            source: Box::new(source),
        })
}

/// Apply `op` to every configured printer in configured order, best effort.
///
/// One printer's failure is recorded in the report and never stops the
/// iteration. Returns the accumulated plain-text report.
pub async fn dispatch_all(config: &Config, client: &PrinterClient, op: Operation) -> String {
    let mut report = String::new();
    for printer in &config.printers {
        match dispatch(config, client, &printer.address, op).await {
            Ok(()) => {
                let _ = writeln!(
                    report,
                    "Printer {} {} successfully.",
                    printer.address,
                    op.past()
                );
            }
            Err(err @ ProxyError::Operation { .. }) => {
                let _ = writeln!(report, "{err}");
            }
            Err(err) => {
                let _ = writeln!(
                    report,
                    "Error getting configuration for printer {}: {err}",
                    printer.address
                );
            }
        }
    }
    report
}

/// Render the Prometheus-style state exposition.
///
/// One gauge line per printer that both resolves credentials and returns a
/// state; printers failing either step are logged and skipped, contributing
/// no line at all.
pub async fn export_state(config: &Config, client: &PrinterClient) -> String {
    let mut out = String::from("\n# TYPE prusa_proxy_printer_state gauge\n");
    for printer in &config.printers {
        let username = config.username(&printer.address);
        if username.is_empty() {
            tracing::warn!(printer = %printer.address, "username not found for printer");
            continue;
        }
        let password = config.password(&printer.address);
        if password.is_empty() {
            tracing::warn!(printer = %printer.address, "password not found for printer");
            continue;
        }

        match client.state(&printer.address, username, password).await {
            Ok(state) => {
                let _ = writeln!(
                    out,
                    "prusa_proxy_printer_state{{printer=\"{}\", state=\"{}\"}} 1",
                    printer.address, state
                );
            }
            Err(err) => {
                tracing::warn!(printer = %printer.address, error = %err, "error getting status for printer");
            }
        }
    }
    out
}
