//! Fleet-wide stop sequencing.
//!
//! Printers are visited in reverse configured order: the last printer in the
//! file is stopped first. Each printer gets a bounded retry loop that issues
//! the job-deletion request, polls the reported state, and confirms the job
//! actually cleared before declaring success. A printer that never leaves
//! `Stopping` runs out of attempts and is reported as such instead of
//! blocking the sequence forever.

use std::fmt::Write;
use std::time::Duration;

use crate::config::Config;
use crate::error::ProxyError;
use crate::ops::{Operation, operation_url, resolve};
use crate::printer::PrinterClient;

/// Maximum stop attempts per printer before giving up on it.
const MAX_ATTEMPTS: u32 = 5;

/// Pause between attempts while a printer is still tearing its job down.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Terminal outcome of stopping a single printer.
#[derive(Debug)]
pub enum StopOutcome {
    /// The job cleared; the printer is confirmed stopped.
    Stopped,
    /// The printer still reported an active job after every attempt.
    StillStopping,
    /// Resolution or a request failed; the printer was skipped.
    Failed(ProxyError),
}

/// Stop every configured printer, last configured first.
///
/// Failures are recorded per printer and never abort the sequence. Returns
/// the accumulated plain-text report.
pub async fn stop_all(config: &Config, client: &PrinterClient) -> String {
    let mut report = String::new();
    for printer in config.printers.iter().rev() {
        match stop_printer(config, client, &printer.address, &mut report).await {
            StopOutcome::Stopped => {
                let _ = writeln!(report, "Printer {} stopped successfully.", printer.address);
            }
            StopOutcome::StillStopping => {
                tracing::warn!(printer = %printer.address, attempts = MAX_ATTEMPTS, "printer did not stop");
                let _ = writeln!(
                    report,
                    "Printer {} did not stop after {MAX_ATTEMPTS} attempts.",
                    printer.address
                );
            }
            StopOutcome::Failed(err) => {
                // The failure line is already in the report.
                tracing::warn!(printer = %printer.address, error = %err, "stop failed");
            }
        }
    }
    report
}

/// Drive one printer through the stop sequence, appending progress lines to
/// `report`.
///
/// Per attempt: issue the DELETE, poll the status document, and re-fetch the
/// job id. The freshly fetched id is what decides completion; only a zero id
/// confirms the job is gone. A `Stopping` state or a lingering job id means
/// wait and try again.
async fn stop_printer(
    config: &Config,
    client: &PrinterClient,
    address: &str,
    report: &mut String,
) -> StopOutcome {
    let necessities = match resolve(config, client, address).await {
        Ok(n) => n,
        Err(err) => {
            let _ = writeln!(
                report,
                "Error getting configuration for printer {address}: {err}"
            );
            return StopOutcome::Failed(err);
        }
    };

    let mut job_id = necessities.job_id;
    for attempt in 1..=MAX_ATTEMPTS {
        let url = operation_url(address, job_id, Operation::Stop);
        if let Err(err) = client.delete(&url, &necessities.username, &necessities.password).await {
            let _ = writeln!(report, "Failed to stop the printer: {err}");
            return StopOutcome::Failed(err);
        }

        let status = match client
            .status(address, &necessities.username, &necessities.password)
            .await
        {
            Ok(status) => status,
            Err(err) => {
                let _ = writeln!(report, "Error getting status for printer {address}: {err}");
                return StopOutcome::Failed(err);
            }
        };
        if status.printer.state == "Stopping" {
            let _ = writeln!(
                report,
                "Printer {address} is stopping, waiting for it to finish."
            );
            tracing::info!(printer = %address, attempt, "printer still stopping, waiting");
            tokio::time::sleep(RETRY_DELAY).await;
            continue;
        }

        // Confirm the job actually cleared before declaring success.
        match client
            .job_id(address, &necessities.username, &necessities.password)
            .await
        {
            Ok(0) => {
                let _ = writeln!(report, "No job found for printer {address}.");
                return StopOutcome::Stopped;
            }
            Ok(id) => {
                let _ = writeln!(report, "{address} - still not stopped, trying again.");
                tracing::info!(printer = %address, attempt, job_id = id, "job still present, retrying");
                job_id = id;
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) => {
                let _ = writeln!(report, "Error getting status for printer {address}: {err}");
                return StopOutcome::Failed(err);
            }
        }
    }

    StopOutcome::StillStopping
}
