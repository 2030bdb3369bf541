//! Curl multi event loop: perform, wait, messages; re-arm finished workers.

use std::time::Duration;

use crate::control::StopToken;
use crate::fault::FleetError;
use crate::report::ReportSink;
use crate::target::Target;

use super::arm;
use super::handler::DiscardHandler;
use super::{CurlOptions, FleetSummary, ResponseOutcome, WorkerHandle, WorkerState};

const WAIT_MS: u64 = 100;

struct Slot {
    worker: WorkerHandle,
    handle: Option<curl::multi::Easy2Handle<DiscardHandler>>,
}

/// Runs `workers` download loops against `target` until one faults or `stop` is set.
///
/// The first transfer error ends the run and is returned; sibling transfers are
/// dropped with the multi handle. There is no local retry. A non-200 status is
/// reported to `sink` and the worker immediately issues its next request.
pub fn run_fleet(
    target: &Target,
    workers: usize,
    curl: CurlOptions,
    sink: &dyn ReportSink,
    stop: &StopToken,
) -> Result<FleetSummary, FleetError> {
    let multi = curl::multi::Multi::new();
    let mut slots: Vec<Slot> = Vec::with_capacity(workers);
    for index in 0..workers {
        let easy = arm::configure_easy(target, curl)
            .map_err(|source| FleetError::Setup { worker: index, source })?;
        let handle = multi.add2(easy)?;
        slots.push(Slot {
            worker: WorkerHandle::new(index),
            handle: Some(handle),
        });
    }
    tracing::info!(workers, url = target.url(), "fleet running");

    while !slots.is_empty() && !stop.is_stopped() {
        let running = multi.perform()?;
        let mut finished: Vec<(usize, Result<(), curl::Error>)> = Vec::new();
        multi.messages(|msg| {
            for (i, slot) in slots.iter().enumerate() {
                if let Some(res) = slot.handle.as_ref().and_then(|h| msg.result_for2(h)) {
                    finished.push((i, res));
                    break;
                }
            }
        });

        for (i, res) in finished {
            let slot = &mut slots[i];
            if let Err(e) = res {
                slot.worker.state = WorkerState::Faulted;
                tracing::error!(
                    worker = i,
                    requests = slot.worker.requests,
                    "transfer failed: {}",
                    e
                );
                return Err(FleetError::worker_fault(i, e));
            }
            let Some(handle) = slot.handle.take() else {
                continue;
            };
            let mut easy = multi.remove2(handle)?;
            let status = easy
                .response_code()
                .map_err(|e| FleetError::worker_fault(i, e))?;
            let bytes = easy.get_mut().take_bytes();
            if let ResponseOutcome::Unexpected(code) = slot.worker.record(status, bytes) {
                sink.http_status(i, code);
            }
            // Handing the handle back to the loop is the worker's yield point;
            // the next GET starts on the following perform with no delay.
            slot.handle = Some(multi.add2(easy)?);
        }

        if running > 0 {
            multi.wait(&mut [], Duration::from_millis(WAIT_MS))?;
        }
    }

    let mut summary = FleetSummary::default();
    for mut slot in slots {
        if let Some(handle) = slot.handle.take() {
            let _ = multi.remove2(handle);
        }
        slot.worker.state = WorkerState::Cancelled;
        summary.workers.push(slot.worker);
    }
    tracing::info!(
        requests = summary.requests(),
        bytes = summary.bytes(),
        "fleet stopped"
    );
    Ok(summary)
}
