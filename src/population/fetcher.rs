use std::{
    sync::mpsc::{Receiver, RecvTimeoutError, Sender},
    time::Duration,
};

use log::{debug, info};

use super::{FetchOutcome, FetchRequest, client::PopulationSource, sort_records};

/// Trailing debounce window for slider-driven refetches.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Blocking worker loop that turns a stream of range-change requests into
/// at most one fetch per settled debounce window.
///
/// Every request opens (or restarts) the window; a newer request arriving
/// inside the window replaces the pending one. Only when the window elapses
/// with no new request is a single fetch issued and its outcome sent back.
/// The loop exits when either channel disconnects, so a request still
/// pending when the UI goes away is dropped without fetching.
pub fn run_fetch_worker<S: PopulationSource>(
    mut source: S,
    request_rx: Receiver<FetchRequest>,
    outcome_tx: Sender<FetchOutcome>,
    debounce_window: Duration,
) {
    loop {
        let Ok(mut pending) = request_rx.recv() else {
            return;
        };

        loop {
            match request_rx.recv_timeout(debounce_window) {
                Ok(request) => pending = request,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        debug!(
            "Debounce window settled, fetching {}-{}",
            pending.start_year, pending.end_year
        );
        let outcome = match source.fetch(pending.start_year, pending.end_year) {
            Ok(mut records) => {
                sort_records(&mut records);
                info!(
                    "Loaded {} records for {}-{}",
                    records.len(),
                    pending.start_year,
                    pending.end_year
                );
                FetchOutcome::Loaded {
                    request: pending,
                    records,
                }
            }
            Err(error) => FetchOutcome::Failed {
                request: pending,
                error,
            },
        };

        if outcome_tx.send(outcome).is_err() {
            return;
        }
    }
}
