mod chart;
pub mod config;

use std::{
    sync::mpsc::{Receiver, Sender},
    time::Duration,
};

use config::AppConfig;
use egui::Visuals;
use log::error;

use crate::population::{FetchOutcome, FetchRequest, PopulationRecord};

pub const MIN_YEAR: u16 = 2000;
pub const MAX_YEAR: u16 = 2024;

const OUTCOME_POLL_MS: u64 = 100;

/// Explicit fetch lifecycle. Loaded records live outside this enum so the
/// last good chart stays visible under the error banner when a refetch
/// fails.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Loaded,
    Failed { message: String },
}

/// `TrendApp` renders the population trend chart for one country and keeps
/// the year-range sliders, the fetch worker and the chart in sync.
///
/// The app owns the UI side of the two channels: range changes go down to
/// the fetch worker (which debounces them), outcomes come back up and are
/// drained on every frame.
pub struct TrendApp {
    app_config: AppConfig,
    request_tx: Sender<FetchRequest>,
    outcome_rx: Receiver<FetchOutcome>,
    start_year: u16,
    end_year: u16,
    phase: FetchPhase,
    records: Option<Vec<PopulationRecord>>,
}

impl TrendApp {
    pub fn new(
        app_config: AppConfig,
        request_tx: Sender<FetchRequest>,
        outcome_rx: Receiver<FetchOutcome>,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        cc.egui_ctx.set_visuals(Visuals::dark());

        let start_year = app_config.start_year;
        let end_year = app_config.end_year;
        let mut app = Self {
            app_config,
            request_tx,
            outcome_rx,
            start_year,
            end_year,
            phase: FetchPhase::Idle,
            records: None,
        };
        // initial fetch for the persisted range
        app.request_refetch();
        app
    }

    pub(crate) fn request_refetch(&mut self) {
        self.phase = FetchPhase::Loading;
        let request = FetchRequest {
            start_year: self.start_year,
            end_year: self.end_year,
        };
        if self.request_tx.send(request).is_err() {
            error!(
                "Fetch worker is gone, cannot request {}-{}",
                request.start_year, request.end_year
            );
        }
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Loaded { records, .. } => {
                // wholesale replacement, and any prior error is cleared
                self.records = Some(records);
                self.phase = FetchPhase::Loaded;
            }
            FetchOutcome::Failed { error, .. } => {
                // records stay as they were, the chart goes stale under the banner
                self.phase = FetchPhase::Failed {
                    message: error.to_string(),
                };
            }
        }
    }
}

impl eframe::App for TrendApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.app_config.start_year = self.start_year;
        self.app_config.end_year = self.end_year;
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }

        self.trend_view(ctx, _frame);

        if self.phase == FetchPhase::Loading {
            // keep draining the outcome channel while the worker debounces
            ctx.request_repaint_after(Duration::from_millis(OUTCOME_POLL_MS));
        }
    }
}
