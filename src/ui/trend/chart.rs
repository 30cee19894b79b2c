use egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use itertools::Itertools;

use crate::population::PopulationRecord;

use super::{FetchPhase, MAX_YEAR, MIN_YEAR, TrendApp};

pub(crate) const PHASE_COUNT: usize = 5;

// IPC severity palette, phase 1 (least severe) to phase 5 (most severe)
pub(crate) const PHASE_COLORS: [Color32; PHASE_COUNT] = [
    Color32::from_rgb(0xff, 0xff, 0xff),
    Color32::from_rgb(0xff, 0xff, 0x00),
    Color32::from_rgb(0xff, 0xa5, 0x00),
    Color32::from_rgb(0xff, 0x00, 0x00),
    Color32::from_rgb(0x8b, 0x00, 0x00),
];

pub(crate) struct PhaseSeries {
    pub(crate) label: String,
    pub(crate) color: Color32,
    pub(crate) points: Vec<[f64; 2]>,
}

/// One series per phase, all aligned to the shared date axis (x is the
/// record index, labeled with `analysis_date`).
pub(crate) fn phase_series(records: &[PopulationRecord]) -> Vec<PhaseSeries> {
    (1..=PHASE_COUNT)
        .map(|phase| PhaseSeries {
            label: format!("Phase {phase}"),
            color: PHASE_COLORS[phase - 1],
            points: records
                .iter()
                .enumerate()
                .map(|(index, record)| [index as f64, record.phase_population(phase) as f64])
                .collect(),
        })
        .collect()
}

/// Tooltip content for a hovered point: the phase label, the formatted
/// population count, and the percentage when the record carries one.
pub(crate) fn tooltip_lines(phase: usize, record: &PopulationRecord) -> Vec<String> {
    let mut lines = vec![format!("Phase {phase}")];
    lines.push(format!(
        "Number of population: {}",
        format_count(record.phase_population(phase))
    ));
    if let Some(fraction) = record.population_percentage {
        lines.push(format!(
            "Percentage of population: {}",
            format_percentage(fraction)
        ));
    }
    lines
}

/// Groups digits in threes, 1234567 -> "1,234,567".
pub(crate) fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// The API reports a fraction; scale to percent and trim float noise so
/// 0.42 renders as "42%" and 0.425 as "42.5%".
pub(crate) fn format_percentage(fraction: f64) -> String {
    let percent = (fraction * 100.0 * 100.0).round() / 100.0;
    let mut text = format!("{percent:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{text}%")
}

/// Resolves a plot pointer position to the nearest record index (by x) and
/// the phase whose value at that index is closest (by y). Phases are 1-5.
pub(crate) fn nearest_point(series: &[PhaseSeries], x: f64, y: f64) -> Option<(usize, usize)> {
    let len = series.first()?.points.len();
    if len == 0 {
        return None;
    }
    let index = x.round().clamp(0., (len - 1) as f64) as usize;
    let phase_idx = series.iter().position_min_by(|a, b| {
        let da = (a.points[index][1] - y).abs();
        let db = (b.points[index][1] - y).abs();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })?;
    Some((phase_idx + 1, index))
}

impl TrendApp {
    pub(crate) fn trend_view(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.header(ui);
            ui.add_space(6.);
            self.range_selectors(ui);
            ui.add_space(10.);
            self.population_chart(ui);
        });
    }

    fn header(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if self.records.is_some() {
                ui.heading(format!(
                    "Trend Graph for {}",
                    self.app_config.country_label()
                ));
            } else {
                ui.heading(format!(
                    "Loading data for {}...",
                    self.app_config.country_label()
                ));
            }
            if self.phase == FetchPhase::Loading {
                ui.add(egui::Spinner::new());
            }
        });
        if let FetchPhase::Failed { message } = &self.phase {
            ui.colored_label(Color32::RED, message);
        }
    }

    fn range_selectors(&mut self, ui: &mut Ui) {
        let previous = (self.start_year, self.end_year);

        let start_max = self.end_year;
        ui.horizontal(|ui| {
            ui.label("Start Year:");
            ui.add(egui::Slider::new(&mut self.start_year, MIN_YEAR..=start_max));
        });
        ui.horizontal(|ui| {
            ui.label("End Year:");
            ui.add(egui::Slider::new(&mut self.end_year, MIN_YEAR..=MAX_YEAR));
        });
        // the start slider follows the end slider downwards
        self.start_year = self.start_year.min(self.end_year);

        if (self.start_year, self.end_year) != previous {
            self.request_refetch();
        }
    }

    fn population_chart(&self, ui: &mut Ui) {
        let Some(records) = self.records.as_ref() else {
            return;
        };

        let series = phase_series(records);
        let axis_labels: Vec<String> =
            records.iter().map(|r| r.analysis_date.clone()).collect();

        let plot = Plot::new("population_trend")
            .legend(Legend::default())
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .include_y(0.)
            .x_axis_formatter(move |mark, _range| {
                // grid marks land between records too, only label the indexes
                if mark.value < 0. || (mark.value - mark.value.round()).abs() > 1e-6 {
                    return String::new();
                }
                axis_labels
                    .get(mark.value.round() as usize)
                    .cloned()
                    .unwrap_or_default()
            });

        let plot_response = plot.show(ui, |plot_ui| {
            for s in &series {
                plot_ui.line(
                    Line::new(s.label.clone(), PlotPoints::new(s.points.clone())).color(s.color),
                );
            }
            plot_ui.pointer_coordinate()
        });

        if let Some(pointer) = plot_response.inner {
            if let Some((phase, index)) = nearest_point(&series, pointer.x, pointer.y) {
                let lines = tooltip_lines(phase, &records[index]);
                plot_response.response.on_hover_ui_at_pointer(|ui| {
                    for line in lines {
                        ui.label(line);
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PopulationRecord {
        PopulationRecord {
            analysis_date: "2021-03-01".to_string(),
            phase1_population: 100,
            phase2_population: 200,
            phase3_population: 0,
            phase4_population: 0,
            phase5_population: 0,
            population_percentage: Some(0.42),
        }
    }

    #[test]
    fn test_tooltip_shows_count_and_percentage() {
        let lines = tooltip_lines(1, &sample_record());
        assert_eq!(
            lines,
            vec![
                "Phase 1".to_string(),
                "Number of population: 100".to_string(),
                "Percentage of population: 42%".to_string(),
            ]
        );
    }

    #[test]
    fn test_tooltip_omits_missing_percentage() {
        let mut record = sample_record();
        record.population_percentage = None;
        let lines = tooltip_lines(2, &record);
        assert_eq!(
            lines,
            vec![
                "Phase 2".to_string(),
                "Number of population: 200".to_string(),
            ]
        );
    }

    #[test]
    fn test_format_count_groups_digits() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(100), "100");
        assert_eq!(format_count(1234), "1,234");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_percentage_trims_float_noise() {
        assert_eq!(format_percentage(0.42), "42%");
        assert_eq!(format_percentage(0.425), "42.5%");
        assert_eq!(format_percentage(1.0), "100%");
        assert_eq!(format_percentage(0.0), "0%");
    }

    #[test]
    fn test_phase_series_are_aligned_to_the_date_axis() {
        let records = vec![
            sample_record(),
            PopulationRecord {
                analysis_date: "2021-09-01".to_string(),
                phase1_population: 110,
                phase5_population: 7,
                ..Default::default()
            },
        ];
        let series = phase_series(&records);

        assert_eq!(series.len(), PHASE_COUNT);
        for (i, s) in series.iter().enumerate() {
            assert_eq!(s.label, format!("Phase {}", i + 1));
            assert_eq!(s.color, PHASE_COLORS[i]);
            assert_eq!(s.points.len(), records.len());
            assert_eq!(s.points[0][0], 0.);
            assert_eq!(s.points[1][0], 1.);
        }
        assert_eq!(series[0].points[1][1], 110.);
        assert_eq!(series[4].points[1][1], 7.);
    }

    #[test]
    fn test_nearest_point_picks_closest_index_and_phase() {
        let records = vec![
            sample_record(),
            PopulationRecord {
                analysis_date: "2021-09-01".to_string(),
                phase1_population: 100,
                phase2_population: 500,
                ..Default::default()
            },
        ];
        let series = phase_series(&records);

        // right next to the phase 2 value on the second record
        assert_eq!(nearest_point(&series, 1.2, 480.), Some((2, 1)));
        // pointer x past the last record clamps to it
        assert_eq!(nearest_point(&series, 7., 95.), Some((1, 1)));
        assert_eq!(nearest_point(&phase_series(&[]), 0., 0.), None);
    }
}
