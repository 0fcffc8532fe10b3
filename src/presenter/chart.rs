// src/presenter/chart.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, warn};

use crate::parse::{BudgetSummary, MembershipSummary};

pub const MEMBERSHIP_PALETTE: [&str; 7] = [
    "#5E81AC", "#81A1C1", "#88C0D0", "#8FBCBB", "#A3BE8C", "#EBCB8B", "#BF616A",
];

pub const BUDGET_PALETTE: [&str; 14] = [
    "#5E81AC", "#81A1C1", "#88C0D0", "#8FBCBB", "#A3BE8C", "#EBCB8B", "#BF616A", "#D08770",
    "#AF3A03", "#B48EAD", "#6C7086", "#4C566A", "#2E3440", "#3B4252",
];

/// Parallel label/value series, whatever summary it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl From<BudgetSummary> for ChartData {
    fn from(summary: BudgetSummary) -> Self {
        Self {
            labels: summary.expense_labels,
            values: summary.expense_values,
        }
    }
}

impl From<MembershipSummary> for ChartData {
    fn from(summary: MembershipSummary) -> Self {
        Self {
            labels: summary.labels,
            values: summary.values.into_iter().map(|v| v as f64).collect(),
        }
    }
}

/// Colour for segment `i` is `palette[i % palette.len()]`.
pub fn segment_colors(count: usize, palette: &[&'static str]) -> Vec<&'static str> {
    palette.iter().copied().cycle().take(count).collect()
}

/// A doughnut chart, one segment per label.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
}

impl ChartConfig {
    pub fn doughnut(title: &str, data: &ChartData, palette: &[&'static str]) -> Self {
        Self {
            title: title.to_string(),
            labels: data.labels.clone(),
            values: data.values.clone(),
            colors: segment_colors(data.labels.len(), palette),
        }
    }

    /// The same chart as a Chart.js configuration object.
    pub fn to_chartjs(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "doughnut",
            "data": {
                "labels": self.labels,
                "datasets": [{
                    "data": self.values,
                    "backgroundColor": self.colors,
                    "borderColor": "#fff",
                    "borderWidth": 2
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": {
                    "title": { "display": true, "text": self.title },
                    "legend": { "position": "right" }
                }
            }
        })
    }
}

/// Where charts live. A handle stays valid until passed back to `dispose`.
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, config: &ChartConfig) -> Result<Self::Handle>;
    fn dispose(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    /// Legend with proportional bars.
    Text,
    /// Pretty-printed Chart.js config.
    ChartJs,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ChartId(pub u64);

/// Draws each chart once to a writer when it is created.
pub struct TerminalChartBackend<W> {
    out: W,
    format: ChartFormat,
    next_id: u64,
}

const BAR_WIDTH: f64 = 30.0;

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

impl<W: Write> TerminalChartBackend<W> {
    pub fn new(out: W, format: ChartFormat) -> Self {
        Self {
            out,
            format,
            next_id: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_text(&mut self, config: &ChartConfig) -> std::io::Result<()> {
        let total: f64 = config.values.iter().sum();
        let label_width = config.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        writeln!(self.out, "{}", config.title)?;
        for ((label, value), color) in config
            .labels
            .iter()
            .zip(&config.values)
            .zip(&config.colors)
        {
            let share = if total > 0.0 { value / total } else { 0.0 };
            let bar = "#".repeat((share * BAR_WIDTH).round() as usize);
            writeln!(
                self.out,
                "  {} {:<lw$}  {:>10}  {:>5.1}%  {}",
                color,
                label,
                format_value(*value),
                share * 100.0,
                bar,
                lw = label_width
            )?;
        }
        writeln!(self.out, "  total {}", format_value(total))
    }
}

impl<W: Write> ChartBackend for TerminalChartBackend<W> {
    type Handle = ChartId;

    fn create(&mut self, config: &ChartConfig) -> Result<ChartId> {
        match self.format {
            ChartFormat::Text => self.draw_text(config),
            ChartFormat::ChartJs => {
                serde_json::to_writer_pretty(&mut self.out, &config.to_chartjs())?;
                writeln!(self.out)
            }
        }
        .with_context(|| format!("drawing chart {:?}", config.title))?;

        self.next_id += 1;
        debug!(id = self.next_id, title = %config.title, "chart created");
        Ok(ChartId(self.next_id))
    }

    fn dispose(&mut self, handle: ChartId) {
        debug!(id = handle.0, "chart disposed");
        if let Err(e) = self.out.flush() {
            warn!(id = handle.0, error = %e, "flushing chart output failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_cycle_through_palette() {
        let colors = segment_colors(9, &MEMBERSHIP_PALETTE);
        assert_eq!(colors.len(), 9);
        assert_eq!(colors[6], "#BF616A");
        assert_eq!(colors[7], MEMBERSHIP_PALETTE[0]);
        assert_eq!(colors[8], MEMBERSHIP_PALETTE[1]);
        assert!(segment_colors(3, &[]).is_empty());
    }

    #[test]
    fn summaries_map_one_to_one() {
        let membership = MembershipSummary {
            labels: vec!["Pledges".into(), "Brothers".into()],
            values: vec![12, 40],
            total: 52,
        };
        let data = ChartData::from(membership);
        assert_eq!(data.labels, vec!["Pledges", "Brothers"]);
        assert_eq!(data.values, vec![12.0, 40.0]);
    }

    #[test]
    fn chartjs_config_shape() {
        let data = ChartData {
            labels: vec!["Venue".into()],
            values: vec![1200.0],
        };
        let cfg = ChartConfig::doughnut("Expense Breakdown", &data, &BUDGET_PALETTE);
        let js = cfg.to_chartjs();
        assert_eq!(js["type"], "doughnut");
        assert_eq!(js["data"]["datasets"][0]["backgroundColor"][0], "#5E81AC");
        assert_eq!(js["options"]["plugins"]["title"]["text"], "Expense Breakdown");
    }

    #[test]
    fn text_backend_draws_legend() -> Result<()> {
        let data = ChartData {
            labels: vec!["Venue".into(), "Food".into()],
            values: vec![1500.0, 500.5],
        };
        let cfg = ChartConfig::doughnut("Expense Breakdown", &data, &BUDGET_PALETTE);
        let mut backend = TerminalChartBackend::new(Vec::new(), ChartFormat::Text);
        let id = backend.create(&cfg)?;
        backend.dispose(id);

        let out = String::from_utf8(backend.into_inner())?;
        assert!(out.starts_with("Expense Breakdown\n"));
        assert!(out.contains("#5E81AC Venue"));
        assert!(out.contains("500.50"));
        assert!(out.contains("75.0%"));
        assert!(out.trim_end().ends_with("total 2000.50"));
        Ok(())
    }

    /// Accepts writes, refuses to flush.
    struct StuckWriter {
        flushes: usize,
    }

    impl Write for StuckWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn dispose_survives_a_failed_flush() -> Result<()> {
        let cfg = ChartConfig::doughnut("Members", &ChartData::default(), &MEMBERSHIP_PALETTE);
        let mut backend =
            TerminalChartBackend::new(StuckWriter { flushes: 0 }, ChartFormat::Text);
        let id = backend.create(&cfg)?;
        backend.dispose(id);
        assert_eq!(backend.into_inner().flushes, 1);
        Ok(())
    }

    #[test]
    fn json_backend_emits_chartjs() -> Result<()> {
        let cfg = ChartConfig::doughnut("Members", &ChartData::default(), &MEMBERSHIP_PALETTE);
        let mut backend = TerminalChartBackend::new(Vec::new(), ChartFormat::ChartJs);
        assert_eq!(backend.create(&cfg)?, ChartId(1));
        assert_eq!(backend.create(&cfg)?, ChartId(2));
        let out = String::from_utf8(backend.into_inner())?;
        let first = serde_json::Deserializer::from_str(&out)
            .into_iter::<serde_json::Value>()
            .next()
            .unwrap()?;
        assert_eq!(first["options"]["plugins"]["title"]["text"], "Members");
        Ok(())
    }
}
