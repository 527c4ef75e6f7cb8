//! indicatif による進捗表示
//!
//! ProgressObserver を実装し、1行ごとにバーを進める。

use crate::batch::ProgressObserver;
use bridge_geo_common::{BatchReport, ResolutionResult};
use indicatif::{ProgressBar, ProgressStyle};

pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for BarProgress {
    fn on_start(&mut self, total: usize) {
        self.bar = ProgressBar::new(total as u64);
        self.bar.set_style(
            ProgressStyle::with_template("  {msg} {wide_bar:.cyan/dim} {pos}/{len} [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
    }

    fn on_row(&mut self, _index: usize, _total: usize, result: &ResolutionResult) {
        let record = result.record();
        let mark = match result {
            ResolutionResult::Success(..) => "✔".to_string(),
            ResolutionResult::Failure(_, reason) => format!("✘ {}", reason.label()),
            ResolutionResult::CandidateSet(_, features) => format!("候補{}件", features.len()),
        };
        self.bar.set_message(format!("{} {}", record.name, mark));
        self.bar.inc(1);
    }

    fn on_finish(&mut self, _report: &BatchReport) {
        self.bar.finish_and_clear();
    }
}
