//! Progress bar for benchmark runs

use indicatif::{ProgressBar, ProgressStyle};
use lcr_core::{PipelineEvent, ProgressCallback};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}";

/// Live view of a pipeline run; failed tasks are printed above the bar
pub struct RunProgress {
    bar: ProgressBar,
}

impl RunProgress {
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(status_message(0, None));
        Self { bar }
    }

    /// Callback that feeds pipeline events into the bar
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Box::new(move |event| apply_event(&bar, event))
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

fn apply_event(bar: &ProgressBar, event: PipelineEvent) {
    match event {
        PipelineEvent::Started { total } => bar.set_length(total as u64),
        PipelineEvent::Recorded {
            completed,
            failed,
            stats,
            ..
        } => {
            bar.set_position(completed as u64);
            bar.set_message(status_message(failed, Some(stats.accuracy_label())));
        }
        PipelineEvent::Failed {
            question_id,
            error,
            completed,
            failed,
            ..
        } => {
            bar.println(failure_line(&question_id, &error));
            bar.set_position(completed as u64);
            bar.set_message(status_message(failed, None));
        }
    }
}

fn status_message(failed: usize, accuracy: Option<String>) -> String {
    match accuracy {
        Some(accuracy) => format!("failed={} acc={}", failed, accuracy),
        None => format!("failed={}", failed),
    }
}

pub fn failure_line(question_id: &str, error: &str) -> String {
    format!("FAILED [QID: {}]: {}", question_id, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcr_core::{RecordVerdict, StatsHeader};

    #[test]
    fn test_failure_line_format() {
        assert_eq!(
            failure_line("17", "TerminalCallFailure: boom"),
            "FAILED [QID: 17]: TerminalCallFailure: boom"
        );
    }

    #[test]
    fn test_events_update_bar() {
        let progress = RunProgress::new(0);
        progress.bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        let callback = progress.callback();

        callback(PipelineEvent::Started { total: 3 });
        callback(PipelineEvent::Failed {
            question_id: "1".to_string(),
            error: "boom".to_string(),
            completed: 1,
            total: 3,
            failed: 1,
        });
        callback(PipelineEvent::Recorded {
            question_id: "2".to_string(),
            verdict: RecordVerdict::Correct,
            completed: 2,
            total: 3,
            failed: 1,
            stats: StatsHeader::new(1, 1),
        });

        assert_eq!(progress.bar.length(), Some(3));
        assert_eq!(progress.bar.position(), 2);
        assert_eq!(progress.bar.message(), "failed=1 acc=100.00%");
    }
}
