use indicatif::style::TemplateError;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Terminal progress over the instruments of one run; hidden unless the binary runs in
/// tui mode.
pub struct Progress {
    _multi: Option<MultiProgress>,
    total: ProgressBar,
    success: ProgressBar,
    fails: ProgressBar,
}

impl Progress {
    pub fn hidden() -> Self {
        Self {
            _multi: None,
            total: ProgressBar::hidden(),
            success: ProgressBar::hidden(),
            fails: ProgressBar::hidden(),
        }
    }

    /// Three stacked bars: total, successes and failures.
    pub fn bars(len: usize) -> Result<Self, TemplateError> {
        let multi = MultiProgress::new();

        let total = multi.add(
            ProgressBar::new(len as u64).with_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.magenta}\n \
                        {msg:>9.white} |{bar:57.white/grey}| {pos:<2} / {human_len} \
                        ({percent_precise}%) [Time: {elapsed}, ETA: {eta}]",
                    )?
                    .progress_chars("## "),
            ),
        );
        total.set_message("total");
        total.enable_steady_tick(Duration::from_millis(100));

        let success = multi.insert_after(
            &total,
            ProgressBar::new(len as u64).with_style(
                ProgressStyle::default_bar()
                    .template(" {msg:>9.green} |{bar:57.green}| {pos:<2.green}")?
                    .progress_chars("## "),
            ),
        );
        success.set_message("successes");

        let fails = multi.insert_after(
            &success,
            ProgressBar::new(len as u64).with_style(
                ProgressStyle::default_bar()
                    .template(" {msg:>9.red} |{bar:57.red}| {pos:<2.red}")?
                    .progress_chars("## "),
            ),
        );
        fails.set_message("failures");

        Ok(Self {
            _multi: Some(multi),
            total,
            success,
            fails,
        })
    }

    pub fn succeeded(&self) {
        self.success.inc(1);
        self.total.inc(1);
    }

    pub fn failed(&self) {
        self.fails.inc(1);
        self.total.inc(1);
    }

    pub fn finish(&self) {
        self.total.finish_and_clear();
        self.success.finish_and_clear();
        self.fails.finish_and_clear();
    }
}

