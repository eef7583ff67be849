//! Terminal progress rendering

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use radio_dl::{DownloadJob, DownloadObserver};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

const NAME_WIDTH: usize = 25;

/// Spinner shown while pages are fetched
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

/// One byte-progress bar per in-flight download
pub struct DownloadBars {
    multi: MultiProgress,
    style: ProgressStyle,
    bars: Mutex<HashMap<usize, ProgressBar>>,
}

impl Default for DownloadBars {
    fn default() -> Self {
        let style = ProgressStyle::with_template(
            "{msg:30} [{bar:40.cyan/blue}] {percent:>3}% • {bytes}/{total_bytes} • {bytes_per_sec} • {eta}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");

        Self {
            multi: MultiProgress::new(),
            style,
            bars: Mutex::new(HashMap::new()),
        }
    }
}

impl DownloadBars {
    fn bar(&self, position: usize) -> Option<ProgressBar> {
        self.bars.lock().ok()?.get(&position).cloned()
    }
}

impl DownloadObserver for DownloadBars {
    fn started(&self, job: &DownloadJob) {
        let pb = self.multi.add(ProgressBar::new(0));
        pb.set_style(self.style.clone());
        pb.set_message(format!("{}. {}", job.index, truncate(&job.broadcast.name)));
        if let Ok(mut bars) = self.bars.lock() {
            bars.insert(job.position, pb);
        }
    }

    fn progress(&self, job: &DownloadJob, written: u64, total: u64) {
        if let Some(pb) = self.bar(job.position) {
            if total > 0 {
                pb.set_length(total);
            }
            pb.set_position(written);
        }
    }

    fn finished(&self, job: &DownloadJob, result: &radio_dl::Result<u64>) {
        let bar = self
            .bars
            .lock()
            .ok()
            .and_then(|mut bars| bars.remove(&job.position));
        if let Some(pb) = bar {
            pb.finish_and_clear();
            self.multi.remove(&pb);
        }

        let line = match result {
            Ok(_) => format!("Downloaded! {}", job.broadcast.name),
            Err(e) => format!("Failed! {}: {}", job.broadcast.name, e),
        };
        let _ = self.multi.println(line);
    }
}

fn truncate(name: &str) -> String {
    name.chars().take(NAME_WIDTH).collect()
}
