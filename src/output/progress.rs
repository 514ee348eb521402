use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Progress tracking for the two batch phases
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start_listing() -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        let pb = create_spinner(bright_yellow("Phase 1/2: Listing collectives").to_string());
        Self { pb }
    }

    pub fn finish_listing(self, count: usize) {
        self.pb.finish_with_message(
            bright_green(format!("Phase 1/2: Listed {count} collectives ✓")).to_string(),
        );
    }

    pub fn start_stats(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {prefix} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        pb.set_prefix(bright_yellow("Phase 2/2: Fetching funding stats").to_string());
        Self { pb }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.pb
    }

    pub fn finish_stats(self) {
        self.pb.set_prefix(bright_green("Phase 2/2: Funding stats fetched ✓").to_string());
        self.pb.finish_with_message("");
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
