mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::PhaseProgress;
pub use styling::{dim, magenta_bold};
pub use summary::{print_batch_summary, print_report};

/// Prints the funderfinder banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("💸 funderfinder"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Open-source funding lookup")
    );
}
