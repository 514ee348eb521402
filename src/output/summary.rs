use std::fmt::Write;
use std::path::Path;

use comfy_table::{Cell, Color as TableColor};

use crate::batch::{ERRORS_FILE, PROJECTS_FILE, STATLESS_FILE};
use crate::funding::{FundingReport, ResultSet};

use super::styling::{bright, bright_green, bright_red, bright_yellow, dim};
use super::tables::{color_coded_amount_cell, color_coded_count_cell, create_table, header_cells};

/// Errors listed before the rest are elided.
const MAX_LISTED_ERRORS: usize = 10;

/// Prints a single-project funding report to stdout.
///
/// Shows the project header, then one row per date window with the
/// contributor count and amount received in that window.
pub fn print_report(report: &FundingReport) {
    println!("{}", render_report(report));
}

/// Prints counts for each bucket of a batch run plus the first errors.
pub fn print_batch_summary(results: &ResultSet, dir: &Path) {
    println!("{}", render_batch_summary(results, dir));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn render_report(report: &FundingReport) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📦", "Project");
    let _ = writeln!(output, "  {} {}", dim("Project:"), report.project);
    let _ = writeln!(output, "  {} {}", dim("Owner:"), report.owner);
    let _ = writeln!(output, "  {} {}", dim("Slug:"), report.slug);
    let _ = writeln!(output, "  {} {}", dim("Source:"), report.source);
    let _ = writeln!(
        output,
        "  {} {}",
        dim("Retrieved:"),
        report.retrieved_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    output.push('\n');

    if !report.is_funded {
        let _ = writeln!(
            output,
            "{}",
            bright_yellow(format!("No funding found on {}", report.source))
        );
        return output;
    }

    add_section_header(&mut output, "💰", "Funding by window");
    let mut table = create_table();
    table.set_header(header_cells(&["From", "To", "Contributors", "Amount (USD)"]));
    for point in &report.stats {
        table.add_row(vec![
            Cell::new(point.date_from.format("%Y-%m-%d")),
            Cell::new(point.date_to.format("%Y-%m-%d")),
            Cell::new(point.num_contributors),
            color_coded_amount_cell(point.amount_usd),
        ]);
    }
    let _ = writeln!(output, "{table}");

    let _ = writeln!(
        output,
        "{} {} {}",
        bright_green("Total received:"),
        bright(format!("${:.2}", report.total_amount_usd())),
        dim(format!("(up to {} contributors)", report.max_contributors()))
    );

    output
}

fn render_batch_summary(results: &ResultSet, dir: &Path) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📊", "Batch Summary");
    let mut table = create_table();
    table.set_header(header_cells(&["Bucket", "Collectives", "File"]));
    table.add_row(vec![
        Cell::new("Funded"),
        color_coded_count_cell(results.funded.len(), TableColor::Green),
        Cell::new(dir.join(PROJECTS_FILE).display()),
    ]);
    table.add_row(vec![
        Cell::new("Unfunded"),
        color_coded_count_cell(results.unfunded.len(), TableColor::Yellow),
        Cell::new(dir.join(STATLESS_FILE).display()),
    ]);
    table.add_row(vec![
        Cell::new("Errored"),
        color_coded_count_cell(results.errored.len(), TableColor::Red),
        Cell::new(dir.join(ERRORS_FILE).display()),
    ]);
    let _ = writeln!(output, "{table}");
    let _ = writeln!(output, "  {} {}", dim("Processed:"), results.total());

    if !results.errored.is_empty() {
        output.push('\n');
        add_section_header(&mut output, "⚠️", "Errors");
        for entry in results.errored.iter().take(MAX_LISTED_ERRORS) {
            let _ = writeln!(output, "  {} {}", bright_red(&entry.slug), dim(&entry.error));
        }
        let remaining = results.errored.len().saturating_sub(MAX_LISTED_ERRORS);
        if remaining > 0 {
            let _ = writeln!(output, "  {}", dim(format!("... and {remaining} more")));
        }
    }

    output
}
