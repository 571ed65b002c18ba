//! Statistics reporting.

use console::style;

use crate::download::RunStats;
use crate::media::Catalog;

/// Print what the enumeration found.
pub fn print_catalog_summary(catalog: &Catalog) {
    let pages = catalog.len();
    let items = catalog.total_items();
    let known_bytes: u64 = catalog
        .pages()
        .flat_map(|page| page.items.iter())
        .filter_map(|item| item.file_size)
        .sum();

    println!();
    println!("{}", style("Library:").bold());
    println!(
        "  Pages listed: {} of {} on the server",
        pages,
        catalog.total_pages()
    );
    println!("  Items:        {}", items);
    println!("  Size:         {}", format_megabytes(known_bytes));
}

/// Print statistics for a download run.
pub fn print_run_stats(stats: &RunStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Download Statistics:").bold());
    println!("  Pages:       {}", stats.pages_listed);
    println!("  Downloaded:  {}", stats.pages_downloaded);
    println!("  Verified:    {} (already complete)", stats.pages_verified);
    if stats.pages_skipped > 0 {
        println!("  Skipped:     {} (empty)", stats.pages_skipped);
    }
    if stats.pages_failed() > 0 {
        println!("  Failed:      {}", style(stats.pages_failed()).red());
        for failure in &stats.failures {
            println!(
                "    page {} ({}): {}",
                failure.page,
                failure.path,
                style(&failure.reason).red()
            );
        }
    }
    println!("  Transferred: {}", format_megabytes(stats.bytes_downloaded));
    println!("{}", style("═".repeat(50)).dim());
}

fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}MB", bytes as f64 / 1024.0 / 1024.0)
}
