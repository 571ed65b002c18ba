//! Console output utilities.

use console::style;

use crate::config::Config;
use crate::media::Page;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     GoPro Archiver                                    ║
║     Bulk download of the GoPro cloud media library    ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(config: &Config) {
    let options = &config.options;
    let pages = match options.pages {
        Some(n) => n.to_string(),
        None => "all".to_string(),
    };

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Action: {}", options.action);
    println!(
        "  Pages: {} from page {} ({} per page)",
        pages, options.start_page, options.per_page
    );
    println!("  Directory: {}", options.download_path.display());
    println!("  Progress: {}", options.progress_mode);
    println!("  Max retries: {}", options.max_retries);
    println!();
}

/// Print the media of one page.
pub fn print_page_listing(page: &Page) {
    println!(
        "{} ({}): {}",
        style(format!("page {}", page.number)).bold(),
        format_page_size(page),
        format_filenames(page)
    );
}

fn format_page_size(page: &Page) -> String {
    match page.total_size() {
        Some(bytes) if !page.is_empty() => format!(
            "{} items, {:.2}MB",
            page.len(),
            bytes as f64 / 1024.0 / 1024.0
        ),
        _ => format!("{} items", page.len()),
    }
}

fn format_filenames(page: &Page) -> String {
    if page.is_empty() {
        return style("<empty>").dim().to_string();
    }
    page.filenames().join(", ")
}
