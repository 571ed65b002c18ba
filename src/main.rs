//! GoPro Archiver - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use gopro_archiver::{
    api::MediaApi,
    cli::{spawn_interrupt_handler, Args},
    config::{validate_config, Action, Config},
    download::{download_pages, enumerate, ArchiveFetcher},
    error::{exit_codes, Result},
    fs::ensure_dir,
    output::{
        print_banner, print_catalog_summary, print_config_summary, print_error, print_info,
        print_page_listing, print_run_stats, print_success, print_warning, ConsoleObserver,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using defaults",
            config_path.display()
        );
        Config::default()
    };

    // Merge CLI arguments and environment into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;
    print_config_summary(&config);

    let cancel = CancellationToken::new();
    let interrupt = spawn_interrupt_handler(cancel.clone());

    let result = execute(&config, &cancel).await;

    // Release the Ctrl-C listener
    interrupt.abort();

    result
}

async fn execute(config: &Config, cancel: &CancellationToken) -> Result<i32> {
    // Initialize API client
    let api = MediaApi::new(
        config.credential(),
        &config.api.base_url,
        &config.api.user_agent,
    )?;

    print_info("Validating session...");
    api.validate().await?;
    print_success("Session is valid");

    let observer = ConsoleObserver::new(config.options.progress_mode);
    let catalog = enumerate(&api, &config.page_window(), cancel, &observer).await?;

    if catalog.is_empty() {
        print_warning("No pages in the requested range");
    }

    match config.options.action {
        Action::List => {
            for page in catalog.pages() {
                print_page_listing(page);
            }
            print_catalog_summary(&catalog);
            Ok(exit_codes::SUCCESS)
        }
        Action::Download => {
            let dir = &config.options.download_path;
            ensure_dir(dir).await?;

            let fetcher = ArchiveFetcher::new(&api, config.retry_policy());
            let stats = download_pages(&fetcher, &catalog, dir, cancel, &observer).await?;
            print_run_stats(&stats);

            if stats.pages_failed() > 0 {
                print_warning(&format!(
                    "{} page(s) could not be downloaded",
                    stats.pages_failed()
                ));
                return Ok(exit_codes::PAGES_FAILED);
            }

            Ok(exit_codes::SUCCESS)
        }
    }
}
