//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::{OutputFormat, ShelfScoutConfig};
use crate::error::Result;
use crate::output::Formatter;
use crate::services::Services;
use shelfscout_batch::{load_items, BatchCoordinator, JsonLinesSink};
use tokio::sync::watch;
use tracing::warn;

/// Execute the run command.
///
/// Ctrl-C stops the batch between items; records produced so far are kept.
pub async fn execute_run(
    args: RunArgs,
    config: &ShelfScoutConfig,
    formatter: &Formatter,
) -> Result<()> {
    let batch = args.batch_config(&config.batch);
    let items = load_items(&args.input)?;
    let pipeline = Services::from_config(config)?.into_pipeline();

    let mut sink = if args.append {
        JsonLinesSink::append(&args.output)?
    } else {
        JsonLinesSink::create(&args.output)?
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing current item");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut coordinator = BatchCoordinator::new(pipeline, batch)?.with_shutdown(shutdown_rx);
    if formatter.format() == OutputFormat::Table {
        let progress_formatter = *formatter;
        coordinator = coordinator.with_progress(move |progress| {
            eprintln!("{}", progress_formatter.progress(progress));
        });
    }

    let report = coordinator.run(&items, &mut sink).await;
    signal.abort();

    println!("{}", formatter.format_metrics(&report.metrics)?);

    if formatter.format() != OutputFormat::Quiet {
        if report.interrupted {
            eprintln!("{}", formatter.warning("Run interrupted; remaining items were not processed"));
        }
        eprintln!(
            "{}",
            formatter.info(&format!(
                "{} record(s) written to {} (run {})",
                sink.written(),
                sink.path().display(),
                report.run_id
            ))
        );
    }

    Ok(())
}
