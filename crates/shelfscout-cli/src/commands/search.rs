//! Search command implementation.

use crate::cli::QueryArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::Services;

/// Execute the search command.
///
/// The record is printed even when a stage failed; the failure is then
/// returned so the process exits non-zero.
pub async fn execute_search(
    args: QueryArgs,
    services: &Services,
    formatter: &Formatter,
) -> Result<()> {
    let record = services.pipeline().process_query(&args.text()).await;
    println!("{}", formatter.format_record(&record)?);

    if record.is_success() {
        return Ok(());
    }
    Err(CliError::ItemFailed {
        stage: record
            .failure
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        message: record.error_message.unwrap_or_default(),
    })
}
