//! Extract command implementation.

use crate::cli::QueryArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::services::Services;

/// Execute the extract command.
pub async fn execute_extract(
    args: QueryArgs,
    services: &Services,
    formatter: &Formatter,
) -> Result<()> {
    let intent = services.extractor().extract_intent(&args.text()).await?;
    println!("{}", formatter.format_intent(&intent)?);
    Ok(())
}
