//! Check command implementation.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::services::Services;
use shelfscout_domain::traits::LlmProvider;

const PING_PROMPT: &str = "Reply with the single word: ok";

/// Execute the check command.
pub async fn execute_check(services: &Services, formatter: &Formatter) -> Result<()> {
    let mut failed = 0;

    let model = services.provider().model_name().to_string();
    match services.provider().generate(PING_PROMPT).await {
        Ok(_) => println!("{}", formatter.success(&format!("LLM '{}' responded", model))),
        Err(e) => {
            failed += 1;
            println!("{}", formatter.error(&format!("LLM '{}': {}", model, e)));
        }
    }

    let endpoint = &services.catalog().config().endpoint;
    match services.catalog().test_connection().await {
        Ok(products) => println!(
            "{}",
            formatter.success(&format!(
                "Catalog {} reachable ({} product(s) for a test query)",
                endpoint, products
            ))
        ),
        Err(e) => {
            failed += 1;
            println!("{}", formatter.error(&format!("Catalog {}: {}", endpoint, e)));
        }
    }

    if failed > 0 {
        return Err(CliError::CheckFailed { failed, total: 2 });
    }
    Ok(())
}
