//! Prompt command implementation.

use crate::cli::PromptArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use curator_classifier::PromptBuilder;

/// Execute the prompt command.
pub fn execute_prompt(args: PromptArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let policy = config.load_policy(args.policy.as_deref())?;
    let prompt = PromptBuilder::new(&policy).build();
    println!("{}", formatter.format_prompt(&prompt)?);
    Ok(())
}
