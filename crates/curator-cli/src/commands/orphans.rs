//! Orphans command implementation.

use crate::cli::LibraryArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use curator_pipeline::find_orphans;

/// Execute the orphans command.
pub fn execute_orphans(args: LibraryArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let policy = config.load_policy(args.policy.as_deref())?;
    let library = config.library_folder(args.dest);

    let orphans = find_orphans(
        &config.group_folder(&library),
        &policy.category_names(),
        &config.ledger(&library),
        &config.pipeline.document_extension,
    )?;

    println!("{}", formatter.format_orphans(&orphans)?);
    Ok(())
}
