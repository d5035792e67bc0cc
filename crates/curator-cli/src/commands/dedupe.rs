//! Dedupe command implementation.

use crate::cli::DedupeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use curator_dedup::{DedupConfig, DedupError, Deduplicator};

/// Execute the dedupe command.
pub fn execute_dedupe(args: DedupeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let policy = config.load_policy(args.policy.as_deref())?;
    let library = config.library_folder(args.dest);
    let group = config.group_folder(&library);

    let dedup = Deduplicator::new(DedupConfig {
        extension: config.pipeline.document_extension.clone(),
        dry_run: args.dry_run,
    });

    if !args.skip_storage {
        let report = dedup.dedupe_storage(&group, &policy.category_names())?;
        println!("{}", formatter.format_storage_report(&report)?);
    }

    if !args.skip_ledger {
        match dedup.dedupe_ledger(&config.ledger(&library)) {
            Ok(outcome) => println!("{}", formatter.format_ledger_outcome(&outcome)?),
            Err(DedupError::LedgerNotFound(path)) => {
                eprintln!(
                    "{}",
                    formatter.warning(&format!("No ledger at {}, skipped", path.display()))
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
