//! Init command implementation.

use crate::cli::LibraryArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use curator_pipeline::initialize_category_folders;

/// Execute the init command.
pub fn execute_init(args: LibraryArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let policy = config.load_policy(args.policy.as_deref())?;
    let library = config.library_folder(args.dest);
    let group = config.group_folder(&library);

    let names = policy.category_names();
    initialize_category_folders(&group, &names)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Created {} category folder(s) in {}",
            names.len(),
            group.display()
        ))
    );
    Ok(())
}
