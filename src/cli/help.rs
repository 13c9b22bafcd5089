//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string for log spans (e.g. "snapshot", "compare").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Snapshot { .. } => "snapshot",
        Commands::Digest { .. } => "digest",
        Commands::Compare { .. } => "compare",
        Commands::History { .. } => "history",
    }
}
