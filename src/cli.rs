//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the engine.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_algorithm_mismatch_json, format_algorithm_mismatch_text, format_comparison_json,
    format_comparison_text, format_digest_line, format_history_json, format_history_text,
    format_not_enough_history_json, format_snapshot_report, NOT_ENOUGH_HISTORY,
};
pub use route::RunContext;
