pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod output;

pub use context::SpanlexCliContext;
pub use output::{
    CliColors, format_error, format_info, format_success, format_warning, output_error,
    output_error_json, print_rule_table, print_span_list,
};
