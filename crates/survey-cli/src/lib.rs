//! Terminal page shell for the recommendation survey

mod shell;
mod ui;


pub use shell::{apply_fields, apply_ratings, parse_assignment, render_from_results};
pub use ui::{
    display_banner, format_outcome, format_report, print_page_summary, ConsoleNotifier,
    SystemNavigator,
};

// Re-export core types
pub use survey_core::{Error, Result};
