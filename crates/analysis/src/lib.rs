pub mod errors;
pub mod reporter;
pub mod stats;
pub mod timeline;

pub use errors::AnalysisError;
pub use reporter::{summarize, Summary, SummaryReport, SummaryReporter};
pub use stats::{average_open_duration, close_rate, top_committers, CommitterCount};
pub use timeline::{day_key, outer_join_by_day, MergedRow};
