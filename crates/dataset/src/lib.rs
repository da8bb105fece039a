pub mod csv_store;
pub mod errors;

pub use csv_store::{
    read_commits, read_dataset, read_issues, write_commits, write_dataset, write_issues, Tabular,
};
pub use errors::DatasetError;
