//! Dataset module - typed columns, tables and file IO

mod column;
pub mod frame;
pub mod loader;
mod table;

pub(crate) use column::check_unique_categories;
pub use column::{parse_datetime, Categorical, Column, ColumnData, SemanticType};
pub use frame::{dataset_from_frame, dataset_to_frame};
pub use loader::{load_dataset, load_dataset_with_stats, save_dataset};
pub use table::Dataset;
