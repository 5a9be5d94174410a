pub mod file_utils;
pub mod table;

pub use file_utils::{archive_results, load_results, sanitize_filename, save_results};
pub use table::score_table;
