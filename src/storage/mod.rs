pub mod sink;

pub use sink::{crash_file_name, is_crash_log_name, persist};
