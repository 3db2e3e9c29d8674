pub mod paths;

pub use paths::{config_path, crash_logs_dir, data_dir, init_data_dir, log_file_path, logs_dir};
