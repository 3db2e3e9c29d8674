pub mod settings;

pub use settings::{HandlerConfig, TomlConfig, TomlDirectoryConfig, TomlHandlerConfig};
