//! Service adapters: storage backends and host-side settings discovery.

pub mod file;
pub mod settings;

pub use file::{FileProviders, LocalFileProvider, MemoryFileProvider};
pub use settings::{
    ensure_config_file, ensure_log_dir, get_config_path, get_log_dir, load_config,
    load_config_from, write_default_config,
};
