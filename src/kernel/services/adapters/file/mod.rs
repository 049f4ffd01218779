//! 文件服务模块
//!
//! 提供存储后端实现（内存、本地）以及按类型查找的 Provider 表

pub mod local;
pub mod memory;
pub mod service;

pub use local::LocalFileProvider;
pub use memory::MemoryFileProvider;
pub use service::FileProviders;
