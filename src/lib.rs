//! filepanel - 多后端 workspace 文件面板库
//!
//! 模块结构：
//! - kernel::services: Provider 契约、存储后端、配置、事件总线
//! - kernel::file_manager: 打开的标签页与当前文件
//! - kernel::workspace: workspace 生命周期
//! - kernel::bootstrap: 启动时选择第一个 workspace
//! - kernel::panel: 面向宿主的入口（FilePanel）

pub mod kernel;
