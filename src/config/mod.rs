// ==========================================
// 工作簿数据映射系统 - 配置层
// ==========================================
// 职责: 映射配置与读取器选项的加载和查询
// 存储: JSON 配置文件
// ==========================================

pub mod config_manager;
pub mod import_config_trait;
pub mod mapping_config;

// 重导出核心配置类型
pub use config_manager::ConfigManager;
pub use import_config_trait::ImportConfigReader;
pub use mapping_config::{workbook_name_of, ClassMapping, ReaderOptions};
