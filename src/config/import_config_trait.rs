// ==========================================
// 工作簿数据映射系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义读取器与映射器所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::mapping_config::{ClassMapping, ReaderOptions};
use crate::importer::error::ImportResult;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入与映射所需的配置读取接口
// 实现者: ConfigManager（从 JSON 配置文件读取）
pub trait ImportConfigReader: Send + Sync {
    /// 获取读取器选项
    ///
    /// # 默认值
    /// - separator: '\t'
    /// - infer_cell_types: false
    /// - temp_file_prefix: "~$"
    fn reader_options(&self) -> ReaderOptions;

    /// 按输出集合名获取映射配置
    ///
    /// # 返回
    /// - Ok(ClassMapping): 配置存在
    /// - Err(ConfigReadError): 未声明该集合
    fn class_mapping(&self, output_collection: &str) -> ImportResult<ClassMapping>;

    /// 获取全部映射配置（按集合名排序）
    fn class_mappings(&self) -> Vec<ClassMapping>;
}
