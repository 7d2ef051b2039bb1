// ==========================================
// 工作簿数据映射系统 - 核心库
// ==========================================
// 职责: 表格文件（Excel / 分隔文本）→ 内存文档 → 类型化记录集合
// 分层: 领域模型 / 导入 / 引擎 / 配置
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格值模型
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 引擎层 - 合并与映射规则
pub mod engine;

// 配置层 - 映射配置与读取选项
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellKind, CellValue, Column, Document, DocumentSummary, Header, Row, Sheet, SheetSummary,
};

// 导入
pub use importer::{
    CollectionSink, DelimitedTextReader, DocumentReader, ErrorKind, ImportError, ImportResult,
    SheetParser, UniversalFileParser, WorkbookReader,
};

// 引擎
pub use engine::{
    ClassMapper, Coercion, MappedCollection, MappingBatch, MappingResult, MergeMode, Record,
    RecordSchema, SheetMerger,
};

// 配置
pub use config::{ClassMapping, ConfigManager, ImportConfigReader, ReaderOptions};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工作簿数据映射系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
