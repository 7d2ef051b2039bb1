// ==========================================
// 工作簿数据映射系统 - 导入层
// ==========================================
// 职责: 外部表格文件 → 内存文档
// 支持: Excel (.xlsx/.xls), 分隔文本 (.txt)
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod text_reader;
pub mod workbook_reader;

// 重导出核心类型
pub use error::{ErrorKind, ImportError, ImportResult};
pub use file_parser::{is_text_file, is_workbook_file, SourceKind, UniversalFileParser};
pub use text_reader::DelimitedTextReader;
pub use workbook_reader::WorkbookReader;

// 重导出 Trait 接口
pub use importer_trait::{CollectionSink, DocumentReader, SheetParser};
