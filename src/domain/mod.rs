// ==========================================
// 工作簿数据映射系统 - 领域层
// ==========================================
// 职责: 表格值模型（单元格/行/列/表头/工作表/文档）
// 红线: 模型为内存快照,构造后不再回读源文件
// ==========================================

pub mod cell;
pub mod document;
pub mod sheet;

// 重导出核心类型
pub use cell::{CellKind, CellValue, Column, Row};
pub use document::{Document, DocumentSummary, SheetSummary};
pub use sheet::{Header, Sheet};
