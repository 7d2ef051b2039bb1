// ==========================================
// 工作簿数据映射系统 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 源格式错误 / 结构不匹配 / 配置错误 / 合并不兼容
// ==========================================

use crate::domain::cell::CellKind;
use crate::engine::record_schema::Coercion;
use std::fmt;
use thiserror::Error;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedSource,
    SchemaMismatch,
    Configuration,
    MergeIncompatibility,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedSource => write!(f, "MALFORMED_SOURCE"),
            ErrorKind::SchemaMismatch => write!(f, "SCHEMA_MISMATCH"),
            ErrorKind::Configuration => write!(f, "CONFIGURATION"),
            ErrorKind::MergeIncompatibility => write!(f, "MERGE_INCOMPATIBILITY"),
            ErrorKind::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// 导入与映射错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 源文件错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.txt）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("文本解析失败: {0}")]
    TextParseError(String),

    #[error("工作表格式错误 (工作簿 '{document}', 工作表 '{sheet}'): {message}")]
    MalformedSheet {
        document: String,
        sheet: String,
        message: String,
    },

    #[error("工作簿 '{document}' 中不存在工作表 '{sheet}'")]
    SheetNotFound { document: String, sheet: String },

    #[error("工作簿 '{document}' 中的工作表 '{sheet}' 为空")]
    EmptySheet { document: String, sheet: String },

    // ===== 结构映射错误 =====
    #[error("工作表 '{sheet}' 中不存在列 '{column}' (类型 {type_name} 的成员 '{member}' 声明)")]
    MissingColumn {
        member: String,
        type_name: String,
        column: String,
        sheet: String,
    },

    #[error(
        "类型不匹配: 类型 {type_name} 的成员 '{member}' 需要 {expected}, \
         工作表 '{sheet}' 第 {sheet_row} 行第 {column_index} 列为 {found}"
    )]
    TypeMismatch {
        member: String,
        type_name: String,
        sheet: String,
        column_index: usize,
        sheet_row: usize,
        expected: Coercion,
        found: CellKind,
    },

    // ===== 配置错误 =====
    #[error("类型 {type_name} 声明的工作簿 '{workbook}' 未在本批次中提供")]
    WorkbookNotFound { type_name: String, workbook: String },

    #[error("类型 {0} 在同一批次中重复注册")]
    DuplicateMapping(String),

    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 合并错误 =====
    #[error("表头结构不一致, 无法合并: 工作表 '{target}' 与 '{source_sheet}'")]
    HeaderMismatch { target: String, source_sheet: String },

    #[error("工作簿 '{0}' 内部工作表无法合并为单表")]
    DocumentNotMergeable(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::FileNotFound(_)
            | ImportError::UnsupportedFormat(_)
            | ImportError::FileReadError(_)
            | ImportError::ExcelParseError(_)
            | ImportError::TextParseError(_)
            | ImportError::MalformedSheet { .. }
            | ImportError::SheetNotFound { .. }
            | ImportError::EmptySheet { .. } => ErrorKind::MalformedSource,
            ImportError::MissingColumn { .. } | ImportError::TypeMismatch { .. } => {
                ErrorKind::SchemaMismatch
            }
            ImportError::WorkbookNotFound { .. }
            | ImportError::DuplicateMapping(_)
            | ImportError::ConfigReadError { .. } => ErrorKind::Configuration,
            ImportError::HeaderMismatch { .. } | ImportError::DocumentNotMergeable(_) => {
                ErrorKind::MergeIncompatibility
            }
            ImportError::Other(_) => ErrorKind::Internal,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::TextParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
