// ==========================================
// 工作簿数据映射系统 - 源文件识别与分发
// ==========================================
// 支持: Excel (.xlsx/.xls) / 分隔文本 (.txt)
// ==========================================

use crate::config::mapping_config::ReaderOptions;
use crate::domain::Sheet;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::SheetParser;
use crate::importer::text_reader::DelimitedTextReader;
use crate::importer::workbook_reader::WorkbookReader;
use std::path::Path;

const XLS: &str = "xls";
const XLSX: &str = "xlsx";
const TXT: &str = "txt";

/// 源文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Workbook,
    DelimitedText,
}

impl SourceKind {
    /// 根据扩展名识别源文件类型
    pub fn from_path(path: &Path) -> Option<Self> {
        match extension_of(path).as_str() {
            XLS | XLSX => Some(SourceKind::Workbook),
            TXT => Some(SourceKind::DelimitedText),
            _ => None,
        }
    }
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 是否为工作簿文件（.xls/.xlsx,且不是 Office 锁文件）
pub fn is_workbook_file(path: &Path, temp_file_prefix: &str) -> bool {
    let is_lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| !temp_file_prefix.is_empty() && n.starts_with(temp_file_prefix));

    !is_lock_file && SourceKind::from_path(path) == Some(SourceKind::Workbook)
}

/// 是否为分隔文本文件（.txt）
pub fn is_text_file(path: &Path) -> bool {
    SourceKind::from_path(path) == Some(SourceKind::DelimitedText)
}

/// 检查文件存在
pub(crate) fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.is_file() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    workbook: WorkbookReader,
    text: DelimitedTextReader,
}

impl UniversalFileParser {
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            workbook: WorkbookReader::new(options.clone()),
            text: DelimitedTextReader::new(options),
        }
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl SheetParser for UniversalFileParser {
    fn parse_sheets(&self, file_path: &Path, document_name: &str) -> ImportResult<Vec<Sheet>> {
        match SourceKind::from_path(file_path) {
            Some(SourceKind::Workbook) => self.workbook.parse_sheets(file_path, document_name),
            Some(SourceKind::DelimitedText) => self.text.parse_sheets(file_path, document_name),
            None => Err(ImportError::UnsupportedFormat(extension_of(file_path))),
        }
    }
}
