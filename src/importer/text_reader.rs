// ==========================================
// 工作簿数据映射系统 - 分隔文本读取器
// ==========================================
// 支持: .txt（固定单字符分隔,默认制表符,无引号语义）
// 策略: 每个文件对应一个必需的工作表,任一文件格式错误即整体失败
// ==========================================

use crate::config::mapping_config::ReaderOptions;
use crate::domain::{CellValue, Document, Sheet};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{ensure_exists, extension_of, is_text_file};
use crate::importer::importer_trait::{DocumentReader, SheetParser};
use async_trait::async_trait;
use csv::ReaderBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub struct DelimitedTextReader {
    options: ReaderOptions,
}

impl DelimitedTextReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }

    /// 读取文本文件列表,每个文件为一个工作表（按给定顺序）
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn read<P: AsRef<Path>>(&self, document_name: &str, files: &[P]) -> ImportResult<Document> {
        let mut sheets = Vec::with_capacity(files.len());
        for file in files {
            sheets.extend(self.parse_sheets(file.as_ref(), document_name)?);
        }
        info!(document = %document_name, sheets = sheets.len(), "文本文档读取完成");
        Ok(Document::new(document_name, sheets))
    }

    /// 读取目录下全部 .txt 文件（按路径排序）
    pub async fn read_dir<P: AsRef<Path>>(&self, document_name: &str, directory: P) -> ImportResult<Document> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(ImportError::FileNotFound(directory.display().to_string()));
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_text_file(path))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(ImportError::FileReadError(format!(
                "目录 '{}' 中没有 .txt 文件",
                directory.display()
            )));
        }

        self.read(document_name, &files).await
    }

    fn separator(&self) -> ImportResult<u8> {
        let separator = self.options.separator;
        if !separator.is_ascii() {
            return Err(ImportError::ConfigReadError {
                key: "reader.separator".to_string(),
                message: format!("分隔符必须为单字节 ASCII 字符: {:?}", separator),
            });
        }
        Ok(separator as u8)
    }

    fn parse_sheet(&self, file_path: &Path, document_name: &str) -> ImportResult<Sheet> {
        ensure_exists(file_path)?;
        if !is_text_file(file_path) {
            return Err(ImportError::UnsupportedFormat(extension_of(file_path)));
        }

        let sheet_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string());

        // 文件句柄随 reader 在本函数返回前释放
        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .delimiter(self.separator()?)
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .quoting(false)
            .from_reader(file);

        let mut grid: Vec<Vec<CellValue>> = Vec::new();
        let mut width = 0usize;
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut fields: Vec<&str> = record.iter().collect();

            if idx == 0 {
                width = fields.len();
                grid.push(fields.into_iter().map(CellValue::from).collect());
                continue;
            }

            // 表头之外的空白尾字段视为不存在
            while fields.len() > width && fields.last().is_some_and(|f| f.is_empty()) {
                fields.pop();
            }
            grid.push(fields.into_iter().map(|f| self.convert_field(f)).collect());
        }

        let sheet = Sheet::from_grid(document_name, sheet_name.as_str(), grid)?;
        if sheet.row_count() == 0 {
            return Err(ImportError::EmptySheet {
                document: document_name.to_string(),
                sheet: sheet_name,
            });
        }

        debug!(sheet = %sheet.name(), rows = sheet.row_count(), "文本工作表转换完成");
        Ok(sheet)
    }

    /// 数据字段转换; 未开启类型推断时一律为文本
    fn convert_field(&self, field: &str) -> CellValue {
        if !self.options.infer_cell_types {
            return CellValue::from(field);
        }

        let trimmed = field.trim();
        if trimmed.is_empty() {
            return CellValue::Absent;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Numeric(v),
            _ => CellValue::from(field),
        }
    }
}

impl Default for DelimitedTextReader {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl SheetParser for DelimitedTextReader {
    fn parse_sheets(&self, file_path: &Path, document_name: &str) -> ImportResult<Vec<Sheet>> {
        Ok(vec![self.parse_sheet(file_path, document_name)?])
    }
}

#[async_trait]
impl DocumentReader for DelimitedTextReader {
    async fn read_document(
        &self,
        document_name: &str,
        file_paths: &[PathBuf],
    ) -> ImportResult<Document> {
        self.read(document_name, file_paths).await
    }
}
