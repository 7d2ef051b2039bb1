// ==========================================
// 工作簿数据映射系统 - Excel 工作簿读取器
// ==========================================
// 支持: .xlsx / .xls
// 策略: 单个工作表转换失败 → 记录日志并剔除该表,文档仍返回其余工作表
// ==========================================

use crate::config::mapping_config::{workbook_name_of, ReaderOptions};
use crate::domain::{CellValue, Document, Sheet};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{ensure_exists, extension_of, is_workbook_file};
use crate::importer::importer_trait::{DocumentReader, SheetParser};
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

pub struct WorkbookReader {
    options: ReaderOptions,
}

impl WorkbookReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }

    /// 读取工作簿,文档名取文件名（去扩展名）
    pub async fn read<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Document> {
        let path = file_path.as_ref();
        self.read_named(&workbook_name_of(path), path).await
    }

    /// 读取工作簿并指定文档名（空名称回退为文件名）
    #[instrument(skip(self, file_path), fields(file_path = %file_path.as_ref().display()))]
    pub async fn read_named<P: AsRef<Path>>(
        &self,
        document_name: &str,
        file_path: P,
    ) -> ImportResult<Document> {
        let path = file_path.as_ref();
        let name = if document_name.trim().is_empty() {
            workbook_name_of(path)
        } else {
            document_name.to_string()
        };

        let sheets = self.parse_sheets(path, &name)?;
        info!(document = %name, sheets = sheets.len(), "工作簿读取完成");
        Ok(Document::new(name, sheets))
    }

    fn validate(&self, path: &Path) -> ImportResult<()> {
        ensure_exists(path)?;
        if !is_workbook_file(path, &self.options.temp_file_prefix) {
            return Err(ImportError::UnsupportedFormat(extension_of(path)));
        }
        Ok(())
    }
}

impl Default for WorkbookReader {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl SheetParser for WorkbookReader {
    fn parse_sheets(&self, file_path: &Path, document_name: &str) -> ImportResult<Vec<Sheet>> {
        self.validate(file_path)?;

        // 文件句柄随 workbook 在本函数返回前释放
        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names();
        debug!(document = %document_name, sheet_names = ?sheet_names, "打开工作簿");

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for sheet_name in sheet_names {
            let converted = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| ImportError::MalformedSheet {
                    document: document_name.to_string(),
                    sheet: sheet_name.clone(),
                    message: e.to_string(),
                })
                .and_then(|range| convert_range(document_name, &sheet_name, &range));

            match converted {
                Ok(sheet) => {
                    debug!(sheet = %sheet.name(), rows = sheet.row_count(), "工作表转换完成");
                    sheets.push(sheet);
                }
                Err(e) => {
                    warn!(
                        document = %document_name,
                        sheet = %sheet_name,
                        error = %e,
                        "工作表格式无效, 已从文档中剔除"
                    );
                }
            }
        }

        if sheets.is_empty() {
            warn!(document = %document_name, "工作簿中没有可用的工作表");
        }
        Ok(sheets)
    }
}

#[async_trait]
impl DocumentReader for WorkbookReader {
    /// 多个工作簿文件的工作表按文件顺序拼接为一个文档
    async fn read_document(
        &self,
        document_name: &str,
        file_paths: &[PathBuf],
    ) -> ImportResult<Document> {
        let mut sheets = Vec::new();
        for path in file_paths {
            sheets.extend(self.parse_sheets(path, document_name)?);
        }
        Ok(Document::new(document_name, sheets))
    }
}

/// 单元格类型推断: 布尔/数值/文本直接映射,日期按序列数值处理,
/// ISO 日期文本保留为文本,错误值与空单元格为 Absent
pub(crate) fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Float(f) => CellValue::Numeric(*f),
        Data::Int(i) => CellValue::Numeric(*i as f64),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => CellValue::Numeric(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Absent,
    }
}

/// 将 calamine 区域转换为工作表
///
/// calamine 的区域从首个非空单元格开始,这里按绝对位置补齐,
/// 使第 1 行始终对应表头行
fn convert_range(document_name: &str, sheet_name: &str, range: &Range<Data>) -> ImportResult<Sheet> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut grid: Vec<Vec<CellValue>> = Vec::with_capacity(range.height() + start_row as usize);
    for _ in 0..start_row {
        grid.push(Vec::new());
    }
    for row in range.rows() {
        let mut cells = vec![CellValue::Absent; start_col as usize];
        cells.extend(row.iter().map(convert_cell));
        grid.push(cells);
    }

    let sheet = Sheet::from_grid(document_name, sheet_name, grid)?;
    if sheet.row_count() == 0 {
        return Err(ImportError::EmptySheet {
            document: document_name.to_string(),
            sheet: sheet_name.to_string(),
        });
    }
    Ok(sheet)
}
