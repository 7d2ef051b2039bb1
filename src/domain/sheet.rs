// ==========================================
// 工作簿数据映射系统 - 表头与工作表
// ==========================================
// 职责: 工作表结构及其不变量
// 不变量:
// - 每行长度 == 表头长度
// - 列数 == 表头长度
// - 每列单元格数 == 行数
// ==========================================

use crate::domain::cell::{CellValue, Column, Row};
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};

// ==========================================
// Header - 表头（有序列标题）
// ==========================================
// 相等性为结构相等: 长度一致且同位标题一致
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Header {
    titles: Vec<String>,
}

impl Header {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
        }
    }

    /// 由首行单元格构造表头
    ///
    /// 每个单元格必须为非空文本,否则返回违规描述
    pub fn from_cells(cells: &[CellValue]) -> Result<Self, String> {
        if cells.is_empty() {
            return Err("表头行为空".to_string());
        }

        let mut titles = Vec::with_capacity(cells.len());
        for (idx, cell) in cells.iter().enumerate() {
            match cell {
                CellValue::Text(title) if !title.trim().is_empty() => titles.push(title.clone()),
                CellValue::Text(_) => {
                    return Err(format!("表头第 {} 列必须为非空文本,实际为空文本", idx + 1))
                }
                other => {
                    return Err(format!(
                        "表头第 {} 列必须为非空文本,实际为 {}",
                        idx + 1,
                        other.kind()
                    ))
                }
            }
        }

        Ok(Self { titles })
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn title(&self, index: usize) -> Option<&str> {
        self.titles.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// 精确匹配列标题,返回列位置
    pub fn position(&self, title: &str) -> Option<usize> {
        self.titles.iter().position(|t| t == title)
    }

    /// 表头合并: 当且仅当结构相等时成功,无副作用
    pub fn merge(&self, other: &Header) -> bool {
        self == other
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.titles.iter()
    }
}

// ==========================================
// Sheet - 工作表
// ==========================================
// 反序列化经由 Sheet::new 校验,列视图重新生成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SheetData")]
pub struct Sheet {
    name: String,
    header: Header,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

#[derive(Deserialize)]
struct SheetData {
    name: String,
    header: Header,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<SheetData> for Sheet {
    type Error = ImportError;

    fn try_from(data: SheetData) -> ImportResult<Self> {
        Sheet::new("", data.name, data.header, data.rows)
    }
}

impl Sheet {
    /// 由表头与数据行构造工作表,列视图在此一次性生成
    ///
    /// # 错误
    /// - MalformedSheet: 表头为空或任一行长度与表头不一致
    pub fn new(
        document: &str,
        name: impl Into<String>,
        header: Header,
        rows: Vec<Row>,
    ) -> ImportResult<Self> {
        let name = name.into();

        if header.is_empty() {
            return Err(ImportError::MalformedSheet {
                document: document.to_string(),
                sheet: name,
                message: "表头为空".to_string(),
            });
        }

        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(ImportError::MalformedSheet {
                document: document.to_string(),
                sheet: name,
                message: format!(
                    "第 {} 行宽度 {} 与表头宽度 {} 不一致",
                    idx + 2,
                    row.len(),
                    header.len()
                ),
            });
        }

        let columns = build_columns(&header, &rows);
        Ok(Self {
            name,
            header,
            columns,
            rows,
        })
    }

    /// 由原始单元格网格构造: 首行为表头,其余为数据行
    ///
    /// - 窄于表头的行右侧补 Absent
    /// - 宽于表头的行,超出部分须全部为 Absent（表头之外无列）,否则报错
    pub fn from_grid(
        document: &str,
        name: impl Into<String>,
        grid: Vec<Vec<CellValue>>,
    ) -> ImportResult<Self> {
        let name = name.into();
        let mut lines = grid.into_iter();

        let header_cells = lines.next().ok_or_else(|| ImportError::MalformedSheet {
            document: document.to_string(),
            sheet: name.clone(),
            message: "缺少表头行".to_string(),
        })?;

        let header = Header::from_cells(trim_trailing_absent(&header_cells)).map_err(|message| {
            ImportError::MalformedSheet {
                document: document.to_string(),
                sheet: name.clone(),
                message,
            }
        })?;

        let width = header.len();
        let mut rows = Vec::new();
        for (idx, mut cells) in lines.enumerate() {
            if cells.len() > width {
                if cells[width..].iter().any(|c| !c.is_absent()) {
                    return Err(ImportError::MalformedSheet {
                        document: document.to_string(),
                        sheet: name,
                        message: format!(
                            "第 {} 行有 {} 个单元格,超出表头宽度 {}",
                            idx + 2,
                            cells.len(),
                            width
                        ),
                    });
                }
                cells.truncate(width);
            }
            rows.push(Row::padded(cells, width));
        }

        Self::new(document, name, header, rows)
    }

    /// 合并使用: 调用方保证各部分已满足不变量
    pub(crate) fn from_parts(
        name: String,
        header: Header,
        columns: Vec<Column>,
        rows: Vec<Row>,
    ) -> Self {
        debug_assert_eq!(columns.len(), header.len());
        debug_assert!(columns.iter().all(|c| c.len() == rows.len()));
        Self {
            name,
            header,
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// 列位置查询（精确匹配表头标题）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.position(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|idx| &self.columns[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Sheet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

fn build_columns(header: &Header, rows: &[Row]) -> Vec<Column> {
    header
        .iter()
        .enumerate()
        .map(|(idx, title)| {
            let cells = rows.iter().map(|row| row[idx].clone()).collect();
            Column::new(title.clone(), cells)
        })
        .collect()
}

fn trim_trailing_absent(cells: &[CellValue]) -> &[CellValue] {
    let end = cells
        .iter()
        .rposition(|c| !c.is_absent())
        .map_or(0, |idx| idx + 1);
    &cells[..end]
}
