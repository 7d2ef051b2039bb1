// ==========================================
// 工作簿数据映射系统 - 单元格 / 行 / 列
// ==========================================
// 职责: 表格值模型的最小单元
// 红线: 行与列为同一数据的两种视图,构造时同步,不做惰性重算
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellKind - 单元格类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Absent,
    Boolean,
    Numeric,
    Text,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Absent => write!(f, "ABSENT"),
            CellKind::Boolean => write!(f, "BOOLEAN"),
            CellKind::Numeric => write!(f, "NUMERIC"),
            CellKind::Text => write!(f, "TEXT"),
        }
    }
}

// ==========================================
// CellValue - 单元格值
// ==========================================
// 类型在读取时推断; 源行中不存在的单元格以 Absent 表示
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellValue {
    #[default]
    Absent,
    Boolean(bool),
    Numeric(f64),
    Text(String),
}

impl CellValue {
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Absent => CellKind::Absent,
            CellValue::Boolean(_) => CellKind::Boolean,
            CellValue::Numeric(_) => CellKind::Numeric,
            CellValue::Text(_) => CellKind::Text,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Numeric(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Absent)
    }
}

// ==========================================
// Row - 定长单元格序列
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// 右侧补齐 Absent 单元格至指定宽度（宽于 width 时不截断）
    pub fn padded(mut cells: Vec<CellValue>, width: usize) -> Self {
        if cells.len() < width {
            cells.resize(width, CellValue::Absent);
        }
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellValue> {
        self.cells.iter()
    }
}

impl std::ops::Index<usize> for Row {
    type Output = CellValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a CellValue;
    type IntoIter = std::slice::Iter<'a, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

// ==========================================
// Column - 列视图（标题 + 自上而下的单元格）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    title: String,
    cells: Vec<CellValue>,
}

impl Column {
    pub fn new(title: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            title: title.into(),
            cells,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 追加另一列的全部单元格
    ///
    /// # 返回
    /// - true: 标题一致,已追加
    /// - false: 标题不一致,自身不变
    pub fn merge(&mut self, other: &Column) -> bool {
        if self.title != other.title {
            return false;
        }
        self.cells.extend(other.cells.iter().cloned());
        true
    }
}
