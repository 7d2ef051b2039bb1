// ==========================================
// 工作簿数据映射系统 - 文档（工作簿）
// ==========================================
// 职责: 名称 + 有序工作表序列
// 生命周期: 由读取器一次性构造; 合并产生新值,不修改原文档
// ==========================================

use crate::domain::sheet::Sheet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    name: String,
    sheets: Vec<Sheet>,
}

impl Document {
    pub fn new(name: impl Into<String>, sheets: Vec<Sheet>) -> Self {
        Self {
            name: name.into(),
            sheets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    /// 按名称精确查找工作表
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// 生成摘要（CLI 输出与日志使用）
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            name: self.name.clone(),
            sheets: self
                .sheets
                .iter()
                .map(|sheet| SheetSummary {
                    name: sheet.name().to_string(),
                    header: sheet.header().titles().to_vec(),
                    row_count: sheet.row_count(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub sheets: Vec<SheetSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub name: String,
    pub header: Vec<String>,
    pub row_count: usize,
}
