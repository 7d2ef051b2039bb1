// ==========================================
// 工作簿数据映射系统 - 映射配置
// ==========================================
// 职责: 目标类型的声明式映射配置 + 读取器选项
// 红线: 配置以显式结构体传入映射调用,不做全局扫描
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ==========================================
// ClassMapping - 目标类型映射配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMapping {
    /// true: 按成员名自动匹配表头; false: 仅映射显式声明列的成员
    pub automapping: bool,

    /// 输出集合名称（交给外部集合落地方）
    pub output_collection: String,

    /// 源工作簿路径; 文件名（不含扩展名）即工作簿名
    pub workbook_path: PathBuf,

    /// 工作表名; 为空时取第一个工作表
    #[serde(default)]
    pub sheet_name: Option<String>,
}

impl ClassMapping {
    pub fn automapped(output_collection: impl Into<String>, workbook_path: impl Into<PathBuf>) -> Self {
        Self {
            automapping: true,
            output_collection: output_collection.into(),
            workbook_path: workbook_path.into(),
            sheet_name: None,
        }
    }

    pub fn manual(output_collection: impl Into<String>, workbook_path: impl Into<PathBuf>) -> Self {
        Self {
            automapping: false,
            output_collection: output_collection.into(),
            workbook_path: workbook_path.into(),
            sheet_name: None,
        }
    }

    pub fn with_sheet(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = Some(sheet_name.into());
        self
    }

    /// 工作簿名: workbook_path 的文件名（去扩展名）
    pub fn workbook_name(&self) -> String {
        workbook_name_of(&self.workbook_path)
    }

    /// 指定的工作表名（空字符串视为未指定）
    pub fn sheet(&self) -> Option<&str> {
        self.sheet_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// 由文件路径推导文档名（文件名去扩展名）
pub fn workbook_name_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// ==========================================
// ReaderOptions - 读取器选项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// 分隔文本的字段分隔符
    pub separator: char,

    /// 是否对分隔文本推断布尔/数值类型（默认全部为文本）
    pub infer_cell_types: bool,

    /// Office 锁文件前缀,带此前缀的文件不视为工作簿
    pub temp_file_prefix: String,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            separator: '\t',
            infer_cell_types: false,
            temp_file_prefix: "~$".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbook_name_is_file_stem() {
        let mapping = ClassMapping::automapped("prices", "data/balance/Prices.xlsx");
        assert_eq!(mapping.workbook_name(), "Prices");
    }

    #[test]
    fn test_blank_sheet_name_means_first_sheet() {
        let mapping = ClassMapping::manual("prices", "Prices.xlsx").with_sheet("  ");
        assert_eq!(mapping.sheet(), None);

        let mapping = mapping.with_sheet("Weapons");
        assert_eq!(mapping.sheet(), Some("Weapons"));
    }

    #[test]
    fn test_deserialize_without_sheet() {
        let mapping: ClassMapping = serde_json::from_str(
            r#"{"automapping":true,"output_collection":"items","workbook_path":"Items.xlsx"}"#,
        )
        .unwrap();
        assert!(mapping.automapping);
        assert_eq!(mapping.sheet_name, None);
    }
}
