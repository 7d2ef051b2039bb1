// ==========================================
// 工作簿数据映射系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询
// 存储: JSON 配置文件 { "reader": {...}, "mappings": { 集合名: {...} } }
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::config::mapping_config::{ClassMapping, ReaderOptions};
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 配置文件中的单个映射条目（集合名即键）
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MappingEntry {
    #[serde(default = "default_automapping")]
    automapping: bool,
    workbook_path: PathBuf,
    #[serde(default)]
    sheet_name: Option<String>,
}

fn default_automapping() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    reader: ReaderOptions,
    #[serde(default)]
    mappings: BTreeMap<String, MappingEntry>,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    file: ConfigFile,
}

impl ConfigManager {
    /// 从 JSON 配置文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径; 文件不存在时使用默认配置
    pub fn load<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在, 使用默认配置");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let manager = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            mappings = manager.file.mappings.len(),
            "配置加载完成"
        );
        Ok(manager)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(raw: &str) -> ImportResult<Self> {
        let file: ConfigFile =
            serde_json::from_str(raw).map_err(|e| ImportError::ConfigReadError {
                key: "<root>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { file })
    }

    /// 覆写读取器选项
    pub fn with_reader_options(mut self, options: ReaderOptions) -> Self {
        self.file.reader = options;
        self
    }

    /// 注册或覆写一个映射配置
    pub fn insert_mapping(&mut self, mapping: ClassMapping) {
        debug!(collection = %mapping.output_collection, "注册映射配置");
        self.file.mappings.insert(
            mapping.output_collection,
            MappingEntry {
                automapping: mapping.automapping,
                workbook_path: mapping.workbook_path,
                sheet_name: mapping.sheet_name,
            },
        );
    }

    fn to_class_mapping(name: &str, entry: &MappingEntry) -> ClassMapping {
        ClassMapping {
            automapping: entry.automapping,
            output_collection: name.to_string(),
            workbook_path: entry.workbook_path.clone(),
            sheet_name: entry.sheet_name.clone(),
        }
    }
}

impl ImportConfigReader for ConfigManager {
    fn reader_options(&self) -> ReaderOptions {
        self.file.reader.clone()
    }

    fn class_mapping(&self, output_collection: &str) -> ImportResult<ClassMapping> {
        self.file
            .mappings
            .get(output_collection)
            .map(|entry| Self::to_class_mapping(output_collection, entry))
            .ok_or_else(|| ImportError::ConfigReadError {
                key: format!("mappings.{}", output_collection),
                message: "未声明该输出集合".to_string(),
            })
    }

    fn class_mappings(&self) -> Vec<ClassMapping> {
        self.file
            .mappings
            .iter()
            .map(|(name, entry)| Self::to_class_mapping(name, entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ErrorKind;

    #[test]
    fn test_from_json_with_defaults() {
        let manager = ConfigManager::from_json(
            r#"{
                "mappings": {
                    "prices": { "workbook_path": "Prices.xlsx", "sheet_name": "Main" },
                    "items": { "automapping": false, "workbook_path": "Items.xlsx" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(manager.reader_options(), ReaderOptions::default());

        let prices = manager.class_mapping("prices").unwrap();
        assert!(prices.automapping);
        assert_eq!(prices.sheet(), Some("Main"));
        assert_eq!(prices.workbook_name(), "Prices");

        let names: Vec<String> = manager
            .class_mappings()
            .into_iter()
            .map(|m| m.output_collection)
            .collect();
        assert_eq!(names, vec!["items".to_string(), "prices".to_string()]);
    }

    #[test]
    fn test_unknown_collection_is_configuration_error() {
        let manager = ConfigManager::default();
        let err = manager.class_mapping("missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_invalid_json_is_configuration_error() {
        let err = ConfigManager::from_json("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_reader_separator_override() {
        let manager = ConfigManager::from_json(r#"{ "reader": { "separator": ";" } }"#).unwrap();
        let options = manager.reader_options();
        assert_eq!(options.separator, ';');
        assert_eq!(options.temp_file_prefix, "~$");
    }
}
