// ==========================================
// 工作簿数据映射系统 - 类型映射器
// ==========================================
// 职责: 工作表行 → 类型化记录集合
// 策略:
// - 自动映射: 成员名与表头标题精确匹配者赋值,未匹配成员保持默认值
// - 手动映射: 仅映射声明了源列的成员,声明列缺失即整体失败
// 红线: 转换失败必须显式报错,不回落默认值
// ==========================================

use crate::config::mapping_config::ClassMapping;
use crate::domain::{Document, Sheet};
use crate::engine::merger::SheetMerger;
use crate::engine::record_schema::{FieldBinding, Record, RecordSchema};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::workbook_reader::WorkbookReader;
use std::any::type_name;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct ClassMapper;

impl ClassMapper {
    pub fn new() -> Self {
        Self
    }

    /// 解析映射目标工作表
    ///
    /// # 规则
    /// - sheet_name 为空 → 文档第一个工作表
    /// - 否则按名称精确查找
    ///
    /// # 错误
    /// - SheetNotFound: 工作表不存在
    /// - EmptySheet: 工作表无列或无数据行
    pub fn resolve_sheet<'a>(
        &self,
        document: &'a Document,
        mapping: &ClassMapping,
    ) -> ImportResult<&'a Sheet> {
        let sheet = match mapping.sheet() {
            Some(name) => document.sheet(name).ok_or_else(|| ImportError::SheetNotFound {
                document: document.name().to_string(),
                sheet: name.to_string(),
            })?,
            None => document
                .first_sheet()
                .ok_or_else(|| ImportError::SheetNotFound {
                    document: document.name().to_string(),
                    sheet: "#1".to_string(),
                })?,
        };

        if sheet.column_count() == 0 || sheet.row_count() == 0 {
            return Err(ImportError::EmptySheet {
                document: document.name().to_string(),
                sheet: sheet.name().to_string(),
            });
        }

        Ok(sheet)
    }

    /// 按映射配置映射文档中的目标工作表
    #[instrument(skip(self, document, mapping), fields(
        document = %document.name(),
        collection = %mapping.output_collection,
        record = type_name::<T>(),
    ))]
    pub fn map_document<T: Record>(
        &self,
        document: &Document,
        mapping: &ClassMapping,
    ) -> ImportResult<Vec<T>> {
        let sheet = self.resolve_sheet(document, mapping)?;
        let records = self.map_sheet::<T>(sheet, mapping.automapping)?;
        info!(sheet = %sheet.name(), records = records.len(), "类型映射完成");
        Ok(records)
    }

    /// 直接从工作簿文件映射单个类型
    ///
    /// 读取后先尝试把文档内各工作表合并为单表（结构相同的拆分表）;
    /// 合并失败时保留原工作表
    pub async fn map_file<T: Record>(
        &self,
        mapping: &ClassMapping,
        reader: &WorkbookReader,
    ) -> ImportResult<Vec<T>> {
        let document = reader
            .read_named(&mapping.workbook_name(), &mapping.workbook_path)
            .await?;

        let document = match SheetMerger::new().reduce(&document) {
            Ok(reduced) => reduced,
            Err(e) => {
                debug!(document = %document.name(), reason = %e, "工作簿内工作表无法合并, 保持原状");
                document
            }
        };

        self.map_document(&document, mapping)
    }

    pub fn map_sheet<T: Record>(&self, sheet: &Sheet, automapping: bool) -> ImportResult<Vec<T>> {
        if automapping {
            self.automap(sheet)
        } else {
            self.manual_map(sheet)
        }
    }

    /// 自动映射: 成员名 == 表头标题
    pub fn automap<T: Record>(&self, sheet: &Sheet) -> ImportResult<Vec<T>> {
        let schema = T::schema();
        let bindings: Vec<(&FieldBinding<T>, usize)> = schema
            .fields()
            .iter()
            .filter_map(|field| sheet.column_index(field.member()).map(|idx| (field, idx)))
            .collect();

        let unmatched = schema.len() - bindings.len();
        if unmatched > 0 {
            debug!(
                record = type_name::<T>(),
                unmatched = unmatched,
                "部分成员无对应列, 保持默认值"
            );
        }

        fill_rows(sheet, &bindings)
    }

    /// 手动映射: 成员声明的源列必须存在
    pub fn manual_map<T: Record>(&self, sheet: &Sheet) -> ImportResult<Vec<T>> {
        let schema: RecordSchema<T> = T::schema();
        let mut bindings = Vec::with_capacity(schema.len());

        for field in schema.fields() {
            let Some(column) = field.column() else {
                continue;
            };
            match sheet.column_index(column) {
                Some(idx) => bindings.push((field, idx)),
                None => {
                    warn!(
                        record = type_name::<T>(),
                        member = %field.member(),
                        column = %column,
                        sheet = %sheet.name(),
                        "声明的列不存在"
                    );
                    return Err(ImportError::MissingColumn {
                        member: field.member().to_string(),
                        type_name: type_name::<T>().to_string(),
                        column: column.to_string(),
                        sheet: sheet.name().to_string(),
                    });
                }
            }
        }

        fill_rows(sheet, &bindings)
    }
}

/// 逐行构造实例,保持源行顺序
fn fill_rows<T: Record>(sheet: &Sheet, bindings: &[(&FieldBinding<T>, usize)]) -> ImportResult<Vec<T>> {
    let mut values = Vec::with_capacity(sheet.row_count());

    for (row_idx, row) in sheet.rows().iter().enumerate() {
        let mut record = T::default();
        for (field, column_index) in bindings {
            let cell = &row[*column_index];
            if !field.assign(&mut record, cell) {
                return Err(ImportError::TypeMismatch {
                    member: field.member().to_string(),
                    type_name: type_name::<T>().to_string(),
                    sheet: sheet.name().to_string(),
                    column_index: *column_index,
                    // 表头占第 1 行
                    sheet_row: row_idx + 2,
                    expected: field.coercion(),
                    found: cell.kind(),
                });
            }
        }
        values.push(record);
    }

    Ok(values)
}
