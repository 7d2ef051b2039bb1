// ==========================================
// 工作簿数据映射系统 - 批量类型映射
// ==========================================
// 职责: 多个目标类型 × 多个文档的批量映射
// 流程: 注册类型 → 按类型名排序 → 逐个匹配文档并映射 → 全部成功后汇总
// 红线: 任一类型失败即整批失败,不返回部分结果
// ==========================================

use crate::config::mapping_config::ClassMapping;
use crate::domain::Document;
use crate::engine::class_mapper::ClassMapper;
use crate::engine::mapping_result::{MappedCollection, MappingResult};
use crate::engine::record_schema::Record;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::workbook_reader::WorkbookReader;
use std::any::{type_name, TypeId};
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument, Span};
use uuid::Uuid;

// ==========================================
// 类型擦除的单类型映射任务
// ==========================================
trait ErasedMapping: Send + Sync {
    fn type_id(&self) -> TypeId;
    fn type_name(&self) -> &'static str;
    fn mapping(&self) -> &ClassMapping;
    fn map(&self, mapper: &ClassMapper, document: &Document) -> ImportResult<MappedCollection>;
}

struct TypedMapping<T> {
    mapping: ClassMapping,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> ErasedMapping for TypedMapping<T> {
    fn type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn mapping(&self) -> &ClassMapping {
        &self.mapping
    }

    fn map(&self, mapper: &ClassMapper, document: &Document) -> ImportResult<MappedCollection> {
        let values = mapper.map_document::<T>(document, &self.mapping)?;
        Ok(MappedCollection::new(
            self.mapping.output_collection.clone(),
            values,
        ))
    }
}

// ==========================================
// MappingBatch - 批量映射
// ==========================================
#[derive(Default)]
pub struct MappingBatch {
    entries: Vec<Box<dyn ErasedMapping>>,
    mapper: ClassMapper,
}

impl MappingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册目标类型及其映射配置
    ///
    /// # 错误
    /// - DuplicateMapping: 同一类型重复注册
    pub fn register<T: Record>(&mut self, mapping: ClassMapping) -> ImportResult<&mut Self> {
        if self.entries.iter().any(|e| e.type_id() == TypeId::of::<T>()) {
            return Err(ImportError::DuplicateMapping(type_name::<T>().to_string()));
        }

        debug!(
            record = type_name::<T>(),
            collection = %mapping.output_collection,
            workbook = %mapping.workbook_name(),
            "注册映射类型"
        );
        self.entries.push(Box::new(TypedMapping::<T> {
            mapping,
            _record: PhantomData,
        }));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 本批次需要的工作簿路径（去重,按注册顺序）
    pub fn workbook_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in &self.entries {
            let path = &entry.mapping().workbook_path;
            if !paths.contains(path) {
                paths.push(path.clone());
            }
        }
        paths
    }

    /// 对已读取的文档执行批量映射
    ///
    /// # 规则
    /// - 类型按类型名排序后依次处理,结果可复现
    /// - 每个类型匹配名称等于其工作簿名的文档
    ///
    /// # 错误
    /// - WorkbookNotFound: 类型声明的工作簿未提供
    /// - 任一类型的映射错误
    #[instrument(skip(self, documents), fields(batch_id = tracing::field::Empty, types = self.entries.len(), documents = documents.len()))]
    pub fn map_documents(&self, documents: &[Document]) -> ImportResult<MappingResult> {
        let batch_id = Uuid::new_v4().to_string();
        Span::current().record("batch_id", batch_id.as_str());
        info!(batch_id = %batch_id, "开始批量映射");

        let mut ordered: Vec<&dyn ErasedMapping> = self.entries.iter().map(|e| e.as_ref()).collect();
        ordered.sort_by_key(|e| e.type_name());

        let mut collections = Vec::with_capacity(ordered.len());
        for entry in ordered {
            let workbook = entry.mapping().workbook_name();
            let document = documents
                .iter()
                .find(|d| d.name() == workbook)
                .ok_or_else(|| {
                    error!(record = entry.type_name(), workbook = %workbook, "工作簿未提供");
                    ImportError::WorkbookNotFound {
                        type_name: entry.type_name().to_string(),
                        workbook: workbook.clone(),
                    }
                })?;

            let collection = entry.map(&self.mapper, document).map_err(|e| {
                error!(record = entry.type_name(), error = %e, "类型映射失败, 批次中止");
                e
            })?;
            collections.push(collection);
        }

        info!(batch_id = %batch_id, collections = collections.len(), "批量映射完成");
        Ok(MappingResult::from_collections(batch_id, collections))
    }

    /// 读取工作簿文件后执行批量映射
    ///
    /// 文件按给定顺序逐个读取,文档名为文件名（去扩展名）
    pub async fn map_files(
        &self,
        file_paths: &[PathBuf],
        reader: &WorkbookReader,
    ) -> ImportResult<MappingResult> {
        let mut documents = Vec::with_capacity(file_paths.len());
        for path in file_paths {
            documents.push(reader.read(path).await?);
        }
        self.map_documents(&documents)
    }
}
