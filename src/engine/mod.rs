// ==========================================
// 工作簿数据映射系统 - 引擎层
// ==========================================
// 职责: 工作表合并、记录结构描述、类型映射与结果汇总
// 红线: 单线程顺序处理; 失败显式报错
// ==========================================

pub mod class_mapper;
pub mod mapping_batch;
pub mod mapping_result;
pub mod merger;
pub mod record_schema;

// 重导出核心引擎
pub use class_mapper::ClassMapper;
pub use mapping_batch::MappingBatch;
pub use mapping_result::{MappedCollection, MappingResult};
pub use merger::{MergeMode, SheetMerger};
pub use record_schema::{
    Coercion, FieldBinding, NumericField, Record, RecordSchema, RecordSchemaBuilder,
};
