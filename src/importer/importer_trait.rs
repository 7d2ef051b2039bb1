// ==========================================
// 工作簿数据映射系统 - 导入 Trait
// ==========================================
// 职责: 定义读取与落地接口（不包含实现）
// ==========================================

use crate::domain::{Document, Sheet};
use crate::engine::mapping_result::MappedCollection;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

// ==========================================
// SheetParser Trait
// ==========================================
// 用途: 单个文件 → 工作表列表（同步,持有文件句柄仅限本次调用）
// 实现者: WorkbookReader, DelimitedTextReader
pub trait SheetParser: Send + Sync {
    /// 解析文件为工作表
    ///
    /// # 参数
    /// - file_path: 已校验的文件路径
    /// - document_name: 所属文档名（用于错误信息）
    ///
    /// # 返回
    /// - Ok(Vec<Sheet>): 工作表列表
    /// - Err: 文件读取错误、格式错误
    fn parse_sheets(&self, file_path: &Path, document_name: &str) -> ImportResult<Vec<Sheet>>;
}

// ==========================================
// DocumentReader Trait
// ==========================================
// 用途: 文件列表 → 文档
// 说明: 以 future 形式暴露便于与流水线其他异步步骤组合;
//       单次读取内部无并行,按文件顺序阻塞读取
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// 读取一个或多个文件,构造单个文档
    ///
    /// # 参数
    /// - document_name: 文档名
    /// - file_paths: 文件路径（按给定顺序读取）
    ///
    /// # 返回
    /// - Ok(Document): 工作表顺序与文件顺序一致
    async fn read_document(
        &self,
        document_name: &str,
        file_paths: &[PathBuf],
    ) -> ImportResult<Document>;
}

// ==========================================
// CollectionSink Trait
// ==========================================
// 用途: 外部类型化集合落地方的接口边界
// 实现者: 由调用方提供（持久化不在本库范围内）
pub trait CollectionSink {
    /// 接收一个已映射的集合
    fn accept(&mut self, collection: &MappedCollection) -> ImportResult<()>;
}
