// ==========================================
// 工作簿数据映射系统 - 工作表合并引擎
// ==========================================
// 职责: 表头结构相同的工作表按行拼接; 文档间软合并/硬合并
// 红线: 合并产生新值; 任一步失败时输入保持原样（列级快照回滚）
// ==========================================

use crate::domain::{Document, Header, Sheet};
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// 文档合并模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeMode {
    /// 工作表列表拼接,不校验结构
    #[default]
    Soft,
    /// 两个文档先各自合并为单表,再按行拼接为一个工作表
    Hard,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SheetMerger;

impl SheetMerger {
    pub fn new() -> Self {
        Self
    }

    /// 表头合并: 当且仅当结构相等时成功
    pub fn merge_headers(&self, target: &Header, source: &Header) -> bool {
        target.merge(source)
    }

    /// 合并两个工作表,返回新工作表（名称与表头取 target）
    ///
    /// # 规则
    /// - 表头结构相等才可合并
    /// - 每列追加 source 对应列的单元格,行列表按顺序追加 source 的行
    ///
    /// # 错误
    /// - HeaderMismatch: 表头不一致或任一列合并失败; 两个输入均不受影响
    pub fn merge_sheets(&self, target: &Sheet, source: &Sheet) -> ImportResult<Sheet> {
        let mismatch = || ImportError::HeaderMismatch {
            target: target.name().to_string(),
            source_sheet: source.name().to_string(),
        };

        if !self.merge_headers(target.header(), source.header()) {
            return Err(mismatch());
        }

        // 列快照: 失败时直接丢弃,target 不变
        let mut columns = target.columns().to_vec();
        for (column, other) in columns.iter_mut().zip(source.columns()) {
            if !column.merge(other) {
                return Err(mismatch());
            }
        }

        let mut rows = Vec::with_capacity(target.row_count() + source.row_count());
        rows.extend_from_slice(target.rows());
        rows.extend_from_slice(source.rows());

        Ok(Sheet::from_parts(
            target.name().to_string(),
            target.header().clone(),
            columns,
            rows,
        ))
    }

    /// 原地合并: 成功时替换 target,失败时 target 保持不变
    pub fn merge_into(&self, target: &mut Sheet, source: &Sheet) -> bool {
        match self.merge_sheets(target, source) {
            Ok(merged) => {
                *target = merged;
                true
            }
            Err(e) => {
                debug!(reason = %e, "工作表合并失败");
                false
            }
        }
    }

    /// 文档内合并: 全部工作表按顺序合并为第一个工作表
    ///
    /// 少于两个工作表时原样返回
    #[instrument(skip(self, document), fields(document = %document.name(), sheets = document.sheet_count()))]
    pub fn reduce(&self, document: &Document) -> ImportResult<Document> {
        if document.sheet_count() < 2 {
            return Ok(document.clone());
        }

        let mut sheets = document.sheets().iter();
        let mut merged = match sheets.next() {
            Some(first) => first.clone(),
            None => return Ok(document.clone()),
        };
        for sheet in sheets {
            merged = self.merge_sheets(&merged, sheet)?;
        }

        debug!(rows = merged.row_count(), "文档内工作表合并完成");
        Ok(Document::new(document.name(), vec![merged]))
    }

    /// 合并两个文档,结果沿用 document 的名称
    ///
    /// # 模式
    /// - Soft: 追加 other 的全部工作表,总是成功
    /// - Hard: 两个文档各自须能合并为单表,再合并两表
    ///
    /// # 错误
    /// - DocumentNotMergeable: 某个文档内部无法合并,或没有工作表
    /// - HeaderMismatch: 两个文档的合并结果结构不同
    ///
    /// 输入文档在任何情况下都不被修改
    #[instrument(skip(self, document, other), fields(document = %document.name(), other = %other.name()))]
    pub fn merge_documents(
        &self,
        document: &Document,
        other: &Document,
        mode: MergeMode,
    ) -> ImportResult<Document> {
        match mode {
            MergeMode::Soft => {
                let sheets = document
                    .sheets()
                    .iter()
                    .chain(other.sheets())
                    .cloned()
                    .collect::<Vec<_>>();
                info!(sheets = sheets.len(), "软合并完成");
                Ok(Document::new(document.name(), sheets))
            }
            MergeMode::Hard => {
                let left = self.reduce_or_reject(document)?;
                let right = self.reduce_or_reject(other)?;

                let a = Self::single_sheet(document, &left)?;
                let b = Self::single_sheet(other, &right)?;
                let merged = self.merge_sheets(a, b).map_err(|e| {
                    warn!(reason = %e, "硬合并失败, 工作表结构不同");
                    e
                })?;

                info!(rows = merged.row_count(), "硬合并完成");
                Ok(Document::new(document.name(), vec![merged]))
            }
        }
    }

    /// 将单个工作表并入文档
    pub fn merge_sheet_into(
        &self,
        document: &Document,
        sheet: &Sheet,
        mode: MergeMode,
    ) -> ImportResult<Document> {
        let wrapper = Document::new(String::new(), vec![sheet.clone()]);
        self.merge_documents(document, &wrapper, mode)
    }

    /// 硬合并要求每个文档归并后恰有一个工作表
    fn single_sheet<'a>(source: &Document, reduced: &'a Document) -> ImportResult<&'a Sheet> {
        reduced.first_sheet().ok_or_else(|| {
            warn!(document = %source.name(), "文档没有工作表, 无法硬合并");
            ImportError::DocumentNotMergeable(source.name().to_string())
        })
    }

    fn reduce_or_reject(&self, document: &Document) -> ImportResult<Document> {
        self.reduce(document).map_err(|e| {
            warn!(document = %document.name(), reason = %e, "文档内工作表无法合并");
            ImportError::DocumentNotMergeable(document.name().to_string())
        })
    }
}
