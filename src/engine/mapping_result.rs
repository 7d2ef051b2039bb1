// ==========================================
// 工作簿数据映射系统 - 映射结果汇总
// ==========================================
// 职责: 按目标类型汇总已映射集合,提供按类型查询
// 红线: 纯累积,不合并、不变换值; 仅在批次全部成功后构造
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::importer_trait::CollectionSink;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// MappedCollection - 单个类型的映射输出
// ==========================================
pub struct MappedCollection {
    type_id: TypeId,
    type_name: &'static str,
    output_collection: String,
    len: usize,
    values: Box<dyn Any + Send + Sync>,
}

impl MappedCollection {
    pub fn new<T: Send + Sync + 'static>(output_collection: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            output_collection: output_collection.into(),
            len: values.len(),
            values: Box::new(values),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn output_collection(&self) -> &str {
        &self.output_collection
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 按类型取出有序实例列表
    pub fn values<T: 'static>(&self) -> Option<&[T]> {
        self.values.downcast_ref::<Vec<T>>().map(Vec::as_slice)
    }
}

impl fmt::Debug for MappedCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedCollection")
            .field("type_name", &self.type_name)
            .field("output_collection", &self.output_collection)
            .field("len", &self.len)
            .finish()
    }
}

// ==========================================
// MappingResult - 批次映射结果
// ==========================================
#[derive(Debug)]
pub struct MappingResult {
    batch_id: String,
    collections: Vec<MappedCollection>,
    index: HashMap<TypeId, usize>,
}

impl MappingResult {
    /// 汇总已全部成功的集合（保持处理顺序）
    pub(crate) fn from_collections(batch_id: String, collections: Vec<MappedCollection>) -> Self {
        let index = collections
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.type_id(), idx))
            .collect();
        Self {
            batch_id,
            collections,
            index,
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    /// 按类型查询实例列表
    pub fn get<T: 'static>(&self) -> Option<&[T]> {
        self.collection::<T>().and_then(MappedCollection::values::<T>)
    }

    pub fn collection<T: 'static>(&self) -> Option<&MappedCollection> {
        self.index
            .get(&TypeId::of::<T>())
            .map(|idx| &self.collections[*idx])
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MappedCollection> {
        self.collections.iter()
    }

    /// 按处理顺序将每个集合交给外部落地方
    pub fn export_to<S: CollectionSink + ?Sized>(&self, sink: &mut S) -> ImportResult<()> {
        for collection in &self.collections {
            sink.accept(collection)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a MappingResult {
    type Item = &'a MappedCollection;
    type IntoIter = std::slice::Iter<'a, MappedCollection>;

    fn into_iter(self) -> Self::IntoIter {
        self.collections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(u32);

    #[test]
    fn test_lookup_by_type() {
        let result = MappingResult::from_collections(
            "batch".to_string(),
            vec![
                MappedCollection::new("items", vec![Item(1), Item(2)]),
                MappedCollection::new("names", vec!["a".to_string()]),
            ],
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result.get::<Item>(), Some(&[Item(1), Item(2)][..]));
        assert_eq!(result.get::<String>().map(<[String]>::len), Some(1));
        assert!(result.get::<u8>().is_none());
        assert_eq!(
            result.collection::<Item>().map(MappedCollection::output_collection),
            Some("items")
        );
    }
}
