// ==========================================
// 工作簿数据映射系统 - 记录结构描述
// ==========================================
// 职责: 以显式描述替代运行时反射
//       有序列表 (成员名, 源列名, 转换规则) + 赋值函数,由构建器在注册时生成
// 转换规则:
// - 数值 ↔ 数值（允许宽化/窄化）
// - 文本 ↔ 文本
// - 布尔 ↔ 布尔
// - 其余组合一律失败,不回落默认值
// ==========================================

use crate::domain::{CellKind, CellValue};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Coercion - 成员类型类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coercion {
    Numeric,
    Text,
    Boolean,
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Numeric => write!(f, "NUMERIC"),
            Coercion::Text => write!(f, "TEXT"),
            Coercion::Boolean => write!(f, "BOOLEAN"),
        }
    }
}

impl Coercion {
    /// 单元格类型是否可赋给该类别的成员
    pub fn accepts(self, kind: CellKind) -> bool {
        matches!(
            (self, kind),
            (Coercion::Numeric, CellKind::Numeric)
                | (Coercion::Text, CellKind::Text)
                | (Coercion::Boolean, CellKind::Boolean)
        )
    }
}

// ==========================================
// NumericField - 数值成员类型
// ==========================================
/// 由单元格数值转换为成员数值类型
///
/// 整数目标: 四舍六入五成双,非有限值或超出范围返回 None
/// 浮点目标: f32 溢出为无穷时返回 None
pub trait NumericField: Sized + Send + 'static {
    fn from_cell_number(value: f64) -> Option<Self>;
}

macro_rules! impl_numeric_field_for_int {
    ($($t:ty),*) => {
        $(
            impl NumericField for $t {
                fn from_cell_number(value: f64) -> Option<Self> {
                    if !value.is_finite() {
                        return None;
                    }
                    let rounded = value.round_ties_even();
                    // MAX as f64 可能向上取整,上界用 MAX + 1 的开区间
                    if rounded < <$t>::MIN as f64 || rounded >= <$t>::MAX as f64 + 1.0 {
                        return None;
                    }
                    Some(rounded as $t)
                }
            }
        )*
    };
}

impl_numeric_field_for_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl NumericField for f64 {
    fn from_cell_number(value: f64) -> Option<Self> {
        Some(value)
    }
}

impl NumericField for f32 {
    fn from_cell_number(value: f64) -> Option<Self> {
        let narrowed = value as f32;
        if value.is_finite() && narrowed.is_infinite() {
            return None;
        }
        Some(narrowed)
    }
}

// ==========================================
// FieldBinding - 单个成员绑定
// ==========================================
type Setter<T> = Box<dyn Fn(&mut T, &CellValue) -> bool + Send + Sync>;

pub struct FieldBinding<T> {
    member: String,
    column: Option<String>,
    coercion: Coercion,
    setter: Setter<T>,
}

impl<T> FieldBinding<T> {
    pub fn member(&self) -> &str {
        &self.member
    }

    /// 手动映射时声明的源列名
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn coercion(&self) -> Coercion {
        self.coercion
    }

    /// 将单元格值赋给实例成员
    ///
    /// # 返回
    /// - true: 赋值成功
    /// - false: 类型不兼容或数值超出目标范围,实例未修改
    pub fn assign(&self, target: &mut T, cell: &CellValue) -> bool {
        self.coercion.accepts(cell.kind()) && (self.setter)(target, cell)
    }
}

impl<T> fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("member", &self.member)
            .field("column", &self.column)
            .field("coercion", &self.coercion)
            .finish()
    }
}

// ==========================================
// RecordSchema - 目标类型结构描述
// ==========================================
pub struct RecordSchema<T> {
    fields: Vec<FieldBinding<T>>,
}

impl<T: 'static> RecordSchema<T> {
    pub fn builder() -> RecordSchemaBuilder<T> {
        RecordSchemaBuilder { fields: Vec::new() }
    }
}

impl<T> RecordSchema<T> {
    pub fn fields(&self) -> &[FieldBinding<T>] {
        &self.fields
    }

    pub fn field(&self, member: &str) -> Option<&FieldBinding<T>> {
        self.fields.iter().find(|f| f.member == member)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for RecordSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

// ==========================================
// RecordSchemaBuilder - 结构描述构建器
// ==========================================
// *_from 变体声明手动映射的源列名
pub struct RecordSchemaBuilder<T> {
    fields: Vec<FieldBinding<T>>,
}

impl<T: 'static> RecordSchemaBuilder<T> {
    pub fn text<F>(self, member: &str, set: F) -> Self
    where
        F: Fn(&mut T, String) + Send + Sync + 'static,
    {
        self.push_text(member, None, set)
    }

    pub fn text_from<F>(self, member: &str, column: &str, set: F) -> Self
    where
        F: Fn(&mut T, String) + Send + Sync + 'static,
    {
        self.push_text(member, Some(column), set)
    }

    pub fn number<N, F>(self, member: &str, set: F) -> Self
    where
        N: NumericField,
        F: Fn(&mut T, N) + Send + Sync + 'static,
    {
        self.push_number(member, None, set)
    }

    pub fn number_from<N, F>(self, member: &str, column: &str, set: F) -> Self
    where
        N: NumericField,
        F: Fn(&mut T, N) + Send + Sync + 'static,
    {
        self.push_number(member, Some(column), set)
    }

    pub fn boolean<F>(self, member: &str, set: F) -> Self
    where
        F: Fn(&mut T, bool) + Send + Sync + 'static,
    {
        self.push_boolean(member, None, set)
    }

    pub fn boolean_from<F>(self, member: &str, column: &str, set: F) -> Self
    where
        F: Fn(&mut T, bool) + Send + Sync + 'static,
    {
        self.push_boolean(member, Some(column), set)
    }

    pub fn build(self) -> RecordSchema<T> {
        RecordSchema {
            fields: self.fields,
        }
    }

    fn push_text<F>(self, member: &str, column: Option<&str>, set: F) -> Self
    where
        F: Fn(&mut T, String) + Send + Sync + 'static,
    {
        self.push(member, column, Coercion::Text, move |target, cell| match cell {
            CellValue::Text(s) => {
                set(target, s.clone());
                true
            }
            _ => false,
        })
    }

    fn push_number<N, F>(self, member: &str, column: Option<&str>, set: F) -> Self
    where
        N: NumericField,
        F: Fn(&mut T, N) + Send + Sync + 'static,
    {
        self.push(member, column, Coercion::Numeric, move |target, cell| {
            match cell.as_number().and_then(N::from_cell_number) {
                Some(value) => {
                    set(target, value);
                    true
                }
                None => false,
            }
        })
    }

    fn push_boolean<F>(self, member: &str, column: Option<&str>, set: F) -> Self
    where
        F: Fn(&mut T, bool) + Send + Sync + 'static,
    {
        self.push(member, column, Coercion::Boolean, move |target, cell| match cell {
            CellValue::Boolean(b) => {
                set(target, *b);
                true
            }
            _ => false,
        })
    }

    fn push<S>(mut self, member: &str, column: Option<&str>, coercion: Coercion, setter: S) -> Self
    where
        S: Fn(&mut T, &CellValue) -> bool + Send + Sync + 'static,
    {
        self.fields.push(FieldBinding {
            member: member.to_string(),
            column: column.map(str::to_string),
            coercion,
            setter: Box::new(setter),
        });
        self
    }
}

// ==========================================
// Record - 可映射的目标类型
// ==========================================
/// 目标类型实现该 trait 以提供结构描述; 未匹配的成员保持 Default 值
pub trait Record: Default + Send + Sync + 'static {
    fn schema() -> RecordSchema<Self>;
}
