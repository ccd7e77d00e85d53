//! Values flowing through expression lowering.
//!
//! An expression lowers to one of three shapes: a literal constant that
//! has not touched the instruction stream yet, a named variable that is
//! still addressable (and must be loaded before use), or a computed
//! temporary that already lives in some block.

use crate::ir::{IrConst, IrType, ValueRef};
use crate::types::SemanticType;

/// A literal carried at its source type until an instruction needs it.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Byte(i8),
    Bool(bool),
    Int(i32),
    Long(i64),
    Single(f32),
    Double(f64),
    Str(String),
}

impl ConstValue {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            ConstValue::Byte(_) => SemanticType::Byte,
            ConstValue::Bool(_) => SemanticType::Boolean,
            ConstValue::Int(_) => SemanticType::Integer,
            ConstValue::Long(_) => SemanticType::Long,
            ConstValue::Single(_) => SemanticType::Single,
            ConstValue::Double(_) => SemanticType::Double,
            ConstValue::Str(_) => SemanticType::String,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            ConstValue::Byte(v) => *v == 0,
            ConstValue::Bool(v) => !v,
            ConstValue::Int(v) => *v == 0,
            ConstValue::Long(v) => *v == 0,
            ConstValue::Single(v) => *v == 0.0,
            ConstValue::Double(v) => *v == 0.0,
            ConstValue::Str(_) => false,
        }
    }

    /// Immediate form for numeric constants. Strings have no immediate
    /// form; they lower through an interned global instead.
    pub fn as_const(&self) -> Option<IrConst> {
        match self {
            ConstValue::Byte(v) => Some(IrConst::I8(*v)),
            ConstValue::Bool(v) => Some(IrConst::I8(i8::from(*v))),
            ConstValue::Int(v) => Some(IrConst::I32(*v)),
            ConstValue::Long(v) => Some(IrConst::I64(*v)),
            ConstValue::Single(v) => Some(IrConst::F32(*v)),
            ConstValue::Double(v) => Some(IrConst::F64(*v)),
            ConstValue::Str(_) => None,
        }
    }

    /// Fold unary minus. Widens on overflow, so `-(-2147483648)` becomes
    /// a `Long` rather than wrapping. `None` for strings.
    pub fn negated(&self) -> Option<ConstValue> {
        match self {
            ConstValue::Byte(v) => Some(match v.checked_neg() {
                Some(n) => ConstValue::Byte(n),
                None => ConstValue::Int(-i32::from(*v)),
            }),
            ConstValue::Bool(v) => Some(ConstValue::Byte(-i8::from(*v))),
            ConstValue::Int(v) => Some(match v.checked_neg() {
                Some(n) => ConstValue::Int(n),
                None => ConstValue::Long(-i64::from(*v)),
            }),
            ConstValue::Long(v) => v.checked_neg().map(ConstValue::Long),
            ConstValue::Single(v) => Some(ConstValue::Single(-v)),
            ConstValue::Double(v) => Some(ConstValue::Double(-v)),
            ConstValue::Str(_) => None,
        }
    }
}

/// Result of lowering one expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Constant(ConstValue),
    /// A declared variable. `slot` indexes the owning function's slots;
    /// reading the variable requires a load.
    Variable {
        name: String,
        ty: SemanticType,
        slot: usize,
    },
    /// A temporary (or loaded value) already present in the stream.
    Computed { value: ValueRef, ty: IrType },
}

impl Value {
    /// Backend type this value has once materialized as an operand.
    pub fn backend_ty(&self) -> IrType {
        match self {
            Value::Constant(c) => c.semantic_type().backend(),
            Value::Variable { ty, .. } => ty.backend(),
            Value::Computed { ty, .. } => *ty,
        }
    }

    pub fn is_string(&self) -> bool {
        self.backend_ty() == IrType::Ptr
    }

    pub fn is_const_zero(&self) -> bool {
        matches!(self, Value::Constant(c) if c.is_zero())
    }
}
