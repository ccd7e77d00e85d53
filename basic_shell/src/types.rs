//! Semantic types of the source language.
//!
//! Every declared variable, parameter and function return carries one of
//! these types. Lowering maps them onto the narrower set of backend types
//! in [`crate::ir`]; the mapping is total and never fails.

use basic_shell_parser::ast::TypeName;

use crate::ir::IrType;

/// A declarable source-level type.
///
/// `Byte` and `Boolean` share a backend representation (`i8`) but remain
/// distinct here so diagnostics can name the declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Byte,
    Boolean,
    Integer,
    Long,
    Single,
    Double,
    String,
}

impl SemanticType {
    /// Backend representation of this type.
    pub fn backend(self) -> IrType {
        match self {
            SemanticType::Byte | SemanticType::Boolean => IrType::I8,
            SemanticType::Integer => IrType::I32,
            SemanticType::Long => IrType::I64,
            SemanticType::Single => IrType::F32,
            SemanticType::Double => IrType::F64,
            SemanticType::String => IrType::Ptr,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            SemanticType::Byte | SemanticType::Boolean | SemanticType::Integer | SemanticType::Long
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, SemanticType::Single | SemanticType::Double)
    }

    pub fn is_string(self) -> bool {
        matches!(self, SemanticType::String)
    }

    /// Keyword spelling, used verbatim in diagnostics.
    pub fn keyword(self) -> &'static str {
        match self {
            SemanticType::Byte => "Byte",
            SemanticType::Boolean => "Boolean",
            SemanticType::Integer => "Integer",
            SemanticType::Long => "Long",
            SemanticType::Single => "Single",
            SemanticType::Double => "Double",
            SemanticType::String => "String",
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

impl From<TypeName> for SemanticType {
    fn from(name: TypeName) -> Self {
        match name {
            TypeName::Byte => SemanticType::Byte,
            TypeName::Boolean => SemanticType::Boolean,
            TypeName::Integer => SemanticType::Integer,
            TypeName::Long => SemanticType::Long,
            TypeName::Single => SemanticType::Single,
            TypeName::Double => SemanticType::Double,
            TypeName::String => SemanticType::String,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_mapping_is_total() {
        assert_eq!(SemanticType::Byte.backend(), IrType::I8);
        assert_eq!(SemanticType::Boolean.backend(), IrType::I8);
        assert_eq!(SemanticType::Integer.backend(), IrType::I32);
        assert_eq!(SemanticType::Long.backend(), IrType::I64);
        assert_eq!(SemanticType::Single.backend(), IrType::F32);
        assert_eq!(SemanticType::Double.backend(), IrType::F64);
        assert_eq!(SemanticType::String.backend(), IrType::Ptr);
    }

    #[test]
    fn parser_type_names_convert() {
        assert_eq!(SemanticType::from(TypeName::Integer), SemanticType::Integer);
        assert_eq!(SemanticType::from(TypeName::String), SemanticType::String);
    }

    #[test]
    fn classification() {
        assert!(SemanticType::Boolean.is_integer());
        assert!(SemanticType::Long.is_integer());
        assert!(SemanticType::Single.is_float());
        assert!(!SemanticType::Double.is_integer());
        assert!(SemanticType::String.is_string());
    }
}
