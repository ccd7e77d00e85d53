//! Type coercion for binary operators, assignment and call arguments.
//!
//! Binary operators unify both sides onto one type: identical types pass
//! through, a float side wins over an integer side, and within a family
//! the wider width wins. Integer-to-float promotion here is unsigned
//! (`uitofp`), faithfully kept from the behavior this models. Assignment
//! and call arguments use the signed rules instead.

use basic_shell_parser::ast::BinOp;

use crate::error::{SemanticError, ShellResult};
use crate::ir::{ArithOp, CastKind, CmpOp, IrType, ValueRef};
use crate::types::SemanticType;
use crate::value::{ConstValue, Value};

use super::Lowering;

/// Resolve a value to an operand: constants become immediates (string
/// literals a pointer into an interned global), variables are loaded,
/// computed values pass through.
pub(crate) fn materialize(lw: &mut Lowering, value: &Value) -> (ValueRef, IrType) {
    let at = lw.at();
    match value {
        Value::Constant(c) => match c.as_const() {
            Some(imm) => (ValueRef::Const(imm), imm.ty()),
            None => {
                let text = match c {
                    ConstValue::Str(s) => s.as_str(),
                    _ => "",
                };
                let global = lw.module.intern_string(text);
                let ptr = lw.module.emit_gep(at, global);
                (ptr, IrType::Ptr)
            }
        },
        Value::Variable { ty, slot, .. } => {
            let backend = ty.backend();
            let loaded = lw.module.emit_load(at, backend, ValueRef::Slot(*slot));
            (loaded, backend)
        }
        Value::Computed { value, ty } => (*value, *ty),
    }
}

/// Bring two numeric operands to one common type. Callers must have
/// rejected string operands already.
fn unify(
    lw: &mut Lowering,
    lhs: ValueRef,
    lt: IrType,
    rhs: ValueRef,
    rt: IrType,
) -> (ValueRef, ValueRef, IrType) {
    if lt == rt {
        return (lhs, rhs, lt);
    }
    let at = lw.at();
    if lt.is_int() && rt.is_float() {
        let cast = lw.module.emit_cast(at, CastKind::Uitofp, lt, rt, lhs);
        (cast, rhs, rt)
    } else if lt.is_float() && rt.is_int() {
        let cast = lw.module.emit_cast(at, CastKind::Uitofp, rt, lt, rhs);
        (lhs, cast, lt)
    } else if lt.is_int() && rt.is_int() {
        if lt.bits() < rt.bits() {
            let cast = lw.module.emit_cast(at, CastKind::Sext, lt, rt, lhs);
            (cast, rhs, rt)
        } else {
            let cast = lw.module.emit_cast(at, CastKind::Sext, rt, lt, rhs);
            (lhs, cast, lt)
        }
    } else if lt.bits() < rt.bits() {
        let cast = lw.module.emit_cast(at, CastKind::Fpext, lt, rt, lhs);
        (cast, rhs, rt)
    } else {
        let cast = lw.module.emit_cast(at, CastKind::Fpext, rt, lt, rhs);
        (lhs, cast, lt)
    }
}

/// Lower an arithmetic operator over two lowered operands.
pub(crate) fn binary_arith(
    lw: &mut Lowering,
    op: BinOp,
    lhs: Value,
    rhs: Value,
) -> ShellResult<Value> {
    if lhs.is_string() || rhs.is_string() {
        return Err(
            SemanticError::unsupported(format!("`{}` on a string value", op.symbol())).into(),
        );
    }
    if op == BinOp::Pow {
        return pow_call(lw, &lhs, &rhs);
    }
    // A constant zero divisor is caught before anything is emitted.
    if op == BinOp::Div && rhs.is_const_zero() {
        return Err(SemanticError::DivisionByZero.into());
    }
    let arith = match op {
        BinOp::Add => ArithOp::Add,
        BinOp::Sub => ArithOp::Sub,
        BinOp::Mul => ArithOp::Mul,
        BinOp::Div => ArithOp::Div,
        other => {
            return Err(SemanticError::unsupported(format!(
                "`{}` is not an arithmetic operator",
                other.symbol()
            ))
            .into())
        }
    };
    let (lv, lt) = materialize(lw, &lhs);
    let (rv, rt) = materialize(lw, &rhs);
    let (lv, rv, ty) = unify(lw, lv, lt, rv, rt);
    let at = lw.at();
    let result = lw.module.emit_binary(at, arith, ty, lv, rv);
    Ok(Value::Computed { value: result, ty })
}

/// Lower a comparison. Only `=`, `<` and `>` reach the backend; the
/// remaining spellings parse but are rejected here.
pub(crate) fn comparison(
    lw: &mut Lowering,
    op: BinOp,
    lhs: Value,
    rhs: Value,
) -> ShellResult<Value> {
    let pred = match op {
        BinOp::Eq => CmpOp::Eq,
        BinOp::Lt => CmpOp::Lt,
        BinOp::Gt => CmpOp::Gt,
        other => {
            return Err(SemanticError::unsupported(format!(
                "comparison `{}` is not available",
                other.symbol()
            ))
            .into())
        }
    };
    if lhs.is_string() || rhs.is_string() {
        return Err(
            SemanticError::unsupported(format!("`{}` on a string value", op.symbol())).into(),
        );
    }
    let (lv, lt) = materialize(lw, &lhs);
    let (rv, rt) = materialize(lw, &rhs);
    let (lv, rv, ty) = unify(lw, lv, lt, rv, rt);
    let at = lw.at();
    let result = lw.module.emit_cmp(at, pred, ty, lv, rv);
    Ok(Value::Computed {
        value: result,
        ty: IrType::I8,
    })
}

/// `^` goes through the C library: both operands become `f64` and the
/// result is the call to `pow`, declared on first use.
fn pow_call(lw: &mut Lowering, lhs: &Value, rhs: &Value) -> ShellResult<Value> {
    let (lv, lt) = materialize(lw, lhs);
    let (rv, rt) = materialize(lw, rhs);
    let lv = to_double(lw, lv, lt);
    let rv = to_double(lw, rv, rt);
    lw.module
        .declare_extern("pow", vec![IrType::F64, IrType::F64], IrType::F64);
    let at = lw.at();
    let result = lw.module.emit_call(
        at,
        "pow",
        IrType::F64,
        vec![(IrType::F64, lv), (IrType::F64, rv)],
    );
    Ok(Value::Computed {
        value: result,
        ty: IrType::F64,
    })
}

fn to_double(lw: &mut Lowering, value: ValueRef, ty: IrType) -> ValueRef {
    let at = lw.at();
    match ty {
        IrType::F64 => value,
        IrType::F32 => lw
            .module
            .emit_cast(at, CastKind::Fpext, ty, IrType::F64, value),
        _ => lw
            .module
            .emit_cast(at, CastKind::Uitofp, ty, IrType::F64, value),
    }
}

/// Store `source` into `target`, which must be a variable.
pub(crate) fn assign(lw: &mut Lowering, target: &Value, source: Value) -> ShellResult<()> {
    let Value::Variable { name, ty, slot } = target else {
        return Err(SemanticError::invalid_target(
            "left side of `=` is not a variable; the line would only compare values",
        )
        .into());
    };
    let backend = ty.backend();

    // String literals take the materialization path: intern the data,
    // store a pointer to its first byte.
    if let Value::Constant(ConstValue::Str(text)) = &source {
        if !ty.is_string() {
            return Err(SemanticError::incompatible(format!(
                "cannot assign a string to `{}` ({})",
                name, ty
            ))
            .into());
        }
        let global = lw.module.intern_string(text);
        let at = lw.at();
        let ptr = lw.module.emit_gep(at, global);
        lw.module
            .emit_store(at, IrType::Ptr, ptr, ValueRef::Slot(*slot));
        return Ok(());
    }

    let (sv, st) = materialize(lw, &source);
    let stored = cast_for_assignment(lw, sv, st, backend, name, *ty)?;
    let at = lw.at();
    lw.module
        .emit_store(at, backend, stored, ValueRef::Slot(*slot));
    Ok(())
}

/// Coerce an already materialized value to a storage type, using the
/// signed assignment rules.
pub(crate) fn cast_for_assignment(
    lw: &mut Lowering,
    value: ValueRef,
    from: IrType,
    to: IrType,
    name: &str,
    target_ty: SemanticType,
) -> ShellResult<ValueRef> {
    if from == to {
        return Ok(value);
    }
    let at = lw.at();
    if to.is_int() && from.is_float() {
        return Ok(lw.module.emit_cast(at, CastKind::Fptosi, from, to, value));
    }
    if to.is_int() && from.is_int() {
        let kind = if from.bits() < to.bits() {
            CastKind::Sext
        } else {
            CastKind::Trunc
        };
        return Ok(lw.module.emit_cast(at, kind, from, to, value));
    }
    if to.is_float() && from.is_float() {
        let kind = if from.bits() < to.bits() {
            CastKind::Fpext
        } else {
            CastKind::Fptrunc
        };
        return Ok(lw.module.emit_cast(at, kind, from, to, value));
    }
    if to.is_float() && from.is_int() {
        return Ok(lw.module.emit_cast(at, CastKind::Sitofp, from, to, value));
    }
    if to == IrType::Ptr {
        return Err(SemanticError::incompatible(format!(
            "cannot assign {} to `{}` ({})",
            from, name, target_ty
        ))
        .into());
    }
    // Pointer into a numeric slot: reinterpret, but say so.
    lw.warn(format!(
        "value assigned to `{}` reinterpreted as {}",
        name, to
    ));
    Ok(lw.module.emit_cast(at, CastKind::Bitcast, from, to, value))
}

/// Coerce one call argument to its parameter type. String data never
/// materializes here; only an already-loaded pointer may flow into a
/// String parameter.
pub(crate) fn cast_call_arg(
    lw: &mut Lowering,
    value: ValueRef,
    from: IrType,
    param_ty: SemanticType,
    callee: &str,
    param: &str,
) -> ShellResult<ValueRef> {
    let to = param_ty.backend();
    if from == to {
        return Ok(value);
    }
    let at = lw.at();
    if to.is_int() && from.is_float() {
        return Ok(lw.module.emit_cast(at, CastKind::Fptosi, from, to, value));
    }
    if to.is_int() && from.is_int() {
        let kind = if from.bits() < to.bits() {
            CastKind::Sext
        } else {
            CastKind::Trunc
        };
        return Ok(lw.module.emit_cast(at, kind, from, to, value));
    }
    if to.is_float() && from.is_float() {
        let kind = if from.bits() < to.bits() {
            CastKind::Fpext
        } else {
            CastKind::Fptrunc
        };
        return Ok(lw.module.emit_cast(at, kind, from, to, value));
    }
    if to.is_float() && from.is_int() {
        return Ok(lw.module.emit_cast(at, CastKind::Sitofp, from, to, value));
    }
    Err(SemanticError::incompatible(format!(
        "cannot pass {} for parameter `{}` ({}) of `{}`",
        from, param, param_ty, callee
    ))
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Instr, IrConst};

    fn lowering() -> Lowering {
        Lowering::new("test")
    }

    fn int(v: i32) -> Value {
        Value::Constant(ConstValue::Int(v))
    }

    fn entry_instrs(lw: &Lowering) -> &[Instr] {
        &lw.module.functions[0].blocks[0].instrs
    }

    #[test]
    fn identical_types_need_no_cast() {
        let mut lw = lowering();
        let out = binary_arith(&mut lw, BinOp::Add, int(1), int(2)).unwrap();
        assert_eq!(out.backend_ty(), IrType::I32);
        assert_eq!(entry_instrs(&lw).len(), 1);
    }

    #[test]
    fn integer_meets_float_by_unsigned_promotion() {
        let mut lw = lowering();
        let out = binary_arith(
            &mut lw,
            BinOp::Add,
            int(1),
            Value::Constant(ConstValue::Double(2.5)),
        )
        .unwrap();
        assert_eq!(out.backend_ty(), IrType::F64);
        assert!(matches!(
            entry_instrs(&lw)[0],
            Instr::Cast {
                kind: CastKind::Uitofp,
                from: IrType::I32,
                to: IrType::F64,
                ..
            }
        ));
    }

    #[test]
    fn narrow_integer_sign_extends() {
        let mut lw = lowering();
        let out = binary_arith(
            &mut lw,
            BinOp::Mul,
            Value::Constant(ConstValue::Byte(3)),
            Value::Constant(ConstValue::Long(9)),
        )
        .unwrap();
        assert_eq!(out.backend_ty(), IrType::I64);
        assert!(matches!(
            entry_instrs(&lw)[0],
            Instr::Cast {
                kind: CastKind::Sext,
                from: IrType::I8,
                to: IrType::I64,
                ..
            }
        ));
    }

    #[test]
    fn narrow_float_widens() {
        let mut lw = lowering();
        let out = binary_arith(
            &mut lw,
            BinOp::Sub,
            Value::Constant(ConstValue::Single(1.0)),
            Value::Constant(ConstValue::Double(2.0)),
        )
        .unwrap();
        assert_eq!(out.backend_ty(), IrType::F64);
        assert!(matches!(
            entry_instrs(&lw)[0],
            Instr::Cast {
                kind: CastKind::Fpext,
                ..
            }
        ));
    }

    #[test]
    fn every_numeric_pair_unifies_onto_one_type() {
        let cases = [
            ConstValue::Byte(1),
            ConstValue::Bool(true),
            ConstValue::Int(2),
            ConstValue::Long(3),
            ConstValue::Single(4.0),
            ConstValue::Double(5.0),
        ];
        for lhs in &cases {
            for rhs in &cases {
                let a = lhs.semantic_type().backend();
                let b = rhs.semantic_type().backend();
                let expect = match (a.is_float(), b.is_float()) {
                    (true, false) => a,
                    (false, true) => b,
                    _ if a.bits() >= b.bits() => a,
                    _ => b,
                };
                let mut lw = lowering();
                let out = binary_arith(
                    &mut lw,
                    BinOp::Add,
                    Value::Constant(lhs.clone()),
                    Value::Constant(rhs.clone()),
                )
                .unwrap();
                assert_eq!(out.backend_ty(), expect, "{:?} + {:?}", lhs, rhs);
            }
        }
    }

    #[test]
    fn division_by_constant_zero_emits_nothing() {
        let mut lw = lowering();
        let err = binary_arith(&mut lw, BinOp::Div, int(1), int(0)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ShellError::Semantic(SemanticError::DivisionByZero)
        ));
        assert!(entry_instrs(&lw).is_empty());

        let err = binary_arith(
            &mut lw,
            BinOp::Div,
            int(1),
            Value::Constant(ConstValue::Double(0.0)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::ShellError::Semantic(SemanticError::DivisionByZero)
        ));
        assert!(entry_instrs(&lw).is_empty());
    }

    #[test]
    fn strings_reject_arithmetic() {
        let mut lw = lowering();
        let err = binary_arith(
            &mut lw,
            BinOp::Add,
            Value::Constant(ConstValue::Str("a".into())),
            int(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::ShellError::Semantic(SemanticError::UnsupportedOperation(_))
        ));
        assert!(entry_instrs(&lw).is_empty());
    }

    #[test]
    fn power_calls_out_to_pow() {
        let mut lw = lowering();
        let out = binary_arith(
            &mut lw,
            BinOp::Pow,
            int(2),
            Value::Constant(ConstValue::Single(3.0)),
        )
        .unwrap();
        assert_eq!(out.backend_ty(), IrType::F64);
        assert_eq!(lw.module.externs.len(), 1);
        assert_eq!(lw.module.externs[0].name, "pow");
        let instrs = entry_instrs(&lw);
        assert!(matches!(
            instrs[0],
            Instr::Cast {
                kind: CastKind::Uitofp,
                to: IrType::F64,
                ..
            }
        ));
        assert!(matches!(
            instrs[1],
            Instr::Cast {
                kind: CastKind::Fpext,
                to: IrType::F64,
                ..
            }
        ));
        assert!(matches!(instrs[2], Instr::Call { .. }));
    }

    #[test]
    fn comparisons_yield_boolean_backed_i8() {
        let mut lw = lowering();
        let out = comparison(&mut lw, BinOp::Gt, int(5), int(3)).unwrap();
        assert_eq!(out.backend_ty(), IrType::I8);
        assert!(matches!(
            entry_instrs(&lw)[0],
            Instr::Cmp {
                op: CmpOp::Gt,
                ty: IrType::I32,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_comparison_spellings_are_rejected() {
        let mut lw = lowering();
        for op in [BinOp::NotEq, BinOp::LtEq, BinOp::GtEq] {
            let err = comparison(&mut lw, op, int(1), int(2)).unwrap_err();
            assert!(matches!(
                err,
                crate::error::ShellError::Semantic(SemanticError::UnsupportedOperation(_))
            ));
        }
        assert!(entry_instrs(&lw).is_empty());
    }

    #[test]
    fn assignment_rejects_non_variable_targets() {
        let mut lw = lowering();
        let err = assign(&mut lw, &int(12), int(5)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ShellError::Semantic(SemanticError::InvalidAssignmentTarget(_))
        ));
    }

    #[test]
    fn assignment_casts_use_signed_conversion() {
        let mut lw = lowering();
        let slot = lw.module.add_slot(lw.contexts[0].func, "d", IrType::F64);
        let target = Value::Variable {
            name: "d".into(),
            ty: SemanticType::Double,
            slot,
        };
        assign(&mut lw, &target, int(7)).unwrap();
        let instrs = entry_instrs(&lw);
        assert!(matches!(
            instrs[0],
            Instr::Cast {
                kind: CastKind::Sitofp,
                from: IrType::I32,
                to: IrType::F64,
                ..
            }
        ));
        assert!(matches!(
            instrs[1],
            Instr::Store {
                ty: IrType::F64,
                target: ValueRef::Slot(s),
                ..
            } if s == slot
        ));
    }

    #[test]
    fn integer_narrowing_assignment_is_silent() {
        let mut lw = lowering();
        let slot = lw.module.add_slot(lw.contexts[0].func, "b", IrType::I8);
        let target = Value::Variable {
            name: "b".into(),
            ty: SemanticType::Byte,
            slot,
        };
        assign(&mut lw, &target, Value::Constant(ConstValue::Long(300))).unwrap();
        assert!(lw.warnings.is_empty());
        assert!(matches!(
            entry_instrs(&lw)[0],
            Instr::Cast {
                kind: CastKind::Trunc,
                from: IrType::I64,
                to: IrType::I8,
                ..
            }
        ));
    }

    #[test]
    fn string_literal_assignment_interns_and_stores_a_pointer() {
        let mut lw = lowering();
        let slot = lw.module.add_slot(lw.contexts[0].func, "s", IrType::Ptr);
        let target = Value::Variable {
            name: "s".into(),
            ty: SemanticType::String,
            slot,
        };
        assign(
            &mut lw,
            &target,
            Value::Constant(ConstValue::Str("hi".into())),
        )
        .unwrap();
        assign(
            &mut lw,
            &target,
            Value::Constant(ConstValue::Str("hi".into())),
        )
        .unwrap();
        assert_eq!(lw.module.globals.len(), 1);
        let instrs = entry_instrs(&lw);
        assert!(matches!(instrs[0], Instr::Gep { .. }));
        assert!(matches!(
            instrs[1],
            Instr::Store {
                ty: IrType::Ptr,
                ..
            }
        ));
    }

    #[test]
    fn string_into_numeric_slot_is_rejected() {
        let mut lw = lowering();
        let slot = lw.module.add_slot(lw.contexts[0].func, "n", IrType::I32);
        let target = Value::Variable {
            name: "n".into(),
            ty: SemanticType::Integer,
            slot,
        };
        let err = assign(
            &mut lw,
            &target,
            Value::Constant(ConstValue::Str("oops".into())),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::ShellError::Semantic(SemanticError::IncompatibleTypes(_))
        ));
        assert!(entry_instrs(&lw).is_empty());
    }

    #[test]
    fn numeric_into_string_slot_is_rejected() {
        let mut lw = lowering();
        let slot = lw.module.add_slot(lw.contexts[0].func, "s", IrType::Ptr);
        let target = Value::Variable {
            name: "s".into(),
            ty: SemanticType::String,
            slot,
        };
        let err = assign(&mut lw, &target, int(3)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ShellError::Semantic(SemanticError::IncompatibleTypes(_))
        ));
    }

    #[test]
    fn pointer_into_numeric_slot_warns_and_reinterprets() {
        let mut lw = lowering();
        let slot = lw.module.add_slot(lw.contexts[0].func, "n", IrType::I64);
        let target = Value::Variable {
            name: "n".into(),
            ty: SemanticType::Long,
            slot,
        };
        assign(
            &mut lw,
            &target,
            Value::Computed {
                value: ValueRef::Temp(0),
                ty: IrType::Ptr,
            },
        )
        .unwrap();
        assert_eq!(lw.warnings.len(), 1);
        assert!(lw.warnings[0].message.contains("reinterpreted"));
        assert!(matches!(
            entry_instrs(&lw)[0],
            Instr::Cast {
                kind: CastKind::Bitcast,
                ..
            }
        ));
    }

    #[test]
    fn call_arguments_never_materialize_strings() {
        let mut lw = lowering();
        let err = cast_call_arg(
            &mut lw,
            ValueRef::Const(IrConst::I32(1)),
            IrType::I32,
            SemanticType::String,
            "greet",
            "who",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::ShellError::Semantic(SemanticError::IncompatibleTypes(_))
        ));
    }
}
