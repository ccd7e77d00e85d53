//! Statement events produced by the parser
//!
//! One `Statement` per submitted line. Compound constructs arrive as
//! separate opener/clause/closer events (`If` ... `ElseIf` ... `EndIf`);
//! matching them up is the consumer's job, not the parser's.

/// Value type keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Byte,
    Boolean,
    Integer,
    Long,
    Single,
    Double,
    String,
}

impl TypeName {
    /// The keyword as written in source
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeName::Byte => "Byte",
            TypeName::Boolean => "Boolean",
            TypeName::Integer => "Integer",
            TypeName::Long => "Long",
            TypeName::Single => "Single",
            TypeName::Double => "Double",
            TypeName::String => "String",
        }
    }
}

/// A literal value, already decoded from its source spelling
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Single(f32),
    Double(f64),
    Bool(bool),
    Str(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    Lt,
    Gt,
    NotEq,
    LtEq,
    GtEq,
}

impl BinOp {
    /// The operator as written in source
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
            BinOp::Eq => "=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::NotEq => "<>",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
        }
    }

    /// True for `= < > <> <= >=`
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Lt | BinOp::Gt | BinOp::NotEq | BinOp::LtEq | BinOp::GtEq
        )
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// A bare name; the consumer resolves it to a variable
    Var(String),
    /// Unary negation
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// One declared name in a `Dim` group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeName,
}

/// One declared parameter of a Sub/Function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeName,
}

/// One statement event
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Blank or comment-only line
    Empty,
    /// `Dim a As Integer, b As Double`
    Dim { decls: Vec<VarDecl> },
    /// `target = value`. The target is an expression on purpose: whether
    /// this line assigns or compares depends on the target's
    /// addressability, which only the consumer can see.
    Assign { target: Expr, value: Expr },
    /// `If cond Then`
    If { cond: Expr },
    /// `ElseIf cond Then`
    ElseIf { cond: Expr },
    /// `Else`
    Else,
    /// `EndIf` or `End If`
    EndIf,
    /// `For var = start To end [Step step]`
    For {
        var: String,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
    },
    /// `Next [var]`
    Next { var: Option<String> },
    /// `Sub name [(params)]`
    Sub { name: String, params: Vec<Param> },
    /// `Function name [(params)] As type`
    Function {
        name: String,
        params: Vec<Param>,
        ret: TypeName,
    },
    /// `End Sub`
    EndSub,
    /// `End Function`
    EndFunction,
    /// `Call name(args)` or statement-position `name(args)`
    Call { name: String, args: Vec<Expr> },
}
