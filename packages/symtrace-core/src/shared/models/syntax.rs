//! Syntax tree model consumed by the trace builder
//!
//! Language-agnostic shape of the frontend output: function definitions,
//! statements and expressions with source locations. Only the constructs
//! the trace builder distinguishes get their own variants; everything else
//! is carried as `Unsupported`/`Other` with its children so traversal still
//! reaches nested calls and accesses.

use serde::{Deserialize, Serialize};

use super::SourceLocation;

/// One parsed source file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub file_path: String,
    pub functions: Vec<FunctionDecl>,
}

/// Function declaration or definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Fully qualified name (`ns::Class::method`, plain name for C)
    pub qualified_name: String,
    pub location: SourceLocation,
    pub parameters: Vec<ParamDecl>,
    /// `None` for prototypes
    pub body: Option<Stmt>,
}

impl FunctionDecl {
    pub fn is_definition(&self) -> bool {
        self.body.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub declared_type: String,
    pub location: SourceLocation,
}

/// Local variable declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub declared_type: String,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Compound(Vec<Stmt>),
    /// `int a = 1, *b;` declares several variables in one statement
    Decl(Vec<VarDecl>),
    Expr(Expr),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        increment: Option<Expr>,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    /// switch, labels, goto, break... carried with their nested statements
    Other(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Reference to a variable (local, parameter or global)
    VarRef(String),
    Literal(Literal),
    /// Binary operators, assignments included (`=`, `+=`, ...)
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    Subscript {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Callee,
        args: Vec<Expr>,
    },
    Paren(Box<Expr>),
    Cast {
        target_type: String,
        operand: Box<Expr>,
    },
    /// Member access, ternaries, compound literals...
    Unsupported(Vec<Expr>),
}

/// Call target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callee {
    /// Statically known function, by qualified name
    Direct(String),
    /// Function pointers, virtual calls, computed targets
    Indirect(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Char(i64),
    /// Content bytes without the implicit terminator
    String(Vec<u8>),
    /// `L"..."`, `u"..."`, `U"..."`: little-endian code units of `char_width` bytes
    WideString { bytes: Vec<u8>, char_width: u8 },
}

impl Literal {
    /// Byte length of a string literal, terminator included when asked
    pub fn string_byte_length(&self, with_terminator: bool) -> Option<u64> {
        let (bytes, char_width) = match self {
            Literal::String(bytes) => (bytes, 1),
            Literal::WideString { bytes, char_width } => (bytes, u64::from(*char_width)),
            _ => return None,
        };
        let terminator = if with_terminator { char_width } else { 0 };
        Some(bytes.len() as u64 + terminator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    ShlAssign,
    ShrAssign,
    AndAssign,
    XorAssign,
    OrAssign,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Bitwise
    Shl,
    Shr,
    BitAnd,
    BitXor,
    BitOr,

    // Comparison
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,

    // Logical (short-circuit)
    LogicalAnd,
    LogicalOr,

    Comma,
}

impl BinaryOperator {
    /// Parse a C operator token
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "=" => Self::Assign,
            "+=" => Self::AddAssign,
            "-=" => Self::SubAssign,
            "*=" => Self::MulAssign,
            "/=" => Self::DivAssign,
            "%=" => Self::RemAssign,
            "<<=" => Self::ShlAssign,
            ">>=" => Self::ShrAssign,
            "&=" => Self::AndAssign,
            "^=" => Self::XorAssign,
            "|=" => Self::OrAssign,
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Rem,
            "<<" => Self::Shl,
            ">>" => Self::Shr,
            "&" => Self::BitAnd,
            "^" => Self::BitXor,
            "|" => Self::BitOr,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            "&&" => Self::LogicalAnd,
            "||" => Self::LogicalOr,
            "," => Self::Comma,
            _ => return None,
        };
        Some(op)
    }

    /// Compound assignments (`+=`, ...) are not plain `=`
    pub fn is_compound_assignment(self) -> bool {
        matches!(
            self,
            Self::AddAssign
                | Self::SubAssign
                | Self::MulAssign
                | Self::DivAssign
                | Self::RemAssign
                | Self::ShlAssign
                | Self::ShrAssign
                | Self::AndAssign
                | Self::XorAssign
                | Self::OrAssign
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// `!x`
    LogicalNot,
    /// `-x`
    Minus,
    /// `+x`
    Plus,
    /// `~x`
    BitNot,
    /// `*p`
    Deref,
    /// `&x`
    AddressOf,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    Sizeof,
}

impl Expr {
    pub fn new(kind: ExprKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    pub fn var(name: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(ExprKind::VarRef(name.into()), location)
    }

    pub fn int(value: i64, location: SourceLocation) -> Self {
        Self::new(ExprKind::Literal(Literal::Integer(value)), location)
    }

    pub fn string(content: impl Into<Vec<u8>>, location: SourceLocation) -> Self {
        Self::new(ExprKind::Literal(Literal::String(content.into())), location)
    }

    pub fn binary(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Self {
        let location = lhs.location.clone();
        Self::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            location,
        )
    }

    pub fn unary(op: UnaryOperator, operand: Expr, location: SourceLocation) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            location,
        )
    }

    pub fn subscript(base: Expr, index: Expr) -> Self {
        let location = base.location.clone();
        Self::new(
            ExprKind::Subscript {
                base: Box::new(base),
                index: Box::new(index),
            },
            location,
        )
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>, location: SourceLocation) -> Self {
        Self::new(
            ExprKind::Call {
                callee: Callee::Direct(callee.into()),
                args,
            },
            location,
        )
    }

    pub fn paren(inner: Expr, location: SourceLocation) -> Self {
        Self::new(ExprKind::Paren(Box::new(inner)), location)
    }

    /// Integer literal value, looking through parentheses only
    pub fn as_integer_literal(&self) -> Option<i64> {
        match &self.kind {
            ExprKind::Literal(Literal::Integer(value)) => Some(*value),
            ExprKind::Paren(inner) => inner.as_integer_literal(),
            _ => None,
        }
    }

    /// Strip parentheses and casts
    pub fn ignore_parens_and_casts(&self) -> &Expr {
        match &self.kind {
            ExprKind::Paren(inner) => inner.ignore_parens_and_casts(),
            ExprKind::Cast { operand, .. } => operand.ignore_parens_and_casts(),
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens() {
        assert_eq!(BinaryOperator::from_token("="), Some(BinaryOperator::Assign));
        assert_eq!(BinaryOperator::from_token("<="), Some(BinaryOperator::Le));
        assert_eq!(BinaryOperator::from_token("&&"), Some(BinaryOperator::LogicalAnd));
        assert_eq!(BinaryOperator::from_token("<=>"), None);
        assert!(BinaryOperator::AddAssign.is_compound_assignment());
        assert!(!BinaryOperator::Assign.is_compound_assignment());
    }

    #[test]
    fn test_string_byte_length() {
        let narrow = Literal::String(b"hi".to_vec());
        assert_eq!(narrow.string_byte_length(false), Some(2));
        assert_eq!(narrow.string_byte_length(true), Some(3));

        let wide = Literal::WideString {
            bytes: vec![b'h', 0, 0, 0, b'i', 0, 0, 0],
            char_width: 4,
        };
        assert_eq!(wide.string_byte_length(false), Some(8));
        assert_eq!(wide.string_byte_length(true), Some(12));

        assert_eq!(Literal::Integer(2).string_byte_length(true), None);
    }

    #[test]
    fn test_integer_literal_through_parens() {
        let loc = SourceLocation::unknown();
        let lit = Expr::paren(Expr::int(3, loc.clone()), loc.clone());
        assert_eq!(lit.as_integer_literal(), Some(3));

        let negated = Expr::unary(UnaryOperator::Minus, Expr::int(3, loc.clone()), loc);
        assert_eq!(negated.as_integer_literal(), None);
    }
}
