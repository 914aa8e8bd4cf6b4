//! Shared models
//!
//! Source locations and the syntax tree handed over by the frontend.

pub mod location;
pub mod syntax;

pub use location::SourceLocation;
pub use syntax::{
    BinaryOperator, Callee, Expr, ExprKind, FunctionDecl, Literal, ParamDecl, Stmt,
    TranslationUnit, UnaryOperator, VarDecl,
};
