//! Test data builders
//!
//! Short constructors for the syntax tree model so traversal tests read
//! like the C they stand for.

use symtrace_core::shared::models::{
    BinaryOperator, Expr, FunctionDecl, ParamDecl, SourceLocation, Stmt, UnaryOperator, VarDecl,
};

pub const FILE: &str = "test.c";

pub fn loc(line: u32) -> SourceLocation {
    SourceLocation::new(FILE, line, 1)
}

pub fn var(name: &str) -> Expr {
    Expr::var(name, loc(1))
}

pub fn int(value: i64) -> Expr {
    Expr::int(value, loc(1))
}

pub fn string(content: &str) -> Expr {
    Expr::string(content, loc(1))
}

pub fn assign(lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(BinaryOperator::Assign, lhs, rhs)
}

pub fn binary(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Expr {
    Expr::binary(op, lhs, rhs)
}

pub fn index(base: Expr, idx: Expr) -> Expr {
    Expr::subscript(base, idx)
}

pub fn call(function: &str, args: Vec<Expr>) -> Expr {
    Expr::call(function, args, loc(1))
}

pub fn not(operand: Expr) -> Expr {
    Expr::unary(UnaryOperator::LogicalNot, operand, loc(1))
}

pub fn expr(e: Expr) -> Stmt {
    Stmt::Expr(e)
}

pub fn decl(name: &str, declared_type: &str, init: Option<Expr>) -> Stmt {
    Stmt::Decl(vec![VarDecl {
        name: name.to_string(),
        declared_type: declared_type.to_string(),
        init,
        location: loc(1),
    }])
}

pub fn if_then(condition: Expr, then_branch: Vec<Stmt>) -> Stmt {
    Stmt::If {
        condition,
        then_branch: Box::new(Stmt::Compound(then_branch)),
        else_branch: None,
        location: loc(1),
    }
}

pub fn if_else(condition: Expr, then_branch: Vec<Stmt>, else_branch: Vec<Stmt>) -> Stmt {
    Stmt::If {
        condition,
        then_branch: Box::new(Stmt::Compound(then_branch)),
        else_branch: Some(Box::new(Stmt::Compound(else_branch))),
        location: loc(1),
    }
}

/// Builder for FunctionDecl
#[derive(Debug)]
pub struct FunctionBuilder {
    name: String,
    line: u32,
    parameters: Vec<ParamDecl>,
    body: Vec<Stmt>,
}

impl FunctionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            line: 1,
            parameters: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Declaration line (part of the function identity)
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn param(mut self, name: &str, declared_type: &str) -> Self {
        self.parameters.push(ParamDecl {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            location: loc(self.line),
        });
        self
    }

    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.body.push(stmt);
        self
    }

    pub fn build(self) -> FunctionDecl {
        FunctionDecl {
            qualified_name: self.name,
            location: loc(self.line),
            parameters: self.parameters,
            body: Some(Stmt::Compound(self.body)),
        }
    }

    pub fn prototype(self) -> FunctionDecl {
        FunctionDecl {
            qualified_name: self.name,
            location: loc(self.line),
            parameters: self.parameters,
            body: None,
        }
    }
}
