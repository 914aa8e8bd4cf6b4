//! C frontend - tree-sitter C → syntax tree model
//!
//! Lowers a tree-sitter-c parse into [`TranslationUnit`]. Constructs the
//! trace builder distinguishes get dedicated variants; everything else is
//! kept as `Stmt::Other` / `ExprKind::Unsupported` with its children so
//! nested calls and accesses are still visited.
//!
//! Positions are 1-based (line and column). Declarations, functions and
//! expressions are located at their first token.
//!
//! A call through an identifier bound in the enclosing function (parameter
//! or local) is indirect: only names that resolve to a function are direct
//! callees.

use std::cell::RefCell;

use rustc_hash::FxHashSet;
use tree_sitter::{Node, Parser, Tree};

use crate::features::symbolic_trace::domain::{TraceError, TraceResult};
use crate::features::symbolic_trace::ports::SyntaxFrontend;
use crate::shared::models::{
    BinaryOperator, Callee, Expr, ExprKind, FunctionDecl, Literal, ParamDecl, SourceLocation,
    Stmt, TranslationUnit, UnaryOperator, VarDecl,
};

/// Nodes that carry neither statements nor expressions
const SKIPPED_KINDS: &[&str] = &[
    "comment",
    "primitive_type",
    "type_identifier",
    "sized_type_specifier",
    "type_descriptor",
    "type_qualifier",
    "storage_class_specifier",
    "statement_identifier",
    "field_identifier",
];

const STATEMENT_KINDS: &[&str] = &[
    "compound_statement",
    "declaration",
    "expression_statement",
    "if_statement",
    "while_statement",
    "do_statement",
    "for_statement",
    "return_statement",
    "switch_statement",
    "case_statement",
    "labeled_statement",
    "break_statement",
    "continue_statement",
    "goto_statement",
    "attributed_statement",
];

pub struct CFrontend {
    parser: Parser,
}

impl CFrontend {
    pub fn new() -> TraceResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c::language())
            .map_err(|e| TraceError::frontend(format!("Failed to set C language: {}", e)))?;

        Ok(Self { parser })
    }

    fn parse(&mut self, source: &str) -> TraceResult<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| TraceError::frontend("Failed to parse C code"))
    }
}

impl SyntaxFrontend for CFrontend {
    fn parse_source(&mut self, file_path: &str, source: &str) -> TraceResult<TranslationUnit> {
        let tree = self.parse(source)?;
        let root = tree.root_node();
        if root.has_error() {
            tracing::warn!(file = file_path, "C source contains syntax errors, lowering what parsed");
        }

        let lowering = Lowering {
            file_path,
            source,
            bound: RefCell::default(),
        };
        let mut functions = Vec::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            lowering.collect_functions(child, &mut functions);
        }

        tracing::debug!(file = file_path, functions = functions.len(), "C source lowered");

        Ok(TranslationUnit {
            file_path: file_path.to_string(),
            functions,
        })
    }

    fn language_name(&self) -> &'static str {
        "c"
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Lowering
// ═══════════════════════════════════════════════════════════════════════════

struct Lowering<'s> {
    file_path: &'s str,
    source: &'s str,
    /// Variables bound so far in the function being lowered
    bound: RefCell<FxHashSet<String>>,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn location(&self, node: Node) -> SourceLocation {
        let start = node.start_position();
        SourceLocation::new(self.file_path, start.row as u32 + 1, start.column as u32 + 1)
    }

    fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| !SKIPPED_KINDS.contains(&child.kind()))
            .collect()
    }

    // ───────────────────────────────────────────────────────────────────────
    // Top level
    // ───────────────────────────────────────────────────────────────────────

    fn collect_functions(&self, node: Node, out: &mut Vec<FunctionDecl>) {
        match node.kind() {
            "function_definition" => {
                let Some(declarator) = node.child_by_field_name("declarator") else {
                    return;
                };
                let Some(function) = find_function_declarator(declarator) else {
                    return;
                };
                let Some(mut decl) = self.function_decl(node, function) else {
                    return;
                };
                *self.bound.borrow_mut() =
                    decl.parameters.iter().map(|param| param.name.clone()).collect();
                decl.body = node
                    .child_by_field_name("body")
                    .map(|body| self.lower_stmt(body));
                self.bound.borrow_mut().clear();
                out.push(decl);
            }
            // Prototypes; global variables carry no trace
            "declaration" => {
                let mut cursor = node.walk();
                for declarator in node.children_by_field_name("declarator", &mut cursor) {
                    if let Some(function) = find_function_declarator(declarator) {
                        if let Some(decl) = self.function_decl(node, function) {
                            out.push(decl);
                        }
                    }
                }
            }
            // #ifdef blocks, extern "C"-like wrappers...
            "preproc_ifdef" | "preproc_if" | "preproc_else" | "preproc_elif"
            | "linkage_specification" | "declaration_list" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.collect_functions(child, out);
                }
            }
            _ => {}
        }
    }

    /// Declaration without body, located at the start of `decl`
    fn function_decl(&self, decl: Node, function: Node) -> Option<FunctionDecl> {
        let name_node = function
            .child_by_field_name("declarator")
            .and_then(declarator_name)?;
        let parameters = function
            .child_by_field_name("parameters")
            .map(|list| self.parameters(list))
            .unwrap_or_default();

        Some(FunctionDecl {
            qualified_name: self.text(name_node).to_string(),
            location: self.location(decl),
            parameters,
            body: None,
        })
    }

    fn parameters(&self, list: Node) -> Vec<ParamDecl> {
        let mut cursor = list.walk();
        list.named_children(&mut cursor)
            .filter(|param| param.kind() == "parameter_declaration")
            .filter_map(|param| {
                // `void` and unnamed parameters have no declarator name
                let declarator = param.child_by_field_name("declarator")?;
                let name = declarator_name(declarator)?;
                Some(ParamDecl {
                    name: self.text(name).to_string(),
                    declared_type: self.declared_type(param, declarator),
                    location: self.location(name),
                })
            })
            .collect()
    }

    fn declared_type(&self, decl: Node, declarator: Node) -> String {
        let base = decl
            .child_by_field_name("type")
            .map(|ty| self.text(ty).to_string())
            .unwrap_or_default();
        type_with_declarator(base, declarator)
    }

    // ───────────────────────────────────────────────────────────────────────
    // Statements
    // ───────────────────────────────────────────────────────────────────────

    fn lower_stmt(&self, node: Node) -> Stmt {
        match node.kind() {
            "compound_statement" => Stmt::Compound(self.lower_children(node)),
            "declaration" => self.lower_declaration(node),
            "expression_statement" => match Self::named_children(node).first() {
                Some(expr) => Stmt::Expr(self.lower_expr(*expr)),
                None => Stmt::Other(Vec::new()),
            },
            "if_statement" => self.lower_if(node),
            "while_statement" => match (
                node.child_by_field_name("condition"),
                node.child_by_field_name("body"),
            ) {
                (Some(condition), Some(body)) => Stmt::While {
                    condition: self.lower_expr(condition),
                    body: Box::new(self.lower_stmt(body)),
                },
                _ => Stmt::Other(self.lower_children(node)),
            },
            "do_statement" => match (
                node.child_by_field_name("body"),
                node.child_by_field_name("condition"),
            ) {
                (Some(body), Some(condition)) => Stmt::DoWhile {
                    body: Box::new(self.lower_stmt(body)),
                    condition: self.lower_expr(condition),
                },
                _ => Stmt::Other(self.lower_children(node)),
            },
            "for_statement" => self.lower_for(node),
            "return_statement" => Stmt::Return(
                Self::named_children(node)
                    .first()
                    .map(|value| self.lower_expr(*value)),
            ),
            _ => Stmt::Other(self.lower_children(node)),
        }
    }

    /// Children as statements, bare expressions wrapped in `Stmt::Expr`
    fn lower_children(&self, node: Node) -> Vec<Stmt> {
        Self::named_children(node)
            .into_iter()
            .map(|child| self.lower_stmt_or_expr(child))
            .collect()
    }

    fn lower_stmt_or_expr(&self, node: Node) -> Stmt {
        if STATEMENT_KINDS.contains(&node.kind()) {
            self.lower_stmt(node)
        } else {
            Stmt::Expr(self.lower_expr(node))
        }
    }

    fn lower_declaration(&self, node: Node) -> Stmt {
        let mut decls = Vec::new();
        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            let (target, init) = if declarator.kind() == "init_declarator" {
                (
                    declarator.child_by_field_name("declarator"),
                    declarator.child_by_field_name("value"),
                )
            } else {
                (Some(declarator), None)
            };
            let Some(target) = target else {
                continue;
            };
            // Local prototypes declare no variable
            if find_function_declarator(target).is_some() {
                continue;
            }
            let Some(name) = declarator_name(target) else {
                continue;
            };
            let name = self.text(name).to_string();
            self.bound.borrow_mut().insert(name.clone());

            decls.push(VarDecl {
                name,
                declared_type: self.declared_type(node, target),
                init: init.map(|value| self.lower_initializer(value)),
                location: self.location(node),
            });
        }
        Stmt::Decl(decls)
    }

    /// `{1, 2}` initializer lists are not expressions
    fn lower_initializer(&self, node: Node) -> Expr {
        if node.kind() == "initializer_list" {
            let children = Self::named_children(node)
                .into_iter()
                .map(|child| self.lower_initializer(child))
                .collect();
            Expr::new(ExprKind::Unsupported(children), self.location(node))
        } else {
            self.lower_expr(node)
        }
    }

    fn lower_if(&self, node: Node) -> Stmt {
        let (Some(condition), Some(consequence)) = (
            node.child_by_field_name("condition"),
            node.child_by_field_name("consequence"),
        ) else {
            return Stmt::Other(self.lower_children(node));
        };

        let else_branch = node.child_by_field_name("alternative").and_then(|alt| {
            if alt.kind() == "else_clause" {
                Self::named_children(alt)
                    .first()
                    .map(|stmt| Box::new(self.lower_stmt_or_expr(*stmt)))
            } else {
                Some(Box::new(self.lower_stmt_or_expr(alt)))
            }
        });

        Stmt::If {
            condition: self.lower_expr(condition),
            then_branch: Box::new(self.lower_stmt_or_expr(consequence)),
            else_branch,
            location: self.location(node),
        }
    }

    fn lower_for(&self, node: Node) -> Stmt {
        let Some(body) = node.child_by_field_name("body") else {
            return Stmt::Other(self.lower_children(node));
        };

        Stmt::For {
            init: node
                .child_by_field_name("initializer")
                .map(|init| Box::new(self.lower_stmt_or_expr(init))),
            condition: node
                .child_by_field_name("condition")
                .map(|condition| self.lower_expr(condition)),
            increment: node
                .child_by_field_name("update")
                .map(|update| self.lower_expr(update)),
            body: Box::new(self.lower_stmt(body)),
        }
    }

    // ───────────────────────────────────────────────────────────────────────
    // Expressions
    // ───────────────────────────────────────────────────────────────────────

    fn lower_expr(&self, node: Node) -> Expr {
        let location = self.location(node);
        let kind = match node.kind() {
            "identifier" => ExprKind::VarRef(self.text(node).to_string()),
            "number_literal" => self.number_literal(node),
            "char_literal" => match char_value(self.text(node)) {
                Some(value) => ExprKind::Literal(Literal::Char(value)),
                None => ExprKind::Unsupported(Vec::new()),
            },
            "string_literal" => {
                let (char_width, units) = string_units(self.text(node));
                ExprKind::Literal(string_literal(char_width, &units))
            }
            "concatenated_string" => self.concatenated_string(node),
            "true" => ExprKind::Literal(Literal::Bool(true)),
            "false" => ExprKind::Literal(Literal::Bool(false)),
            "null" => ExprKind::Literal(Literal::Integer(0)),
            "parenthesized_expression" => match Self::named_children(node).first() {
                Some(inner) => ExprKind::Paren(Box::new(self.lower_expr(*inner))),
                None => ExprKind::Unsupported(Vec::new()),
            },
            "assignment_expression" | "binary_expression" => self.binary(node),
            "comma_expression" => self.comma(node),
            "unary_expression" | "pointer_expression" => self.unary(node),
            "update_expression" => self.update(node),
            "sizeof_expression" => match node.child_by_field_name("value") {
                Some(value) => ExprKind::Unary {
                    op: UnaryOperator::Sizeof,
                    operand: Box::new(self.lower_expr(value)),
                },
                None => ExprKind::Unsupported(Vec::new()),
            },
            "subscript_expression" => match (
                node.child_by_field_name("argument"),
                node.child_by_field_name("index"),
            ) {
                (Some(base), Some(index)) => ExprKind::Subscript {
                    base: Box::new(self.lower_expr(base)),
                    index: Box::new(self.lower_expr(index)),
                },
                _ => self.unsupported(node),
            },
            "call_expression" => self.call(node),
            "cast_expression" => match node.child_by_field_name("value") {
                Some(value) => ExprKind::Cast {
                    target_type: node
                        .child_by_field_name("type")
                        .map(|ty| self.text(ty).to_string())
                        .unwrap_or_default(),
                    operand: Box::new(self.lower_expr(value)),
                },
                None => self.unsupported(node),
            },
            _ => self.unsupported(node),
        };
        Expr::new(kind, location)
    }

    fn unsupported(&self, node: Node) -> ExprKind {
        let children = Self::named_children(node)
            .into_iter()
            .map(|child| self.lower_expr(child))
            .collect();
        ExprKind::Unsupported(children)
    }

    fn binary(&self, node: Node) -> ExprKind {
        let (Some(lhs), Some(op), Some(rhs)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) else {
            return self.unsupported(node);
        };

        let lhs = self.lower_expr(lhs);
        let rhs = self.lower_expr(rhs);
        match BinaryOperator::from_token(self.text(op)) {
            Some(op) => ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            None => {
                tracing::trace!(token = self.text(op), "unknown binary operator");
                ExprKind::Unsupported(vec![lhs, rhs])
            }
        }
    }

    fn comma(&self, node: Node) -> ExprKind {
        match (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) {
            (Some(lhs), Some(rhs)) => ExprKind::Binary {
                op: BinaryOperator::Comma,
                lhs: Box::new(self.lower_expr(lhs)),
                rhs: Box::new(self.lower_expr(rhs)),
            },
            _ => self.unsupported(node),
        }
    }

    fn unary(&self, node: Node) -> ExprKind {
        let (Some(op), Some(operand)) = (
            node.child_by_field_name("operator"),
            node.child_by_field_name("argument"),
        ) else {
            return self.unsupported(node);
        };

        let op = match self.text(op) {
            "!" => UnaryOperator::LogicalNot,
            "-" => UnaryOperator::Minus,
            "+" => UnaryOperator::Plus,
            "~" => UnaryOperator::BitNot,
            "*" => UnaryOperator::Deref,
            "&" => UnaryOperator::AddressOf,
            _ => return self.unsupported(node),
        };
        ExprKind::Unary {
            op,
            operand: Box::new(self.lower_expr(operand)),
        }
    }

    fn update(&self, node: Node) -> ExprKind {
        let (Some(op), Some(operand)) = (
            node.child_by_field_name("operator"),
            node.child_by_field_name("argument"),
        ) else {
            return self.unsupported(node);
        };

        let prefix = op.start_byte() < operand.start_byte();
        let op = match (self.text(op), prefix) {
            ("++", true) => UnaryOperator::PreIncrement,
            ("--", true) => UnaryOperator::PreDecrement,
            ("++", false) => UnaryOperator::PostIncrement,
            ("--", false) => UnaryOperator::PostDecrement,
            _ => return self.unsupported(node),
        };
        ExprKind::Unary {
            op,
            operand: Box::new(self.lower_expr(operand)),
        }
    }

    fn call(&self, node: Node) -> ExprKind {
        let args = node
            .child_by_field_name("arguments")
            .map(|list| {
                Self::named_children(list)
                    .into_iter()
                    .map(|arg| self.lower_expr(arg))
                    .collect()
            })
            .unwrap_or_default();

        let callee = match node.child_by_field_name("function") {
            Some(function)
                if function.kind() == "identifier"
                    && !self.bound.borrow().contains(self.text(function)) =>
            {
                Callee::Direct(self.text(function).to_string())
            }
            Some(function) => Callee::Indirect(Box::new(self.lower_expr(function))),
            None => return ExprKind::Unsupported(args),
        };
        ExprKind::Call { callee, args }
    }

    fn number_literal(&self, node: Node) -> ExprKind {
        let text = self.text(node);
        match parse_number(text) {
            Some(literal) => ExprKind::Literal(literal),
            None => {
                tracing::warn!(literal = text, location = %self.location(node), "unrepresentable number literal");
                ExprKind::Unsupported(Vec::new())
            }
        }
    }

    /// `"ab" "cd"` is one literal; macro pieces make it unknown
    fn concatenated_string(&self, node: Node) -> ExprKind {
        let mut char_width = 1;
        let mut units = Vec::new();
        for piece in Self::named_children(node) {
            if piece.kind() != "string_literal" {
                return self.unsupported(node);
            }
            let (width, piece_units) = string_units(self.text(piece));
            // One prefixed piece makes the whole literal wide
            char_width = char_width.max(width);
            units.extend(piece_units);
        }
        ExprKind::Literal(string_literal(char_width, &units))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Declarator helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Identifier named by a (possibly nested) declarator
fn declarator_name(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "identifier" | "field_identifier" => Some(node),
        _ => inner_declarator(node).and_then(declarator_name),
    }
}

/// `function_declarator` under pointer/paren wrappers (`char *f(void)`)
fn find_function_declarator(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        // `int (*fp)(int)` is a pointer variable, not a function
        "function_declarator" => {
            let pointer = node
                .child_by_field_name("declarator")
                .filter(|inner| inner.kind() == "parenthesized_declarator")
                .and_then(inner_declarator)
                .is_some_and(|inner| inner.kind() == "pointer_declarator");
            (!pointer).then_some(node)
        }
        "pointer_declarator" | "parenthesized_declarator" | "attributed_declarator" => {
            inner_declarator(node).and_then(find_function_declarator)
        }
        _ => None,
    }
}

fn inner_declarator(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("declarator").or_else(|| {
        let mut cursor = node.walk();
        let first = node.named_children(&mut cursor).next();
        first
    })
}

fn type_with_declarator(base: String, declarator: Node) -> String {
    match declarator.kind() {
        "pointer_declarator" => {
            let ty = format!("{} *", base);
            match declarator.child_by_field_name("declarator") {
                Some(inner) => type_with_declarator(ty, inner),
                None => ty,
            }
        }
        "array_declarator" => {
            let ty = format!("{}[]", base);
            match declarator.child_by_field_name("declarator") {
                Some(inner) => type_with_declarator(ty, inner),
                None => ty,
            }
        }
        _ => base,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Literal decoding
// ═══════════════════════════════════════════════════════════════════════════

fn parse_number(text: &str) -> Option<Literal> {
    let cleaned: String = text.chars().filter(|c| *c != '\'').collect();
    let lower = cleaned.to_ascii_lowercase();

    let is_hex = lower.starts_with("0x");
    let is_float = if is_hex {
        lower.contains('.') || lower.contains('p')
    } else {
        lower.contains('.') || lower.contains('e')
    };

    if is_float {
        let digits = lower.trim_end_matches(['f', 'l']);
        return digits.parse::<f64>().ok().map(Literal::Float);
    }

    let digits = lower.trim_end_matches(['u', 'l']);
    let (radix, body) = if let Some(hex) = digits.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = digits.strip_prefix("0b") {
        (2, bin)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // Unsigned literals above i64::MAX keep their bit pattern
    u64::from_str_radix(body, radix)
        .ok()
        .map(|value| Literal::Integer(value as i64))
}

/// One decoded element of a character or string literal body
#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit {
    /// `\x41`, `\101`: a code unit in the literal's own encoding
    Raw(u32),
    /// Source characters, simple and universal-character escapes
    Char(char),
}

impl Unit {
    fn value(self) -> u32 {
        match self {
            Unit::Raw(value) => value,
            Unit::Char(c) => c as u32,
        }
    }
}

/// Bytes per code unit for an encoding prefix
fn char_width(prefix: &str) -> u8 {
    match prefix {
        "L" | "U" => 4,
        "u" => 2,
        _ => 1,
    }
}

/// Encoding width and decoded body of a string literal token
fn string_units(token: &str) -> (u8, Vec<Unit>) {
    let Some(quote) = token.find('"') else {
        return (1, decode_units(token));
    };
    let start = quote + 1;
    let end = token.rfind('"').filter(|end| *end >= start).unwrap_or(token.len());
    (char_width(&token[..quote]), decode_units(&token[start..end]))
}

fn string_literal(char_width: u8, units: &[Unit]) -> Literal {
    let bytes = encode_units(units, char_width);
    if char_width == 1 {
        Literal::String(bytes)
    } else {
        Literal::WideString { bytes, char_width }
    }
}

/// Little-endian encoding; narrow literals are UTF-8
fn encode_units(units: &[Unit], char_width: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(units.len() * usize::from(char_width));
    for unit in units {
        match (*unit, char_width) {
            (Unit::Raw(value), 1) => out.push(value as u8),
            (Unit::Raw(value), 2) => out.extend_from_slice(&(value as u16).to_le_bytes()),
            (Unit::Raw(value), _) => out.extend_from_slice(&value.to_le_bytes()),
            (Unit::Char(c), 1) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            (Unit::Char(c), 2) => {
                let mut buf = [0u16; 2];
                for code_unit in c.encode_utf16(&mut buf) {
                    out.extend_from_slice(&code_unit.to_le_bytes());
                }
            }
            (Unit::Char(c), _) => out.extend_from_slice(&(c as u32).to_le_bytes()),
        }
    }
    out
}

/// Value of a character literal. Plain `char` is signed.
fn char_value(token: &str) -> Option<i64> {
    let quote = token.find('\'')?;
    let end = token.rfind('\'')?;
    if end <= quote + 1 {
        return None;
    }
    let units = decode_units(&token[quote + 1..end]);
    match char_width(&token[..quote]) {
        1 => encode_units(&units, 1).first().map(|b| *b as i8 as i64),
        _ => units.first().map(|unit| i64::from(unit.value())),
    }
}

fn decode_units(body: &str) -> Vec<Unit> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(Unit::Char(c));
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push(Unit::Char('\\'));
            break;
        };
        let unit = match escape {
            'n' => Unit::Char('\n'),
            't' => Unit::Char('\t'),
            'r' => Unit::Char('\r'),
            'a' => Unit::Raw(0x07),
            'b' => Unit::Raw(0x08),
            'f' => Unit::Raw(0x0c),
            'v' => Unit::Raw(0x0b),
            'e' => Unit::Raw(0x1b),
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                Unit::Raw(value)
            }
            'x' => {
                let mut value: u32 = 0;
                while let Some(digit) = chars.peek().and_then(|d| d.to_digit(16)) {
                    value = value.wrapping_mul(16).wrapping_add(digit);
                    chars.next();
                }
                Unit::Raw(value)
            }
            'u' | 'U' => {
                let width = if escape == 'u' { 4 } else { 8 };
                let mut value: u32 = 0;
                for _ in 0..width {
                    match chars.peek().and_then(|d| d.to_digit(16)) {
                        Some(digit) => {
                            value = value * 16 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                Unit::Char(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            // \\ \' \" \? and unknown escapes stand for themselves
            other => Unit::Char(other),
        };
        out.push(unit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lower(source: &str) -> TranslationUnit {
        CFrontend::new()
            .unwrap()
            .parse_source("t.c", source)
            .unwrap()
    }

    fn body_of(unit: &TranslationUnit, index: usize) -> &[Stmt] {
        match unit.functions[index].body.as_ref() {
            Some(Stmt::Compound(stmts)) => stmts,
            other => panic!("expected compound body, got {:?}", other),
        }
    }

    #[test]
    fn test_function_and_parameters() {
        let unit = lower("int f(int n, char *buf) { return n; }\n");
        assert_eq!(unit.functions.len(), 1);

        let f = &unit.functions[0];
        assert_eq!(f.qualified_name, "f");
        assert_eq!(f.location, SourceLocation::new("t.c", 1, 1));
        let names: Vec<_> = f.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["n", "buf"]);
        assert_eq!(f.parameters[1].declared_type, "char *");
    }

    #[test]
    fn test_prototypes_have_no_body() {
        let unit = lower("int g(int);\nvoid h(void) {}\nint counter;\nint (*fp)(int);\n");
        assert_eq!(unit.functions.len(), 2);
        assert!(!unit.functions[0].is_definition());
        assert_eq!(unit.functions[1].qualified_name, "h");
        assert!(unit.functions[1].parameters.is_empty());
    }

    #[test]
    fn test_pointer_returning_function() {
        let unit = lower("char *dup(const char *s) { return 0; }\n");
        assert_eq!(unit.functions[0].qualified_name, "dup");
    }

    #[test]
    fn test_declaration_with_string_initializer() {
        let unit = lower("void f(void) {\n  char *s = \"a\\n\", t;\n}\n");
        match &body_of(&unit, 0)[0] {
            Stmt::Decl(decls) => {
                assert_eq!(decls.len(), 2);
                assert_eq!(decls[0].name, "s");
                assert_eq!(decls[0].location, SourceLocation::new("t.c", 2, 3));
                assert_eq!(
                    decls[0].init.as_ref().map(|e| &e.kind),
                    Some(&ExprKind::Literal(Literal::String(b"a\n".to_vec())))
                );
                assert_eq!(decls[1].name, "t");
                assert_eq!(decls[1].location, decls[0].location);
                assert!(decls[1].init.is_none());
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_lowering() {
        let unit = lower("void f(int n) {\n  if (n > 2) g(1); else g(2);\n}\n");
        match &body_of(&unit, 0)[0] {
            Stmt::If {
                condition,
                else_branch,
                location,
                ..
            } => {
                assert_eq!(*location, SourceLocation::new("t.c", 2, 3));
                let inner = condition.ignore_parens_and_casts();
                assert!(matches!(
                    inner.kind,
                    ExprKind::Binary {
                        op: BinaryOperator::Gt,
                        ..
                    }
                ));
                assert!(else_branch.is_some());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_subscript_call_and_assignment() {
        let unit = lower("void f(void) { a = b; buf[3]; (*fp)(1); g(x, 2); }\n");
        let kinds: Vec<_> = body_of(&unit, 0)
            .iter()
            .map(|stmt| match stmt {
                Stmt::Expr(expr) => expr.kind.clone(),
                other => panic!("expected expression, got {:?}", other),
            })
            .collect();

        assert!(matches!(
            kinds[0],
            ExprKind::Binary {
                op: BinaryOperator::Assign,
                ..
            }
        ));
        assert!(matches!(kinds[1], ExprKind::Subscript { .. }));
        assert!(matches!(
            kinds[2],
            ExprKind::Call {
                callee: Callee::Indirect(_),
                ..
            }
        ));
        match &kinds[3] {
            ExprKind::Call {
                callee: Callee::Direct(name),
                args,
            } => {
                assert_eq!(name, "g");
                assert_eq!(args.len(), 2);
                assert_eq!(args[1].as_integer_literal(), Some(2));
            }
            other => panic!("expected direct call, got {:?}", other),
        }
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(parse_number("42"), Some(Literal::Integer(42)));
        assert_eq!(parse_number("0x1F"), Some(Literal::Integer(31)));
        assert_eq!(parse_number("010"), Some(Literal::Integer(8)));
        assert_eq!(parse_number("0"), Some(Literal::Integer(0)));
        assert_eq!(parse_number("10UL"), Some(Literal::Integer(10)));
        assert_eq!(parse_number("1.5f"), Some(Literal::Float(1.5)));
        assert_eq!(parse_number("1e3"), Some(Literal::Float(1000.0)));
    }

    #[test]
    fn test_calls_through_bound_names_are_indirect() {
        let source = "void f(void (*cb)(int)) {\n  void (*fp)(int) = g;\n  cb(1); fp(2); g(3);\n}\nvoid h(void) { fp(4); }\n";
        let unit = lower(source);
        let callee = |stmt: &Stmt| match stmt {
            Stmt::Expr(Expr {
                kind: ExprKind::Call { callee, .. },
                ..
            }) => callee.clone(),
            other => panic!("expected call, got {:?}", other),
        };

        let body = body_of(&unit, 0);
        assert!(matches!(callee(&body[1]), Callee::Indirect(_)));
        assert!(matches!(callee(&body[2]), Callee::Indirect(_)));
        assert_eq!(callee(&body[3]), Callee::Direct("g".to_string()));

        // Bindings do not leak into the next function
        assert_eq!(
            callee(&body_of(&unit, 1)[0]),
            Callee::Direct("fp".to_string())
        );
    }

    fn string(token: &str) -> Literal {
        let (char_width, units) = string_units(token);
        string_literal(char_width, &units)
    }

    #[test]
    fn test_escape_decoding() {
        assert_eq!(string("\"hi\""), Literal::String(b"hi".to_vec()));
        assert_eq!(string("u8\"a\\tb\""), Literal::String(b"a\tb".to_vec()));
        assert_eq!(
            string("\"\\x41\\101\\0\""),
            Literal::String(vec![b'A', b'A', 0])
        );
        assert_eq!(char_value("'a'"), Some(97));
        assert_eq!(char_value("'\\n'"), Some(10));
        assert_eq!(char_value("'\\xff'"), Some(-1));
        assert_eq!(char_value("L'\\xff'"), Some(255));
        assert_eq!(char_value("''"), None);
    }

    #[test]
    fn test_wide_string_byte_lengths() {
        assert_eq!(string("L\"hi\"").string_byte_length(false), Some(8));
        assert_eq!(string("U\"hi\"").string_byte_length(false), Some(8));
        assert_eq!(string("u\"hi\"").string_byte_length(false), Some(4));
        assert_eq!(string("u\"hi\"").string_byte_length(true), Some(6));
        assert_eq!(
            string("u\"a\""),
            Literal::WideString {
                bytes: vec![b'a', 0],
                char_width: 2,
            }
        );
        // U+1F600 needs a surrogate pair in UTF-16
        assert_eq!(string("u\"\\U0001F600\"").string_byte_length(false), Some(4));
    }
}
