//! End-to-end: C source → tree-sitter → trace registry

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use symtrace_core::features::symbolic_trace::domain::{ActionKind, VariableIdentifier};
use symtrace_core::{
    BlockRegistry, CodeBlock, SourceLocation, TraceBuildingUseCase, TraceBuildingUseCaseImpl,
    TraceConfig, VariableState,
};
use tempfile::NamedTempFile;

fn build(source: &str) -> BlockRegistry {
    build_with(TraceConfig::default(), source)
}

fn build_with(config: TraceConfig, source: &str) -> BlockRegistry {
    TraceBuildingUseCaseImpl::for_c(config)
        .unwrap()
        .build_registry_from_source("e2e.c", source)
        .unwrap()
}

fn only_block(registry: &BlockRegistry) -> &CodeBlock {
    assert_eq!(registry.len(), 1, "{}", registry.dump());
    registry.iter().next().unwrap()
}

#[test]
fn test_branching_function_dump() {
    let source = r#"
void f(int n) {
    char *s = "hi";
    if (n > 2)
        s[3];
    else
        g(1, n);
}
"#;
    let registry = build(source);
    let block = only_block(&registry);

    assert_eq!(
        block.dump(),
        "block f(n) at e2e.c:2:1\n\
         \x20 [e2e.c:3:5] VarDeclared s = buffer(size: 2) if (true)\n\
         \x20 [e2e.c:5:9] ArrayIndexAccess s[int(3)] if (n > int(2))\n\
         \x20 [e2e.c:7:9] FunctionCall g(int(1), unknown) if (n <= int(2))\n"
    );
}

#[test]
fn test_only_definitions_become_blocks() {
    let source = r#"
int helper(int);
static int counter;

int first(void) { return helper(1); }

int second(int a, int b) {
    a = b;
    return a;
}
"#;
    let registry = build(source);
    let names: Vec<_> = registry.iter().map(|b| b.name()).collect();
    assert_eq!(names, vec!["first", "second"]);

    let second = registry.find_by_name("second").next().unwrap();
    assert_eq!(
        second.parameters(),
        &[VariableIdentifier::new("a"), VariableIdentifier::new("b")]
    );
    assert_eq!(
        kinds(second),
        vec![ActionKind::VarAssigned {
            variable: VariableIdentifier::new("a"),
            state: VariableState::copy_of(VariableIdentifier::new("b")),
        }]
    );
}

#[test]
fn test_escaped_and_concatenated_string_sizes() {
    let source = "void f(void) {\n  char *a = \"x\\ty\";\n  char *b = \"ab\" \"cd\";\n}\n";
    let block_sizes: Vec<_> = kinds(only_block(&build(source)))
        .into_iter()
        .map(|kind| match kind {
            ActionKind::VarDeclared { state, .. } => state,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(
        block_sizes,
        vec![VariableState::buffer(3), VariableState::buffer(4)]
    );
}

#[test]
fn test_terminator_counting_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"version: 1\ntrace:\n  count_string_terminator: true\n")
        .unwrap();
    let config = TraceConfig::from_yaml(file.path()).unwrap();

    let registry = build_with(config, "void f(void) { char s[] = \"hi\"; }\n");
    assert_eq!(
        kinds(only_block(&registry)),
        vec![ActionKind::VarDeclared {
            variable: VariableIdentifier::new("s"),
            state: VariableState::buffer(3),
        }]
    );
}

#[test]
fn test_unmodeled_guard_is_skipped() {
    let source = r#"
void f(char *p) {
    if (strlen(p) > 4) {
        p[5];
    } else {
        p[0];
    }
    p[1];
}
"#;
    let block_trace = kinds(only_block(&build(source)));
    assert_eq!(
        block_trace,
        vec![ActionKind::ArrayIndexAccess {
            array: VariableIdentifier::new("p"),
            index: VariableState::integer(1),
        }]
    );
}

#[test]
fn test_logical_guard_and_loops() {
    let source = r#"
void f(int i, int n, char *buf) {
    if (i < n && !buf) {
        for (int k = 0; k < 3; k++) {
            buf[2];
        }
    } else {
        while (n) { use(n, 7); }
    }
}
"#;
    let block = only_block(&build(source)).clone();
    assert_eq!(
        conditions(&block),
        vec![
            "i < n && buf == 0",
            "i < n && buf == 0",
            "i >= n || buf != 0",
        ]
    );
    assert_eq!(block.actions()[0].kind().name(), "VarDeclared");
    assert_eq!(block.actions()[1].kind().name(), "ArrayIndexAccess");
    assert_eq!(
        block.actions()[2].kind(),
        &ActionKind::FunctionCall {
            function: "use".to_string(),
            arguments: vec![VariableState::Unknown, VariableState::integer(7)],
        }
    );
}

#[test]
fn test_dead_branches_pruned_in_source() {
    let source = r#"
void f(void) {
    if (0) { dead(); } else { live(); }
    if (1) { taken(); } else { never(); }
}
"#;
    let block = only_block(&build(source)).clone();
    let calls: Vec<_> = kinds(&block)
        .into_iter()
        .filter_map(|kind| match kind {
            ActionKind::FunctionCall { function, .. } => Some(function),
            _ => None,
        })
        .collect();
    assert_eq!(calls, vec!["live", "taken"]);
}

#[test]
fn test_wide_string_sizes() {
    let source = "void f(void) {\n  int *w = L\"hi\";\n  char16_t *u = u\"hi\";\n  char *n = u8\"hi\";\n}\n";
    let sizes: Vec<_> = kinds(only_block(&build(source)))
        .into_iter()
        .map(|kind| match kind {
            ActionKind::VarDeclared { state, .. } => state,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(
        sizes,
        vec![
            VariableState::buffer(8),
            VariableState::buffer(4),
            VariableState::buffer(2),
        ]
    );

    let counted = TraceConfig::default().count_string_terminator(true);
    let registry = build_with(counted, "void f(void) { int *w = L\"hi\"; }\n");
    assert_eq!(
        kinds(only_block(&registry)),
        vec![ActionKind::VarDeclared {
            variable: VariableIdentifier::new("w"),
            state: VariableState::buffer(12),
        }]
    );
}

#[test]
fn test_indirect_calls_are_ignored() {
    let source = r#"
void f(void (*cb)(int)) {
    void (*fp)(int) = direct;
    cb(1);
    (*cb)(2);
    fp(3);
    direct(4);
}
"#;
    let block = only_block(&build(source)).clone();

    let calls: Vec<_> = kinds(&block)
        .into_iter()
        .filter_map(|kind| match kind {
            ActionKind::FunctionCall { function, .. } => Some(function),
            _ => None,
        })
        .collect();
    assert_eq!(calls, vec!["direct"]);
}

#[test]
fn test_json_export() {
    let registry = build("int f(int n) { if (n) g(2); return 0; }\n");
    let json: serde_json::Value = serde_json::from_str(&registry.to_json().unwrap()).unwrap();

    let blocks = json.as_array().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["function"]["qualified_name"], "f");
    assert_eq!(blocks[0]["actions"].as_array().unwrap().len(), 1);
}

#[test]
fn test_registry_across_files() {
    let mut a = NamedTempFile::new().unwrap();
    a.write_all(b"void a(void) { x[1]; }\n").unwrap();
    let mut b = NamedTempFile::new().unwrap();
    b.write_all(b"void b(void) { y[2]; }\nvoid a(void) {}\n").unwrap();

    let mut usecase = TraceBuildingUseCaseImpl::for_c(TraceConfig::default()).unwrap();
    let registry = usecase
        .build_registry_from_files(&[a.path().to_path_buf(), b.path().to_path_buf()])
        .unwrap();

    // Same name in another file is a different function identity
    assert_eq!(registry.len(), 3);
    let locations: Vec<&SourceLocation> = registry
        .find_by_name("a")
        .map(|block| &block.function().location)
        .collect();
    assert_eq!(locations.len(), 2);
    assert_ne!(locations[0], locations[1]);
}
