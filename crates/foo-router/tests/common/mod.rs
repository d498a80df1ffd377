#![allow(dead_code)]

use foo_router::{Resolution, RouteError, RouteTree};

pub fn compile(defs: &[(&str, &str)]) -> RouteTree {
    RouteTree::compile(defs.iter().copied())
        .unwrap_or_else(|e| panic!("Failed to compile {defs:?}\nError: {e}"))
}

pub fn compile_err(defs: &[(&str, &str)]) -> RouteError {
    match RouteTree::compile(defs.iter().copied()) {
        Ok(_) => panic!("Expected compile error for: {defs:?}"),
        Err(e) => e,
    }
}

pub fn resolved(tree: &RouteTree, path: &str) -> String {
    match tree.resolve(path, false) {
        Resolution::Matched { target, .. } => target,
        other => panic!("Expected a match for {path:?}, got {other:?}"),
    }
}
