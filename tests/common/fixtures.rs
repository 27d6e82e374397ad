use std::fs;
use std::path::{Path, PathBuf};

use kidl_ast::Compilation;

/// Get path to a fixture in tests/fixtures/
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a JSON compilation from tests/fixtures/
pub fn load_compilation(name: &str) -> Compilation {
    let path = fixture_path(name);
    let source = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e));
    serde_json::from_str(&source)
        .unwrap_or_else(|e| panic!("Fixture {} is not a compilation: {}", name, e))
}
