//! Build script to generate fixture tests from tests/fixtures/manifest.toml
//!
//! Each `[[tests]]` entry in the manifest becomes an individual test
//! function so failures name the script that produced them.

// Build scripts should panic on errors (standard Rust build script pattern)
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    tests: Vec<TestCase>,
}

#[derive(Debug, Deserialize)]
struct TestCase {
    name: String,
    file: String,
    #[allow(dead_code)]
    expected: String,
    #[serde(default)]
    #[allow(dead_code)]
    description: String,
    #[serde(default)]
    skip: bool,
}

fn sanitize_test_name(name: &str) -> String {
    name.replace(['-', '.', ' '], "_")
}

fn main() {
    let manifest_path = Path::new("tests/fixtures/manifest.toml");
    println!("cargo:rerun-if-changed={}", manifest_path.display());
    println!("cargo:rerun-if-changed=tests/fixtures");

    let content = fs::read_to_string(manifest_path).expect("Failed to read manifest.toml");
    let manifest: Manifest = toml::from_str(&content).expect("Failed to parse manifest.toml");

    // Detect duplicate test names at build time. `run_fixture_test` uses
    // `iter().find()` which returns the first match, so duplicate names
    // would silently load the wrong script. Fail fast here.
    {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for test in &manifest.tests {
            if let Some(prev_file) = seen.insert(test.name.as_str(), test.file.as_str()) {
                panic!(
                    "build.rs: duplicate fixture test name '{}'\n  first:  {}\n  second: {}\n\
                     Test names must be unique.",
                    test.name, prev_file, test.file
                );
            }
        }
    }

    // Generate the test code
    let mut code = String::new();

    code.push_str("// Auto-generated by build.rs - DO NOT EDIT\n");
    code.push_str("// Generated from tests/fixtures/manifest.toml\n\n");

    for test in &manifest.tests {
        let test_fn_name = sanitize_test_name(&test.name);
        code.push_str("#[test]\n");
        // Add #[ignore] attribute for skipped tests
        if test.skip {
            code.push_str("#[ignore]\n");
        }
        code.push_str(&format!("fn {}() {{\n", test_fn_name));
        code.push_str(&format!("    run_fixture_test(\"{}\");\n", test.name));
        code.push_str("}\n\n");
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("fixture_tests_generated.rs");
    fs::write(&dest_path, code).expect("Failed to write generated tests");
}
