//! CLI integration tests for gangway.
//!
//! These tests verify the full CLI workflow from header input through
//! generated adapter output.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the gangway binary command.
fn gangway() -> Command {
    Command::cargo_bin("gangway").unwrap()
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a header file into a directory.
fn write_header(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

const SIMPLE_MATH_H: &str = "#ifndef SIMPLE_MATH_H\n#define SIMPLE_MATH_H\n\nint add(int a, int b);\n\n#endif /* SIMPLE_MATH_H */\n";

const HANDLE_LIB_H: &str = "typedef struct handle handle;\nhandle *handle_create(const char *name);\nconst char *handle_name(handle *h);\nint handle_close(handle *h);\n";

// ============================================================================
// gangway generate
// ============================================================================

#[test]
fn test_generate_simple_math() {
    let tmp = temp_dir();
    write_header(tmp.path(), "simple_math.h", SIMPLE_MATH_H);

    gangway()
        .args(["generate", "simple_math.h", "-o", "out"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 adapter(s) emitted"));

    let generated = fs::read_to_string(tmp.path().join("out/simple_math_adapters.c")).unwrap();
    assert!(generated.contains("#include \"simple_math.h\""));
    assert!(generated.contains("uint32_t gw_simple_math_add(uint32_t a, uint32_t b)"));
    assert!(generated.contains("return (uint32_t)add((int)a, (int)b);"));
}

#[test]
fn test_generate_is_idempotent() {
    let tmp = temp_dir();
    write_header(tmp.path(), "simple_math.h", SIMPLE_MATH_H);

    gangway()
        .args(["generate", "simple_math.h", "-o", "out"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let first = fs::read(tmp.path().join("out/simple_math_adapters.c")).unwrap();

    gangway()
        .args(["generate", "simple_math.h", "-o", "out"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let second = fs::read(tmp.path().join("out/simple_math_adapters.c")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_generate_opaque_handles_pass_through() {
    let tmp = temp_dir();
    write_header(tmp.path(), "handle_lib.h", HANDLE_LIB_H);

    gangway()
        .args(["generate", "handle_lib.h", "-o", "out"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let generated = fs::read_to_string(tmp.path().join("out/handle_lib_adapters.c")).unwrap();
    assert!(generated.contains("handle *gw_handle_lib_handle_create(const char *name)"));
    assert!(generated.contains("return handle_create(name);"));
    assert!(generated.contains("uint32_t gw_handle_lib_handle_close(handle *h)"));
    // Generated code never reaches into an opaque handle.
    assert!(!generated.contains("->"));
}

#[test]
fn test_generate_partial_failure_still_emits_valid_adapters() {
    let tmp = temp_dir();
    write_header(
        tmp.path(),
        "partial.h",
        "int add(int a, int b);\nint log_message(const char *fmt, ...);\nint sub(int a, int b);\n",
    );

    gangway()
        .args(["generate", "partial.h", "-o", "out"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("variadic"))
        .stderr(predicate::str::contains("could not be adapted"));

    // Valid declarations still produced output.
    let generated = fs::read_to_string(tmp.path().join("out/partial_adapters.c")).unwrap();
    assert!(generated.contains("gw_partial_add"));
    assert!(generated.contains("gw_partial_sub"));
    assert!(!generated.contains("log_message"));
}

#[test]
fn test_generate_with_custom_prefix() {
    let tmp = temp_dir();
    write_header(tmp.path(), "simple_math.h", SIMPLE_MATH_H);

    gangway()
        .args(["generate", "simple_math.h", "-o", "out", "--prefix", "mylib_ffi"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let generated = fs::read_to_string(tmp.path().join("out/simple_math_adapters.c")).unwrap();
    assert!(generated.contains("mylib_ffi_add"));
}

#[test]
fn test_generate_reads_config_file() {
    let tmp = temp_dir();
    write_header(tmp.path(), "simple_math.h", SIMPLE_MATH_H);
    fs::write(
        tmp.path().join("gangway.toml"),
        "[generate]\nprefix = \"cfg_prefix\"\noutput_dir = \"cfg_out\"\n",
    )
    .unwrap();

    gangway()
        .args(["generate", "simple_math.h"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let generated = fs::read_to_string(tmp.path().join("cfg_out/simple_math_adapters.c")).unwrap();
    assert!(generated.contains("cfg_prefix_add"));
}

#[test]
fn test_generate_emit_decls_dumps_json() {
    let tmp = temp_dir();
    write_header(tmp.path(), "simple_math.h", SIMPLE_MATH_H);

    gangway()
        .args(["generate", "simple_math.h", "-o", "out", "--emit-decls"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let decls = fs::read_to_string(tmp.path().join("out/simple_math_decls.json")).unwrap();
    assert!(decls.contains("\"add\""));
    assert!(decls.contains("\"function\""));
}

#[test]
fn test_generate_shares_registry_across_headers() {
    let tmp = temp_dir();
    write_header(tmp.path(), "types.h", "typedef struct db_conn db_conn;\n");
    write_header(tmp.path(), "api.h", "int db_close(db_conn *conn);\n");

    gangway()
        .args(["generate", "types.h", "api.h", "-o", "out"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let generated = fs::read_to_string(tmp.path().join("out/api_adapters.c")).unwrap();
    assert!(generated.contains("uint32_t gw_api_db_close(db_conn *conn)"));
}

#[test]
fn test_generate_fails_on_missing_header() {
    let tmp = temp_dir();

    gangway()
        .args(["generate", "no_such.h"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no header files match"));
}

// ============================================================================
// gangway check
// ============================================================================

#[test]
fn test_check_clean_header() {
    let tmp = temp_dir();
    write_header(tmp.path(), "simple_math.h", SIMPLE_MATH_H);

    gangway()
        .args(["check", "simple_math.h"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All declarations adapt cleanly."));

    // Check never writes output.
    assert!(!tmp.path().join("generated").exists());
}

#[test]
fn test_check_reports_unknown_type() {
    let tmp = temp_dir();
    write_header(tmp.path(), "bad.h", "int take(widget *w);\n");

    gangway()
        .args(["check", "bad.h"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown type `widget`"));
}

// ============================================================================
// gangway completions
// ============================================================================

#[test]
fn test_completions_bash() {
    gangway()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gangway"));
}
