//! Canned header sources for tests.

/// A minimal arithmetic library header, include guards and all. The kind of
/// header the generator was built around.
pub const SIMPLE_MATH_H: &str = r#"#ifndef SIMPLE_MATH_H
#define SIMPLE_MATH_H

int add(int a, int b);
int sub(int a, int b);

#endif /* SIMPLE_MATH_H */
"#;

/// A header mixing an opaque handle with string and status-code functions.
pub const MIXED_API_H: &str = r#"typedef struct db_conn db_conn;
db_conn *db_open(const char *path);
int db_close(db_conn *conn);
const char *db_error(db_conn *conn);
int db_execute(db_conn *conn, const char *sql);
"#;

/// A header where only some declarations can be adapted: the variadic
/// logger and the double-pointer accessor must each produce a diagnostic
/// while the rest still bind.
pub const PARTIAL_API_H: &str = r#"int add(int a, int b);
int log_message(const char *fmt, ...);
int read_all(char **out);
unsigned int checksum(const char *data);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::OpaqueRegistry;
    use crate::parser::HeaderParser;

    #[test]
    fn test_fixtures_parse_cleanly() {
        let mut opaques = OpaqueRegistry::new();
        let parser = HeaderParser::new();

        let simple = parser.parse(SIMPLE_MATH_H, &mut opaques);
        assert!(simple.diagnostics.is_empty());
        assert_eq!(simple.decls.len(), 2);

        let mixed = parser.parse(MIXED_API_H, &mut opaques);
        assert!(mixed.diagnostics.is_empty());
        assert_eq!(mixed.decls.len(), 5);
    }
}
