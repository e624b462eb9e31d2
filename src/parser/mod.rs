//! C header parser.
//!
//! Extracts the declarations of interest (function prototypes and
//! `typedef struct TAG TAG;` opaque handles) from header source text.
//!
//! This is a pragmatic statement-level parser in the spirit of the rest of
//! the tool: comments and preprocessor directives are blanked out with line
//! structure preserved (diagnostics carry real line numbers), the remaining
//! text is split into top-level statements, and each statement is matched
//! against the supported declaration shapes. A statement that matches
//! nothing produces one diagnostic and parsing moves on; a bad declaration
//! never aborts the header.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::ctype::CType;
use crate::core::decl::{CParam, Declaration, FunctionDecl, OpaqueHandleDecl};
use crate::core::registry::OpaqueRegistry;
use crate::util::diagnostic::Diagnostic;

static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//[^\n]*").unwrap());

/// `typedef struct TAG NAME` (whitespace already collapsed).
static OPAQUE_TYPEDEF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^typedef struct ([A-Za-z_][A-Za-z0-9_]*) ([A-Za-z_][A-Za-z0-9_]*)$").unwrap()
});

/// `RetType name(params)` (whitespace already collapsed). The return type is
/// one or more words each followed by spaces or stars; the last bare word
/// before the parenthesis is the function name.
static PROTOTYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:[A-Za-z_][A-Za-z0-9_]*[ *]+)+?)([A-Za-z_][A-Za-z0-9_]*) ?\(([^()]*)\)$")
        .unwrap()
});

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Result of parsing one header.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// Declarations in source order.
    pub decls: Vec<Declaration>,

    /// One diagnostic per malformed statement, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

/// A top-level statement with its starting line.
#[derive(Debug)]
struct Statement {
    text: String,
    line: u32,
}

/// Parser for C header files.
#[derive(Debug, Default)]
pub struct HeaderParser;

impl HeaderParser {
    /// Create a new header parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse header source text.
    ///
    /// Opaque handle typedefs are registered in `opaques` as they are seen,
    /// so later declarations in this header (and later headers in the same
    /// run) can reference them.
    pub fn parse(&self, content: &str, opaques: &mut OpaqueRegistry) -> ParseOutcome {
        let stripped = strip_comments(content);
        let blanked = blank_preprocessor_lines(&stripped);
        let (statements, unterminated) = split_statements(&blanked);

        let mut outcome = ParseOutcome::default();
        for stmt in &statements {
            match self.parse_statement(stmt, opaques) {
                Ok(decl) => outcome.decls.push(decl),
                Err(diag) => outcome.diagnostics.push(diag),
            }
        }

        if let Some(stmt) = unterminated {
            outcome.diagnostics.push(
                Diagnostic::error("unterminated statement at end of header")
                    .with_line(stmt.line)
                    .with_snippet(stmt.text.as_str()),
            );
        }

        tracing::debug!(
            "parsed {} declaration(s), {} diagnostic(s)",
            outcome.decls.len(),
            outcome.diagnostics.len()
        );

        outcome
    }

    /// Parse one collapsed statement.
    fn parse_statement(
        &self,
        stmt: &Statement,
        opaques: &mut OpaqueRegistry,
    ) -> Result<Declaration, Diagnostic> {
        let mut text = stmt.text.as_str();
        loop {
            let before = text;
            for prefix in ["extern ", "static ", "inline "] {
                if let Some(rest) = text.strip_prefix(prefix) {
                    text = rest;
                }
            }
            if text == before {
                break;
            }
        }

        if let Some(caps) = OPAQUE_TYPEDEF_RE.captures(text) {
            let tag = caps[1].to_string();
            let name = &caps[2];
            if tag != name {
                return Err(Diagnostic::error(format!(
                    "typedef `{name}` does not follow the `typedef struct {tag} {tag};` \
                     opaque handle idiom"
                ))
                .with_line(stmt.line)
                .with_snippet(stmt.text.as_str()));
            }
            opaques.register(tag.clone());
            return Ok(Declaration::OpaqueHandle(OpaqueHandleDecl {
                tag,
                line: stmt.line,
            }));
        }

        if text.starts_with("typedef ")
            || text.starts_with("struct ")
            || text.starts_with("union ")
            || text.starts_with("enum ")
        {
            return Err(Diagnostic::error(
                "only `typedef struct TAG TAG;` opaque handle typedefs are supported",
            )
            .with_line(stmt.line)
            .with_snippet(stmt.text.as_str())
            .with_suggestion(
                "structs with visible fields have no mapping policy; keep them out of the \
                 binding surface",
            ));
        }

        if let Some(caps) = PROTOTYPE_RE.captures(text) {
            let ret_spelling = caps[1].trim().to_string();
            let name = caps[2].to_string();
            let (params, variadic) = self
                .parse_params(&caps[3], opaques)
                .map_err(|message| {
                    Diagnostic::error(message)
                        .with_line(stmt.line)
                        .with_snippet(stmt.text.as_str())
                })?;
            let ret = CType::parse(&ret_spelling, opaques);
            return Ok(Declaration::Function(FunctionDecl {
                name,
                params,
                ret,
                variadic,
                line: stmt.line,
            }));
        }

        Err(Diagnostic::error(
            "unrecognized declaration; function pointers, arrays, and struct definitions \
             are not supported",
        )
        .with_line(stmt.line)
        .with_snippet(stmt.text.as_str()))
    }

    /// Parse a prototype's parameter list.
    fn parse_params(
        &self,
        raw: &str,
        opaques: &OpaqueRegistry,
    ) -> Result<(Vec<CParam>, bool), String> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "void" {
            return Ok((Vec::new(), false));
        }

        let mut params = Vec::new();
        let mut variadic = false;
        let pieces: Vec<&str> = raw.split(',').map(str::trim).collect();
        let count = pieces.len();

        for (i, piece) in pieces.iter().enumerate() {
            if *piece == "..." {
                if i + 1 != count {
                    return Err("`...` must be the last parameter".to_string());
                }
                variadic = true;
                continue;
            }
            if piece.is_empty() {
                return Err("empty parameter in parameter list".to_string());
            }

            let (type_part, name) = split_param(piece);
            if type_part.trim().is_empty() {
                return Err(format!("cannot parse parameter `{piece}`"));
            }
            let name = match name {
                // Unnamed parameters get a stable synthesized name.
                None => format!("arg{i}"),
                Some(n) if IDENT_RE.is_match(&n) => n,
                Some(_) => return Err(format!("cannot parse parameter `{piece}`")),
            };

            params.push(CParam::new(name, CType::parse(&type_part, opaques)));
        }

        Ok((params, variadic))
    }
}

/// Blank out comments while preserving line structure.
fn strip_comments(content: &str) -> String {
    let blanked = BLOCK_COMMENT_RE.replace_all(content, |caps: &regex::Captures<'_>| {
        caps[0]
            .chars()
            .map(|c| if c == '\n' { '\n' } else { ' ' })
            .collect::<String>()
    });
    LINE_COMMENT_RE.replace_all(&blanked, " ").to_string()
}

/// Blank out preprocessor directives (including `\`-continued lines).
fn blank_preprocessor_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut continuation = false;
    for line in text.lines() {
        let is_directive = continuation || line.trim_start().starts_with('#');
        continuation = is_directive && line.trim_end().ends_with('\\');
        if !is_directive {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Split text into top-level statements, tracking the starting line of each.
///
/// Statements only end at a `;` outside braces, so a struct definition with
/// field declarations arrives as a single (unsupported) statement. Returns
/// any trailing text that never saw a terminating `;`.
fn split_statements(text: &str) -> (Vec<Statement>, Option<Statement>) {
    let mut statements = Vec::new();
    let mut buf = String::new();
    let mut line = 1u32;
    let mut start_line = 1u32;
    let mut depth = 0i32;
    let mut has_content = false;

    for c in text.chars() {
        if c == '\n' {
            line += 1;
        }
        if c == ';' && depth <= 0 {
            let collapsed = collapse_whitespace(&buf);
            if !collapsed.is_empty() {
                statements.push(Statement {
                    text: collapsed,
                    line: start_line,
                });
            }
            buf.clear();
            has_content = false;
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if !c.is_whitespace() && !has_content {
            start_line = line;
            has_content = true;
        }
        buf.push(if c == '\n' { ' ' } else { c });
    }

    let trailing = collapse_whitespace(&buf);
    let unterminated = (!trailing.is_empty()).then(|| Statement {
        text: trailing,
        line: start_line,
    });

    (statements, unterminated)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a parameter into its type spelling and optional name.
fn split_param(piece: &str) -> (String, Option<String>) {
    // Pointer declarators bind the stars to the type: `const char *path`
    // splits after the last `*`.
    if let Some(star) = piece.rfind('*') {
        let name = piece[star + 1..].trim();
        let type_part = piece[..=star].to_string();
        if name.is_empty() {
            return (type_part, None);
        }
        return (type_part, Some(name.to_string()));
    }

    let tokens: Vec<&str> = piece.split_whitespace().collect();
    match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() && !is_type_keyword(last) => {
            (rest.join(" "), Some((*last).to_string()))
        }
        _ => (piece.to_string(), None),
    }
}

fn is_type_keyword(token: &str) -> bool {
    matches!(
        token,
        "void"
            | "char"
            | "short"
            | "int"
            | "long"
            | "float"
            | "double"
            | "signed"
            | "unsigned"
            | "const"
            | "size_t"
            | "int8_t"
            | "int16_t"
            | "int32_t"
            | "int64_t"
            | "uint8_t"
            | "uint16_t"
            | "uint32_t"
            | "uint64_t"
    )
}
