//! Rich error diagnostics with source snippets, colors, and suggestions.

use crate::compiler::lexer::LexError;
use crate::compiler::parser::ParseError;
use crate::style::Style;
use crate::{CompileError, SourceProgram};
use hrm_core::Mnemonic;
use strum::IntoEnumIterator;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A rendered diagnostic with source context
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<usize>,
    pub col: Option<usize>,
    pub source_line: Option<String>,
    pub underline: Option<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    #[allow(clippy::too_many_arguments)]
    fn at(
        severity: Severity,
        code: &str,
        message: String,
        source: &str,
        filename: &str,
        line: usize,
        col: usize,
        len: usize,
    ) -> Self {
        let source_line = get_source_line(source, line);
        let underline = source_line.as_ref().map(|_| make_underline(col, len));
        Diagnostic {
            severity,
            code: Some(code.to_string()),
            message,
            file: Some(filename.to_string()),
            line: Some(line),
            col: Some(col),
            source_line,
            underline,
            suggestions: vec![],
        }
    }

    fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Render with ANSI colors for terminal
    pub fn render_ansi(&self) -> String {
        let mut out = String::new();

        // Header: error[E001]: message
        let severity_label = match self.severity {
            Severity::Error => Style::Red.paint("error"),
            Severity::Warning => Style::Yellow.paint("warning"),
        };

        if let Some(ref code) = self.code {
            out.push_str(&format!("{}[{}]: ", severity_label, Style::Bold.paint(code)));
        } else {
            out.push_str(&format!("{}: ", severity_label));
        }
        out.push_str(&Style::Bold.paint(&self.message));
        out.push('\n');

        if let (Some(ref file), Some(line), Some(col)) = (&self.file, self.line, self.col) {
            out.push_str(&format!("  {} {}:{}:{}\n", Style::Cyan.paint("-->"), file, line, col));
        }

        if let (Some(line_num), Some(ref line_text), Some(ref underline)) =
            (self.line, &self.source_line, &self.underline)
        {
            out.push_str(&format!("   {}\n", Style::Cyan.paint("|")));
            out.push_str(&format!(
                "{:>3} {} {}\n",
                Style::Cyan.paint(&line_num.to_string()),
                Style::Cyan.paint("|"),
                line_text
            ));
            let marker = Style::Red.paint(underline);
            out.push_str(&format!("   {} {}\n", Style::Cyan.paint("|"), marker));
        }

        if !self.suggestions.is_empty() {
            out.push_str(&format!("   {}\n", Style::Cyan.paint("|")));
            for suggestion in &self.suggestions {
                out.push_str(&format!(
                    "   {} {}: {}\n",
                    Style::Cyan.paint("="),
                    Style::Cyan.paint("help"),
                    suggestion
                ));
            }
        }

        out
    }

    /// Render without colors (for tests and piped output)
    pub fn render_plain(&self) -> String {
        let mut out = String::new();

        let severity_label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };

        if let Some(ref code) = self.code {
            out.push_str(&format!("{}[{}]: ", severity_label, code));
        } else {
            out.push_str(&format!("{}: ", severity_label));
        }
        out.push_str(&self.message);
        out.push('\n');

        if let (Some(ref file), Some(line), Some(col)) = (&self.file, self.line, self.col) {
            out.push_str(&format!("  --> {}:{}:{}\n", file, line, col));
        }

        if let (Some(line_num), Some(ref line_text), Some(ref underline)) =
            (self.line, &self.source_line, &self.underline)
        {
            out.push_str("   |\n");
            out.push_str(&format!("{:>3} | {}\n", line_num, line_text));
            out.push_str(&format!("   | {}\n", underline));
        }

        if !self.suggestions.is_empty() {
            out.push_str("   |\n");
            for suggestion in &self.suggestions {
                out.push_str(&format!("   = help: {}\n", suggestion));
            }
        }

        out
    }
}

fn get_source_line(source: &str, line: usize) -> Option<String> {
    source
        .lines()
        .nth(line.saturating_sub(1))
        .map(|s| s.to_string())
}

fn make_underline(col: usize, len: usize) -> String {
    format!(
        "{}{}",
        " ".repeat(col.saturating_sub(1)),
        "^".repeat(len.max(1))
    )
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut row = vec![0; b_len + 1];
    for i in 1..=a_len {
        row[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            row[j] = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev[b_len]
}

fn suggest_similar(name: &str, candidates: &[String], max_distance: usize) -> Vec<String> {
    let mut matches: Vec<(usize, &String)> = candidates
        .iter()
        .filter_map(|c| {
            let d = edit_distance(name, c);
            (d <= max_distance).then_some((d, c))
        })
        .collect();

    matches.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.cmp(b)));
    matches.into_iter().map(|(_, s)| s.clone()).take(3).collect()
}

fn mnemonic_names() -> Vec<String> {
    Mnemonic::iter().map(|m| m.to_string()).collect()
}

/// Convert a CompileError + source text into a Diagnostic
pub fn format_compile_error(error: &CompileError, source: &str, filename: &str) -> Diagnostic {
    match error {
        CompileError::Lex(e) => format_lex_error(e, source, filename),
        CompileError::Parse(e) => format_parse_error(e, source, filename),
    }
}

fn format_lex_error(error: &LexError, source: &str, filename: &str) -> Diagnostic {
    match error {
        LexError::UnknownLine { text, line, col } => {
            let word = text.split_whitespace().next().unwrap_or_default();
            let suggestions = suggest_similar(&word.to_ascii_uppercase(), &mnemonic_names(), 2)
                .into_iter()
                .map(|s| format!("did you mean '{}'?", s))
                .collect::<Vec<_>>();
            let suggestions = if suggestions.is_empty() {
                vec!["labels end with ':' and comments start with '#'".to_string()]
            } else {
                suggestions
            };
            Diagnostic::at(
                Severity::Error,
                "E001",
                format!("unknown instruction '{}'", word),
                source,
                filename,
                *line,
                *col,
                word.chars().count(),
            )
            .with_suggestions(suggestions)
        }
        LexError::EmptyLabel { line, col } => Diagnostic::at(
            Severity::Error,
            "E002",
            "label has no name".to_string(),
            source,
            filename,
            *line,
            *col,
            1,
        ),
    }
}

fn format_parse_error(error: &ParseError, source: &str, filename: &str) -> Diagnostic {
    match error {
        ParseError::MissingOperand { mnemonic, expected, line, col } => Diagnostic::at(
            Severity::Error,
            "E010",
            format!("{} expects {}", mnemonic, expected),
            source,
            filename,
            *line,
            *col,
            mnemonic.to_string().len(),
        ),
        ParseError::UnexpectedArgument { found, line, col } => Diagnostic::at(
            Severity::Error,
            "E011",
            format!("unexpected {}", found),
            source,
            filename,
            *line,
            *col,
            1,
        )
        .with_suggestions(vec!["each line holds at most one instruction".to_string()]),
        ParseError::EmptyIndirect { line, col } => Diagnostic::at(
            Severity::Error,
            "E012",
            "indirect register '[]' names no register".to_string(),
            source,
            filename,
            *line,
            *col,
            2,
        ),
    }
}

/// 1-based column of a jump's label. The label is the tail of its line.
fn operand_column(source: &str, line: usize, label: &str) -> usize {
    get_source_line(source, line)
        .and_then(|text| {
            let text = text.trim_end();
            text.strip_suffix(label).map(|head| head.chars().count() + 1)
        })
        .unwrap_or(1)
}

/// Warnings for a program that compiled: duplicate labels and jumps to
/// labels that are never defined.
pub fn check_program(compiled: &SourceProgram, source: &str, filename: &str) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let program = &compiled.program;

    for name in program.duplicate_labels() {
        let Some(index) = program.label_index(&name) else { continue };
        let line = compiled.lines[index];
        out.push(
            Diagnostic::at(
                Severity::Warning,
                "W001",
                format!("label '{}' is defined more than once", name),
                source,
                filename,
                line,
                1,
                name.chars().count() + 1,
            )
            .with_suggestions(vec!["jumps go to the last definition".to_string()]),
        );
    }

    let mut labels: Vec<String> = program.labels().keys().cloned().collect();
    labels.sort();
    for (index, name) in program.unresolved_jumps() {
        let line = compiled.lines[index];
        let col = operand_column(source, line, &name);
        let suggestions = suggest_similar(&name, &labels, 2)
            .into_iter()
            .map(|s| format!("did you mean '{}'?", s))
            .collect();
        out.push(
            Diagnostic::at(
                Severity::Warning,
                "W002",
                format!("jump to undefined label '{}'", name),
                source,
                filename,
                line,
                col,
                name.chars().count(),
            )
            .with_suggestions(suggestions),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_source_line() {
        let source = "line 1\nline 2\nline 3\n";
        assert_eq!(get_source_line(source, 1), Some("line 1".to_string()));
        assert_eq!(get_source_line(source, 3), Some("line 3".to_string()));
        assert_eq!(get_source_line(source, 4), None);
    }

    #[test]
    fn test_make_underline() {
        assert_eq!(make_underline(1, 3), "^^^");
        assert_eq!(make_underline(5, 2), "    ^^");
        assert_eq!(make_underline(3, 0), "  ^");
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("a", ""), 1);
        assert_eq!(edit_distance("COPYTO", "COPYTO"), 0);
        assert_eq!(edit_distance("BUMPUPP", "BUMPUP"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_unknown_mnemonic_suggests_close_match() {
        let source = "INBOX\nCOPYTOO 3\n";
        let err = crate::compile(source).unwrap_err();
        let diag = format_compile_error(&err, source, "prog.hrm");
        assert_eq!(diag.code.as_deref(), Some("E001"));
        assert_eq!(diag.line, Some(2));
        assert_eq!(diag.underline.as_deref(), Some("^^^^^^^"));
        assert!(diag.suggestions.contains(&"did you mean 'COPYTO'?".to_string()));
    }

    #[test]
    fn test_render_plain() {
        let source = "INBOX\nCOPYTO\n";
        let err = crate::compile(source).unwrap_err();
        let output = format_compile_error(&err, source, "prog.hrm").render_plain();
        assert!(output.starts_with("error[E010]: COPYTO expects a register"));
        assert!(output.contains("prog.hrm:2:1"));
        assert!(output.contains("  2 | COPYTO"));
    }

    #[test]
    fn test_render_ansi() {
        let source = "COPYFROM []";
        let err = crate::compile(source).unwrap_err();
        let output = format_compile_error(&err, source, "prog.hrm").render_ansi();
        assert!(output.contains("\x1b["));
        assert!(output.contains("E012"));
    }

    #[test]
    fn test_check_program_warnings() {
        let source = "loop:\nINBOX\nloop:\nJUMPZ lop\nJUMP loop\n";
        let compiled = crate::compile_source(source).unwrap();
        let warnings = check_program(&compiled, source, "prog.hrm");
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.severity == Severity::Warning));
        assert_eq!(warnings[0].line, Some(3));
        assert_eq!(warnings[1].line, Some(4));
        assert!(warnings[1].suggestions.contains(&"did you mean 'loop'?".to_string()));
    }

    #[test]
    fn test_unresolved_jump_points_at_label() {
        let source = "loop:\nINBOX\n  JUMPZ Lopp top\n";
        let compiled = crate::compile_source(source).unwrap();
        let warnings = check_program(&compiled, source, "prog.hrm");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code.as_deref(), Some("W002"));
        assert_eq!(warnings[0].col, Some(9));
        assert_eq!(warnings[0].underline.as_deref(), Some("        ^^^^^^^^"));
    }

    #[test]
    fn test_label_suggestions_are_ordered() {
        let source = "ab:\nba:\naa:\nzz:\nJUMP bb\n";
        let compiled = crate::compile_source(source).unwrap();
        let warnings = check_program(&compiled, source, "prog.hrm");
        assert_eq!(
            warnings[0].suggestions,
            vec![
                "did you mean 'ab'?".to_string(),
                "did you mean 'ba'?".to_string(),
                "did you mean 'aa'?".to_string(),
            ]
        );
    }

    #[test]
    fn test_check_program_clean() {
        let source = "BEGIN:\nINBOX\nOUTBOX\nJUMP BEGIN\n";
        let compiled = crate::compile_source(source).unwrap();
        assert!(check_program(&compiled, source, "prog.hrm").is_empty());
    }
}
