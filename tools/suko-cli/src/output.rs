//! Output formatting for the CLI.
//!
//! Human output goes to the terminal with `console` styling; in JSON mode
//! only [`Output::json`] documents and errors are written.

use console::{style, StyledObject, Term};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    out: Term,
    err: Term,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    fn line(&self, term: &Term, line: String) {
        if self.json {
            return;
        }
        // Write errors are ignored
        let _ = term.write_line(&line);
    }

    fn marked(&self, term: &Term, mark: StyledObject<&str>, msg: &str) {
        self.line(term, format!("{} {}", mark, msg));
    }

    pub fn info(&self, msg: &str) {
        self.marked(&self.out, style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.marked(&self.out, style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        self.marked(&self.err, style("⚠").yellow(), msg);
    }

    /// Errors are written in JSON mode too, as `{"error": ...}`.
    pub fn error(&self, msg: &str) {
        if self.json {
            let _ = self
                .err
                .write_line(&serde_json::json!({ "error": msg }).to_string());
            return;
        }
        self.line(&self.err, format!("{} {}", style("✗").red(), style(msg).red()));
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.line(&self.err, format!("{} {}", style("→").dim(), style(msg).dim()));
        }
    }

    pub fn header(&self, title: &str) {
        self.line(&self.out, format!("\n{}", style(title).bold().underlined()));
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(document) => {
                let _ = self.out.write_line(&document);
            }
            Err(e) => self.error(&format!("Failed to encode output: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        self.line(&self.out, format!("  {}: {}", style(key).dim(), value));
    }

    pub fn list_item(&self, item: &str) {
        self.line(&self.out, format!("  {} {}", style("•").dim(), item));
    }

    /// Columns padded to `widths`, measured without ANSI styling.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        let padded: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| console::pad_str(col, *width, console::Alignment::Left, None).into_owned())
            .collect();
        self.line(&self.out, format!("  {}", padded.join("  ")));
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored stock badge for catalog listings.
pub fn stock_badge(in_stock: bool) -> String {
    if in_stock {
        style("in stock").green().to_string()
    } else {
        style("sold out").red().to_string()
    }
}
