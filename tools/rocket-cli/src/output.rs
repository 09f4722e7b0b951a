//! Terminal and JSON output.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use rocket_cart::{CartOutcome, Notifier};

/// Kind of a human-readable status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Success,
    Warn,
    Error,
}

impl Level {
    fn marker(self) -> StyledObject<&'static str> {
        match self {
            Level::Info => style("ℹ").blue(),
            Level::Success => style("✓").green(),
            Level::Warn => style("⚠").yellow(),
            Level::Error => style("✗").red(),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Warn | Level::Error)
    }
}

/// Prints status lines, tables and JSON documents.
///
/// In JSON mode only documents and errors are printed. Clones share the
/// active spinner, which is hidden while a line is written.
#[derive(Debug, Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    spinner: Arc<Mutex<Option<ProgressBar>>>,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            spinner: Arc::new(Mutex::new(None)),
        }
    }

    fn emit(&self, level: Level, msg: &str) {
        if self.json {
            if level == Level::Error {
                eprintln!("{}", serde_json::json!({ "error": msg }));
            }
            return;
        }

        let line = match level {
            Level::Error => format!("{} {}", level.marker(), style(msg).red()),
            _ => format!("{} {}", level.marker(), msg),
        };
        let print = || {
            if level.to_stderr() {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        };

        let active = self
            .spinner
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .filter(|pb| !pb.is_finished());
        match active {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }

    pub fn info(&self, msg: &str) {
        self.emit(Level::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.emit(Level::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.emit(Level::Warn, msg);
    }

    /// Printed in JSON mode too, as `{"error": ...}` on stderr.
    pub fn error(&self, msg: &str) {
        self.emit(Level::Error, msg);
    }

    /// Only printed with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose && !self.json {
            eprintln!("{} {}", style("→").dim(), style(msg).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.json {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print `value` as pretty JSON, whatever the mode.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(doc) => println!("{}", doc),
            Err(e) => self.error(&format!("could not encode output: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// Print `cols` left-aligned to `widths`.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let cells: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(col, &width)| format!("{:<width$}", col))
            .collect();
        println!("  {}", cells.join("  ").trim_end());
    }

    /// Start a spinner; hidden in JSON mode.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        let pb = if self.json {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(template);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };
        pb.set_message(msg.to_string());
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(pb.clone());
        }
        pb
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Notifier printing cart notifications to the terminal.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    output: Output,
}

impl ConsoleNotifier {
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        self.output.success(message);
    }

    fn notify_error(&self, message: &str) {
        self.output.error(message);
    }
}

/// Colored label for an operation outcome.
pub fn outcome_badge(outcome: CartOutcome) -> String {
    if outcome.is_failure() {
        style(outcome.as_str()).red().to_string()
    } else if outcome.is_mutation() {
        style(outcome.as_str()).green().to_string()
    } else {
        style(outcome.as_str()).dim().to_string()
    }
}

/// Format a price in Brazilian reais, e.g. `R$ 1.179,90`.
pub fn format_price(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    let digits = (cents / 100).to_string();
    let mut whole = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            whole.push('.');
        }
        whole.push(c);
    }

    format!("{}R$ {},{:02}", sign, whole, cents % 100)
}
