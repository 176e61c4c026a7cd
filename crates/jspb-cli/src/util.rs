use std::fs;
use std::io::{self, Read};

use anyhow::Context;
use jspb_json::{Config, parse_response};
use jspb_value::Value;

/// Read input from file path or stdin.
/// - `None` or `Some("-")` reads from stdin
/// - `Some(path)` reads from file
pub fn read_input(file: Option<&str>) -> anyhow::Result<String> {
    match file {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Error reading from stdin")?;
            Ok(buffer)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("Error reading {path}")),
    }
}

/// Helper to get display path for error messages
pub fn display_path(file: Option<&str>) -> &str {
    match file {
        None | Some("-") => "<stdin>",
        Some(path) => path,
    }
}

/// Longest raw payload excerpt put into a log line.
const PAYLOAD_SNIPPET_CHARS: usize = 80;

/// Read and parse one response body into a value tree.
pub fn load_value(file: Option<&str>) -> anyhow::Result<Value> {
    let contents = read_input(file)?;
    parse_value(&contents, file)
}

/// Parse a response body read from `file`.
pub fn parse_value(contents: &str, file: Option<&str>) -> anyhow::Result<Value> {
    parse_response(contents, &Config::default())
        .with_context(|| format!("{} is not a JSPB payload", display_path(file)))
}

/// Start of a raw response body, for logging inputs that failed to decode.
pub fn payload_snippet(contents: &str) -> String {
    let contents = contents.trim();
    if contents.chars().count() <= PAYLOAD_SNIPPET_CHARS {
        return contents.to_string();
    }
    let mut out: String = contents.chars().take(PAYLOAD_SNIPPET_CHARS).collect();
    out.push('…');
    out
}
