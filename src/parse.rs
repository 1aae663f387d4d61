//! Parser for build files.
//!
//! The format is line-oriented, one rule per line:
//!
//! ```text
//! # comment
//! out.o: in.c in.h | cc -c in.c -o out.o
//! ```
//!
//! Lines that don't have the shape of a rule are skipped rather than
//! reported.  Parsed rules borrow from the input text, marked with the
//! lifetime `'text`.

#[derive(Debug, PartialEq)]
pub struct Rule<'text> {
    /// 1-based line number the rule was read from.
    pub line: usize,
    pub output: &'text str,
    pub inputs: Vec<&'text str>,
    pub command: &'text str,
}

/// Parse a single line, returning None if it does not hold a rule.
fn parse_line(line: &str) -> Option<(&str, Vec<&str>, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (output, rest) = line.split_once(':')?;
    let (inputs, command) = rest.split_once('|')?;
    let output = output.trim();
    let command = command.trim();
    if output.is_empty() || command.is_empty() {
        return None;
    }
    Some((output, inputs.split_whitespace().collect(), command))
}

/// Parse all rules from build file text, in file order.
pub fn parse(text: &str) -> Vec<Rule> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let (output, inputs, command) = parse_line(line)?;
            Some(Rule {
                line: i + 1,
                output,
                inputs,
                command,
            })
        })
        .collect()
}
