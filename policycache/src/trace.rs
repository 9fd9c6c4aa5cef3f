use std::io::BufRead;
use lazy_static::lazy_static;
use regex::Regex;
use crate::cache::{Reference, ReferenceKind};
use crate::config::{CacheConfig, PolicyLine};

lazy_static! {
    static ref REFERENCE_LINE: Regex = Regex::new(r"^\s*(?P<kind>\d+)\s+(?P<address>\S+)\s*$").unwrap();
}

/// A trace with its two line configuration header
#[derive(Debug, Clone)]
pub struct Trace {
    pub config: CacheConfig,
    pub references: Vec<Reference>,
}

/// Reads a trace with a header: the policy line, the sizes line, then one reference per line
///
/// # Examples
///
/// ```
/// use policycache::config::Organization;
/// use policycache::trace::parse_trace;
/// let text = "16 - 1 - 2 - wb - wa\n1024 - 2048\n2 0\n0 1a0\n";
/// let trace = parse_trace(text.as_bytes()).unwrap();
/// assert_eq!(trace.config.organization, Organization::Split);
/// assert_eq!(trace.config.instruction_size, Some(1024));
/// assert_eq!(trace.references.len(), 2);
/// ```
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Trace, String> {
    let mut lines = reader.lines();
    let mut next_line = |what: &str| -> Result<String, String> {
        lines.next()
            .ok_or_else(|| format!("The trace ended before the {what} line"))?
            .map_err(|e| format!("Couldn't read the {what} line: {e}"))
    };
    let policy: PolicyLine = next_line("configuration")?.parse()?;
    let config = policy.with_sizes(&next_line("cache size")?)?;
    let references = collect_references(lines, 3)?;
    Ok(Trace { config, references })
}

/// Reads a trace without a header, for use with a separate configuration
pub fn parse_references<R: BufRead>(reader: R) -> Result<Vec<Reference>, String> {
    collect_references(reader.lines(), 1)
}

fn collect_references(lines: impl Iterator<Item = std::io::Result<String>>, first_line_number: usize) -> Result<Vec<Reference>, String> {
    let mut references = Vec::new();
    for (line_number, line) in (first_line_number..).zip(lines) {
        let line = line.map_err(|e| format!("Couldn't read trace line {line_number}: {e}"))?;
        if let Some(reference) = parse_reference(line_number, &line)? {
            references.push(reference);
        }
    }
    Ok(references)
}

/// Parses `<kind> <address>`. The address is kept as text, the cache decides if it is valid
fn parse_reference(line_number: usize, line: &str) -> Result<Option<Reference>, String> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let captures = REFERENCE_LINE.captures(line)
        .ok_or_else(|| format!("Trace line {line_number} isn't \"<kind> <address>\": \"{line}\""))?;
    let kind = captures["kind"].parse::<u8>()
        .map_err(|e| format!("Trace line {line_number} has an invalid kind: {e}"))
        .and_then(|k| ReferenceKind::try_from(k).map_err(|e| format!("Trace line {line_number}: {e}")))?;
    Ok(Some(Reference::new(kind, &captures["address"])))
}
