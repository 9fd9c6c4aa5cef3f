use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;

/// Fixtures shipped with the crate, relative to its manifest
pub const FIXTURES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

/// A trace and the result it is expected to produce
pub struct FixturePaths {
    pub name: String,
    pub trace: PathBuf,
    pub expected: PathBuf,
}

/// Finds every `<name>.trace` in a directory which has a matching `<name>.expected.json`,
/// sorted by name
pub fn get_fixtures(dir: impl AsRef<Path>) -> Result<Vec<FixturePaths>, Box<dyn Error>> {
    let dir = dir.as_ref();
    let trace_pattern = Regex::new(r"^(?P<name>[0-9a-zA-Z_]+)\.trace$")?;
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let file_name = entry?.file_name().into_string().map_err(|e| format!("Can't convert OS string ({e:?}) to standard string"))?;
        let Some(tokens) = trace_pattern.captures(&file_name) else {
            continue;
        };
        let name = tokens["name"].to_string();
        let expected = dir.join(format!("{name}.expected.json"));
        if !expected.exists() {
            continue;
        }
        out.push(FixturePaths {
            trace: dir.join(&file_name),
            expected,
            name,
        });
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}
