use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
#[cfg(unix)]
use memmap2::Advice;
use memmap2::Mmap;
use crate::config::CacheConfig;

/// Maps a trace file into memory for sequential line reads
pub fn get_reader(file: File) -> Result<impl BufRead, String> {
    // Safety: the trace isn't expected to be modified while the simulation reads it
    let map = unsafe { Mmap::map(&file) }.map_err(|e| format!("Couldn't memory map the trace file: {e}"))?;
    // Traces are read once front to back
    #[cfg(unix)]
    map.advise(Advice::Sequential).map_err(|e| format!("Failed to give the OS access advice for the trace: {e}"))?;
    Ok(Cursor::new(map))
}

pub fn open_trace(path: impl AsRef<Path>) -> Result<impl BufRead, String> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| format!("Couldn't open the trace file at path {}: {e}", path.display()))?;
    get_reader(file)
}

/// Reads a JSON cache configuration
pub fn read_config(path: impl AsRef<Path>) -> Result<CacheConfig, String> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| format!("Couldn't open the config file at path {}: {e}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| format!("Couldn't parse the config file: {e}"))
}
