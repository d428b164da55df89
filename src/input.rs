use std::fs::File;
use std::io::Read;
use std::path::Path;

use codespan_reporting::files::SimpleFiles;

pub fn read_file(path: &Path) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    File::open(path)?.read_to_end(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Read a source file and register it for diagnostics.
pub fn add_file(
    files: &mut SimpleFiles<String, String>,
    path: &Path,
) -> anyhow::Result<(usize, String)> {
    let src = read_file(path)?;
    let file = files.add(path.display().to_string(), src.clone());
    Ok((file, src))
}
