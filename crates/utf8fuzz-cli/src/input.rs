use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing::info;

pub const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";

/// The bytes after a leading UTF-8 byte order mark, if there is one.
pub fn strip_utf8_bom(bytes: &[u8]) -> Option<&[u8]> {
    bytes.strip_prefix(UTF8_BOM)
}

/// Reads the whole file and strips a leading BOM, logging sizes as it goes.
pub fn load(path: &Path) -> Result<Vec<u8>> {
    info!("Input file: {}", path.display());
    let bytes =
        fs::read(path).with_context(|| format!("failed to read input file {}", path.display()))?;
    info!("({} bytes)", bytes.len());

    if let Some(body) = strip_utf8_bom(&bytes) {
        info!("BOM present - removing.");
        info!("({} bytes remain)", body.len());
        return Ok(body.to_vec());
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("utf8fuzz-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn strips_only_a_leading_bom() {
        assert_eq!(strip_utf8_bom(b"\xEF\xBB\xBFabc"), Some(&b"abc"[..]));
        assert_eq!(strip_utf8_bom(b"\xEF\xBB\xBF"), Some(&b""[..]));
        assert_eq!(strip_utf8_bom(b"a\xEF\xBB\xBF"), None);
        assert_eq!(strip_utf8_bom(b"\xEF\xBB"), None);
    }

    #[test]
    fn load_strips_bom() {
        let path = scratch_file("bom", b"\xEF\xBB\xBF\xC0\x80");
        let bytes = load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(bytes, b"\xC0\x80");
    }

    #[test]
    fn load_keeps_bomless_input() {
        let path = scratch_file("plain", b"\xEF\xBB");
        let bytes = load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(bytes, b"\xEF\xBB");
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = std::env::temp_dir().join("utf8fuzz-definitely-missing.bin");
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("utf8fuzz-definitely-missing.bin"));
    }
}
