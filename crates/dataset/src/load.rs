use crate::Compression;
use crate::construct::unreadable_format;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::instrument;

// AllPrintings is several hundred megabytes once decompressed.
const BUFFER_SIZE: usize = 256 * 1024;

/// A buffered reader over the decompressed contents of a dataset file.
pub type DatasetReader = BufReader<Box<dyn Read>>;

/// Open a dataset file for streaming, decompressing it on the fly.
///
/// The format is taken from the file's first bytes. When those disagree with
/// the extension, the content wins and a warning is logged.
///
/// # Errors
/// - [`ErrorKind::NotFound`] if the file doesn't exist.
/// - [`ErrorKind::UnsupportedFormat`] for zip and 7z archives.
/// - [`ErrorKind::DisabledFormat`] for XZ content without the `xz` feature.
#[instrument(skip_all, fields(path = %path.as_ref().display(), format))]
pub fn open(path: impl AsRef<Path>) -> Result<DatasetReader> {
    let path = path.as_ref();
    let file = File::open(path).or_raise(|| match path.exists() {
        true => ErrorKind::Io,
        false => ErrorKind::NotFound(path.to_path_buf()),
    })?;
    let mut raw = BufReader::with_capacity(BUFFER_SIZE, file);
    let head = raw.fill_buf().or_raise(|| ErrorKind::Io)?;
    if let Some(kind) = unreadable_format(head) {
        exn::bail!(kind);
    }
    let detected = Compression::from_magic_bytes(head);
    let declared = Compression::from_path(path);
    if detected != declared {
        tracing::warn!(%declared, %detected, "File extension does not match contents");
    }
    tracing::Span::current().record("format", detected.as_str());
    let reader: Box<dyn Read> = detected.wrap_reader(raw);
    Ok(BufReader::with_capacity(BUFFER_SIZE, reader))
}

/// Load and parse a whole dataset file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<Value> {
    let reader = open(path)?;
    parse(reader)
}

/// Load a dataset file and return only the value at `pointer`
/// (RFC 6901, e.g. `/data/LEA/cards`).
///
/// # Errors
/// [`ErrorKind::PointerNotFound`] if nothing lives at `pointer`.
pub fn load_pointer(path: impl AsRef<Path>, pointer: &str) -> Result<Value> {
    let mut document = load(path)?;
    document
        .pointer_mut(pointer)
        .map(Value::take)
        .ok_or_raise(|| ErrorKind::PointerNotFound(pointer.to_string()))
}

fn parse(reader: impl Read) -> Result<Value> {
    match serde_json::from_reader(reader) {
        Ok(value) => Ok(value),
        // Decompression failures surface through serde_json as I/O errors.
        Err(err) if err.is_io() => Err(err).or_raise(|| ErrorKind::InvalidData),
        Err(err) => Err(err).or_raise(|| ErrorKind::InvalidJson),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bzip2::write::BzEncoder;
    use flate2::write::GzEncoder;
    use serde_json::json;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn document() -> Value {
        json!({
            "meta": {"date": "2024-01-15", "version": "5.2.1"},
            "data": {
                "LEA": {"name": "Limited Edition Alpha", "cards": [{"name": "Black Lotus"}]},
            },
        })
    }

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn bzip2(input: &[u8]) -> Vec<u8> {
        let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::fast());
        encoder.write_all(input).unwrap();
        encoder.finish().unwrap()
    }

    fn gzip(input: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(input).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_load_plain_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "AllPrintings.json", document().to_string().as_bytes());
        assert_eq!(load(&path).unwrap(), document());
    }

    #[test]
    fn test_load_bzip2() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "AllPrintings.json.bz2", &bzip2(document().to_string().as_bytes()));
        assert_eq!(load(&path).unwrap(), document());
    }

    #[test]
    fn test_load_gzip() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "AllPrintings.json.gz", &gzip(document().to_string().as_bytes()));
        assert_eq!(load(&path).unwrap(), document());
    }

    #[test]
    fn test_contents_win_over_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "AllPrintings.json", &gzip(document().to_string().as_bytes()));
        assert_eq!(load(&path).unwrap(), document());
        let path = write(&dir, "SetList.json.bz2", document().to_string().as_bytes());
        assert_eq!(load(&path).unwrap(), document());
    }

    #[test]
    fn test_open_streams_contents() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Meta.json.gz", &gzip(b"{\"meta\":{}}"));
        let mut contents = String::new();
        open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "{\"meta\":{}}");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("AllPrintings.json");
        let err = load(&path).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
    }

    #[test]
    fn test_zip_archive_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "AllPrintings.json.zip", &[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00]);
        let err = open(&path).err().unwrap();
        assert_eq!(*err, ErrorKind::UnsupportedFormat("zip".to_string()));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "AllPrintings.json", b"{\"meta\": ");
        let err = load(&path).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidJson);
    }

    #[test]
    fn test_corrupt_archive() {
        let dir = TempDir::new().unwrap();
        let mut compressed = gzip(document().to_string().as_bytes());
        compressed.truncate(compressed.len() / 2);
        let path = write(&dir, "AllPrintings.json.gz", &compressed);
        let err = load(&path).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_pointer() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "AllPrintings.json.bz2", &bzip2(document().to_string().as_bytes()));
        let cards = load_pointer(&path, "/data/LEA/cards").unwrap();
        assert_eq!(cards, json!([{"name": "Black Lotus"}]));
        assert_eq!(load_pointer(&path, "").unwrap(), document());
    }

    #[test]
    fn test_load_pointer_missing() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "AllPrintings.json", document().to_string().as_bytes());
        let err = load_pointer(&path, "/data/ARN").unwrap_err();
        assert_eq!(*err, ErrorKind::PointerNotFound("/data/ARN".to_string()));
    }
}
