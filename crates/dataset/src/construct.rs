use crate::Compression;
use crate::error::ErrorKind;
use std::path::Path;

const BZIP2_MAGIC: [u8; 3] = [0x42, 0x5A, 0x68];
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
const XZ_MAGIC: [u8; 6] = [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const SEVEN_ZIP_MAGIC: [u8; 6] = [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];

impl Compression {
    /// Detect compression from a file extension.
    ///
    /// Unknown extensions (including `.json`) are treated as uncompressed.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext.to_lowercase().as_str() {
                "bz2" => Compression::Bzip2,
                "gz" => Compression::Gzip,
                #[cfg(feature = "xz")]
                "xz" => Compression::Xz,
                _ => Compression::None,
            })
            .unwrap_or(Compression::None)
    }

    /// Detect compression format from magic bytes.
    ///
    /// Returns `None` variant if no magic bytes match or if the input
    /// is too short to detect any format.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&BZIP2_MAGIC) {
            return Compression::Bzip2;
        }
        if bytes.starts_with(&GZIP_MAGIC) {
            return Compression::Gzip;
        }
        #[cfg(feature = "xz")]
        if bytes.starts_with(&XZ_MAGIC) {
            return Compression::Xz;
        }
        Compression::None
    }
}

/// Recognise content that can't be read as a dataset, either because the
/// container isn't supported at all or because its feature is disabled.
pub(crate) fn unreadable_format(bytes: &[u8]) -> Option<ErrorKind> {
    if bytes.starts_with(&ZIP_MAGIC) {
        return Some(ErrorKind::UnsupportedFormat("zip".to_string()));
    }
    if bytes.starts_with(&SEVEN_ZIP_MAGIC) {
        return Some(ErrorKind::UnsupportedFormat("7z".to_string()));
    }
    if cfg!(not(feature = "xz")) && bytes.starts_with(&XZ_MAGIC) {
        return Some(ErrorKind::DisabledFormat("xz".to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::unreadable_format;
    use crate::Compression;
    use crate::error::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("AllPrintings.json", Compression::None)]
    #[case("SetList", Compression::None)]
    // `.bz2` is a dotfile with no extension (like `.bashrc`), and therefore
    // with no extension is considered to have no compression.
    #[case(".bz2", Compression::None)]
    #[case("AllPrintings.json.bz2", Compression::Bzip2)]
    #[case("AllPrintings.json.BZ2", Compression::Bzip2)]
    #[case("AllPrintings.json.gz", Compression::Gzip)]
    #[case("AllPrintings.json.zip", Compression::None)]
    #[cfg_attr(feature = "xz", case("AllPrintings.json.xz", Compression::Xz))]
    fn test_from_path(#[case] test: &str, #[case] expected: Compression) {
        assert_eq!(Compression::from_path(test), expected);
    }

    #[rstest]
    #[case(b"{\"meta\":{}}", Compression::None)]
    #[case(b"", Compression::None)]
    #[case(&[0x42, 0x5A, 0x68, 0x39], Compression::Bzip2)]
    #[case(&[0x1F, 0x8B, 0x08, 0x00], Compression::Gzip)]
    #[cfg_attr(feature = "xz", case(&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, 0x00], Compression::Xz))]
    fn test_from_magic_bytes(#[case] bytes: &[u8], #[case] expected: Compression) {
        assert_eq!(Compression::from_magic_bytes(bytes), expected);
    }

    #[rstest]
    #[case(&[0x50, 0x4B, 0x03, 0x04, 0x14], Some(ErrorKind::UnsupportedFormat("zip".to_string())))]
    #[case(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, 0x00], Some(ErrorKind::UnsupportedFormat("7z".to_string())))]
    #[case(b"{\"data\":[]}", None)]
    #[case(&[0x1F, 0x8B, 0x08, 0x00], None)]
    fn test_unreadable_format(#[case] bytes: &[u8], #[case] expected: Option<ErrorKind>) {
        assert_eq!(unreadable_format(bytes), expected);
    }

    #[test]
    fn test_xz_magic_depends_on_feature() {
        let xz = [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, 0x00];
        if cfg!(feature = "xz") {
            assert_eq!(unreadable_format(&xz), None);
        } else {
            assert_eq!(unreadable_format(&xz), Some(ErrorKind::DisabledFormat("xz".to_string())));
        }
    }
}
