//! Decompression Operations

use crate::Compression;
use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Read;
#[cfg(feature = "xz")]
use xz2::read::XzDecoder;

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl Compression {
    /// Returns the short name (for displaying to user).
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Bzip2 => "bzip2",
            Compression::Gzip => "gzip",
            #[cfg(feature = "xz")]
            Compression::Xz => "xz",
        }
    }

    /// Wrap a reader with the appropriate decompression layer.
    ///
    /// Bzip2 and Gzip readers continue across concatenated streams, which is
    /// what parallel compressors (`pbzip2`, `pigz`) produce.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{Cursor, Read};
    /// use mtgetl_dataset::Compression;
    ///
    /// let mut reader = Compression::None.wrap_reader(Cursor::new(b"{}"));
    /// let mut contents = String::new();
    /// reader.read_to_string(&mut contents).unwrap();
    /// assert_eq!(contents, "{}");
    /// ```
    pub fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::None => Box::new(reader),
            Compression::Bzip2 => Box::new(MultiBzDecoder::new(reader)),
            Compression::Gzip => Box::new(MultiGzDecoder::new(reader)),
            #[cfg(feature = "xz")]
            Compression::Xz => Box::new(XzDecoder::new_multi_decoder(reader)),
        }
    }
}
