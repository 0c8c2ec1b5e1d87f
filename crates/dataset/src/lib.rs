//! Opening MTGJSON dataset files.
//!
//! MTGJSON publishes every file as plain `.json` and in several compressed
//! flavours (`AllPrintings.json.bz2`, `.gz`, `.xz`). This crate wraps those
//! behind a [`Compression`] enum and provides:
//!
//! - **Format detection** from file extensions ([`Compression::from_path`]) or
//!   magic bytes ([`Compression::from_magic_bytes`])
//! - **Streaming decompression** via wrapped readers ([`Compression::wrap_reader`])
//! - **Loading** a whole document ([`load`]), a sub-tree of it
//!   ([`load_pointer`]), or just a buffered reader for callers that only need
//!   part of the document ([`open`]).
//!
//! Bzip2 and Gzip are always available; XZ is behind the `xz` feature.
//! Zip and 7z archives are recognised and rejected.

mod construct;
pub mod error;
mod load;
mod ops;

pub use crate::load::{DatasetReader, load, load_pointer, open};

/// A supported compression format.
///
/// Variants gated behind feature flags are only available when the
/// corresponding feature is enabled. Defaults to [`None`](Self::None)
/// (uncompressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// Gzip compression (.gz)
    Gzip,
    /// XZ/LZMA compression (.xz)
    #[cfg(feature = "xz")]
    Xz,
}
