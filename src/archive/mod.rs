//! Unpacking of downloaded bundles.

mod zip;

pub use zip::ZipExtractor;
