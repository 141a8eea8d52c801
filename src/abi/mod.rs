//! CPU ABI detection and asset name resolution
//!
//! Bundles are published one per Android ABI (`arm64-v8a.zip`,
//! `armeabi-v7a.zip`, ...). This module decides which of them the current
//! execution environment can load.

mod picker;
mod platform;

pub use picker::{pick_asset, resolve_asset_name};
pub use platform::{Abi, AbiDetector, DefaultAbiDetector, StaticAbiDetector};

#[cfg(test)]
pub use platform::MockAbiDetector;
