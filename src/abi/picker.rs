use crate::github::ReleaseAsset;

use super::Abi;

/// Resolve the asset file name for the given environment ABIs.
///
/// The known ABIs are tested in their fixed priority order, so the order of
/// `supported` does not matter. Returns `None` when none of them is present.
pub fn resolve_asset_name<S: AsRef<str>>(supported: &[S]) -> Option<String> {
    Abi::ALL
        .into_iter()
        .find(|abi| supported.iter().any(|s| s.as_ref() == abi.as_str()))
        .map(|abi| abi.asset_name())
}

/// Find the asset with exactly the given name.
pub fn pick_asset<'a>(assets: &'a [ReleaseAsset], name: &str) -> Option<&'a ReleaseAsset> {
    assets.iter().find(|a| a.name == name)
}
