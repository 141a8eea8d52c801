use serde::{Deserialize, Deserializer, Serialize};

/// Represents a GitHub release asset
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct ReleaseAsset {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub browser_download_url: String,
}

impl ReleaseAsset {
    pub fn download_url(&self) -> &str {
        &self.browser_download_url
    }
}

/// Represents a GitHub release
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct Release {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<ReleaseAsset>,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
