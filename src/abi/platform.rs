use std::fmt;
use std::str::FromStr;

/// Android ABIs a bundle can be built for.
///
/// Declaration order is selection priority: the first one the environment
/// supports wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Abi {
    Arm64V8a,
    ArmeabiV7a,
    X86_64,
    X86,
}

impl Abi {
    pub const ALL: [Abi; 4] = [Abi::Arm64V8a, Abi::ArmeabiV7a, Abi::X86_64, Abi::X86];

    pub fn as_str(&self) -> &'static str {
        match self {
            Abi::Arm64V8a => "arm64-v8a",
            Abi::ArmeabiV7a => "armeabi-v7a",
            Abi::X86_64 => "x86_64",
            Abi::X86 => "x86",
        }
    }

    /// File name of the release asset built for this ABI.
    pub fn asset_name(&self) -> String {
        format!("{}.zip", self.as_str())
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Abi {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Abi::ALL
            .into_iter()
            .find(|abi| abi.as_str() == s)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown ABI: {}. Expected arm64-v8a, armeabi-v7a, x86_64, or x86.",
                    s
                )
            })
    }
}

/// Reports the ABIs the current device or process can execute, most preferred first.
#[cfg_attr(test, mockall::automock)]
pub trait AbiDetector: Send + Sync {
    fn supported_abis(&self) -> Vec<String>;
}

/// Detector based on the architecture this binary was compiled for.
///
/// 64-bit targets also report their 32-bit sibling, the way Android lists
/// `Build.SUPPORTED_ABIS`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAbiDetector;

impl AbiDetector for DefaultAbiDetector {
    fn supported_abis(&self) -> Vec<String> {
        compiled_abis().iter().map(|abi| abi.to_string()).collect()
    }
}

fn compiled_abis() -> &'static [&'static str] {
    #[cfg(target_arch = "aarch64")]
    {
        &["arm64-v8a", "armeabi-v7a"]
    }
    #[cfg(target_arch = "arm")]
    {
        &["armeabi-v7a"]
    }
    #[cfg(target_arch = "x86_64")]
    {
        &["x86_64", "x86"]
    }
    #[cfg(target_arch = "x86")]
    {
        &["x86"]
    }
    #[cfg(not(any(
        target_arch = "aarch64",
        target_arch = "arm",
        target_arch = "x86_64",
        target_arch = "x86"
    )))]
    {
        &[]
    }
}

/// Detector returning a fixed list, e.g. from `--abi` on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticAbiDetector {
    abis: Vec<String>,
}

impl StaticAbiDetector {
    pub fn new<I, S>(abis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            abis: abis.into_iter().map(Into::into).collect(),
        }
    }
}

impl AbiDetector for StaticAbiDetector {
    fn supported_abis(&self) -> Vec<String> {
        self.abis.clone()
    }
}
