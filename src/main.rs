use abifetch::abi::resolve_asset_name;
use abifetch::archive::ZipExtractor;
use abifetch::config::{Config, DEFAULT_REPO, FetchOptions, default_download_dir};
use abifetch::fetcher::DEFAULT_TAG_PREFIX;
use abifetch::github::GitHubRepo;
use abifetch::runtime::{RealRuntime, Runtime};
use anyhow::{Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// abifetch - download the native media library bundle for this device
///
/// Looks up the release tagged `<tag-prefix><VERSION>`, picks the asset built
/// for the first supported ABI (arm64-v8a, armeabi-v7a, x86_64, x86) and
/// streams it to disk.
///
/// Examples:
///   abifetch download 3.0.18              # Download into the user cache dir
///   abifetch --abi x86 download 3.0.18 -o x86.zip
#[derive(Parser, Debug)]
#[command(author, version = env!("ABIFETCH_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "ABIFETCH_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Repository publishing the bundles
    #[arg(
        long,
        env = "ABIFETCH_REPO",
        value_name = "OWNER/REPO",
        default_value = DEFAULT_REPO,
        global = true
    )]
    pub repo: GitHubRepo,

    /// Prefix of release tags in front of the version
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_TAG_PREFIX, global = true)]
    pub tag_prefix: String,

    /// Supported ABI, most preferred first (repeatable; overrides detection)
    #[arg(long = "abi", value_name = "ABI", global = true)]
    pub abis: Vec<String>,

    /// Do not upgrade a plain http API URL to https
    #[arg(long, global = true)]
    pub allow_insecure: bool,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List published releases and their assets
    List,

    /// Show the release published for a version
    Find(FindArgs),

    /// Show the detected ABIs and the asset that would be downloaded
    Abi,

    /// Download the bundle for a version
    Download(DownloadArgs),
}

#[derive(clap::Args, Debug)]
pub struct FindArgs {
    #[arg(value_name = "VERSION")]
    pub version: String,
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Destination file (defaults to <cache dir>/abifetch/<asset>)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Unpack the bundle into this directory after downloading
    #[arg(long, value_name = "DIR")]
    pub extract: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let options = FetchOptions {
        api_url: cli.api_url,
        repo: cli.repo,
        tag_prefix: cli.tag_prefix,
        abis: cli.abis,
        allow_insecure: cli.allow_insecure,
    };
    let fetcher = Config::new(RealRuntime, options)?.into_fetcher();

    match cli.command {
        Commands::List => {
            let releases = fetcher.list_releases().await?;
            if releases.is_empty() {
                println!("No releases published for {}", fetcher.repo());
            }
            for release in releases {
                let assets: Vec<&str> = release.assets.iter().map(|a| a.name.as_str()).collect();
                println!("{}\t{}", release.tag_name, assets.join(", "));
            }
        }
        Commands::Find(args) => match fetcher.find_release(&args.version).await? {
            Some(release) => {
                println!("{}", release.tag_name);
                for asset in &release.assets {
                    println!("  {}\t{}", asset.name, asset.download_url());
                }
            }
            None => bail!(
                "No release tagged '{}' in {}",
                fetcher.release_tag(&args.version),
                fetcher.repo()
            ),
        },
        Commands::Abi => {
            let abis = fetcher.supported_abis();
            println!("Supported ABIs: {}", abis.join(", "));
            match resolve_asset_name(&abis) {
                Some(name) => println!("Asset: {}", name),
                None => println!("Asset: unsupported"),
            }
        }
        Commands::Download(args) => {
            let output = match (args.output, fetcher.resolve_asset_name()) {
                (Some(output), _) => output,
                (None, Some(name)) => default_download_dir()?.join(name),
                (None, None) => default_download_dir()?.join("bundle.zip"),
            };
            if fetcher.resolve_asset_name().is_some()
                && let Some(parent) = output.parent()
                && !parent.as_os_str().is_empty()
                && !fetcher.runtime().exists(parent)
            {
                fetcher.runtime().create_dir_all(parent)?;
            }

            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(
                    "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                )?
                .progress_chars("#>-"),
            );
            let progress = bar.clone();
            let mut on_progress = move |done: u64, total: Option<u64>| {
                if let Some(total) = total {
                    progress.set_length(total);
                }
                progress.set_position(done);
            };

            let downloaded = fetcher
                .fetch(&args.version, &output, &mut on_progress)
                .await;
            bar.finish_and_clear();
            let downloaded = downloaded?;

            println!(
                "Downloaded {} ({}, {} bytes) to {}",
                downloaded.tag,
                downloaded.asset,
                downloaded.bytes,
                downloaded.path.display()
            );

            if let Some(dir) = args.extract {
                let files = ZipExtractor.extract(fetcher.runtime(), &downloaded.path, &dir)?;
                println!("Extracted {} files to {}", files.len(), dir.display());
            }
        }
    }
    Ok(())
}
