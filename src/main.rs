// src/main.rs

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use rpm_metadata::packages::{ExtractorConfig, FileBackend, MetadataExtractor};
use rpm_metadata::{Evr, PackageIdentity};
use std::cmp::Ordering;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Exit code when the first EVR is newer (rpmdev-vercmp convention)
const EXIT_FIRST_NEWER: u8 = 11;
/// Exit code when the second EVR is newer
const EXIT_SECOND_NEWER: u8 = 12;

#[derive(Parser)]
#[command(name = "rpm-metadata")]
#[command(author, version, about = "Extract RPM package identities and compare versions", long_about = None)]
struct Cli {
    /// Print identities as JSON
    #[arg(long, global = true)]
    json: bool,

    /// rpm executable used for database queries
    #[arg(long, global = true, env = "RPM_METADATA_RPM_BIN", default_value = "rpm")]
    rpm_bin: PathBuf,

    /// How package files are read: header (in-process) or rpm (rpm -qp)
    #[arg(long, global = true, env = "RPM_METADATA_BACKEND", default_value_t = FileBackend::Header)]
    backend: FileBackend,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the identity of an installed package
    Installed {
        /// Package name
        name: String,
        /// Filesystem root holding the RPM database
        #[arg(short, long, default_value = "/")]
        root: PathBuf,
    },
    /// Show the identity of package files
    File {
        /// Paths to .rpm files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Compare two EVRs: `A B` or `E1 V1 R1 E2 V2 R2`
    Vercmp {
        #[arg(required = true, num_args = 2..=6, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print package files ordered by name, then oldest to newest
    Sort {
        /// Paths to .rpm files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}

/// Build the two EVRs from `vercmp` arguments
fn parse_vercmp_args(args: &[String]) -> Result<(Evr, Evr)> {
    match args {
        [a, b] => Ok((Evr::parse(a)?, Evr::parse(b)?)),
        [e1, v1, r1, e2, v2, r2] => Ok((evr_from_parts(e1, v1, r1)?, evr_from_parts(e2, v2, r2)?)),
        _ => bail!(
            "vercmp takes two EVR strings or six arguments (epoch version release, twice), got {}",
            args.len()
        ),
    }
}

fn evr_from_parts(epoch: &str, version: &str, release: &str) -> Result<Evr> {
    let epoch = match epoch {
        "" | "(none)" => 0,
        raw => raw
            .parse::<u32>()
            .with_context(|| format!("epoch '{}' is not a number", raw))?,
    };
    Ok(Evr::new(epoch, version, release))
}

fn vercmp_exit_code(ordering: Ordering) -> u8 {
    match ordering {
        Ordering::Equal => 0,
        Ordering::Greater => EXIT_FIRST_NEWER,
        Ordering::Less => EXIT_SECOND_NEWER,
    }
}

fn print_identities(identities: &[PackageIdentity], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(identities)?);
    } else {
        for identity in identities {
            println!("{}", identity.nevr());
        }
    }
    Ok(())
}

fn query_files(extractor: &MetadataExtractor, paths: &[PathBuf]) -> Result<Vec<PackageIdentity>> {
    extractor
        .query_files(paths)
        .into_iter()
        .collect::<rpm_metadata::Result<Vec<_>>>()
        .map_err(Into::into)
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let extractor = MetadataExtractor::new(
        ExtractorConfig::default()
            .with_rpm_binary(&cli.rpm_bin)
            .with_file_backend(cli.backend),
    );

    match cli.command {
        Some(Commands::Installed { name, root }) => {
            info!("Looking up {} under {}", name, root.display());
            let identity = extractor.query_installed(&root, &name)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&identity)?);
            } else {
                println!("{}", identity.nevr());
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::File { paths }) => {
            info!("Reading {} package file(s)", paths.len());
            let identities = query_files(&extractor, &paths)?;
            print_identities(&identities, cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Vercmp { args }) => {
            let (a, b) = parse_vercmp_args(&args)?;
            let ordering = a.cmp(&b);
            let symbol = match ordering {
                Ordering::Less => "<",
                Ordering::Equal => "==",
                Ordering::Greater => ">",
            };
            println!("{} {} {}", a.as_normalized_form(), symbol, b.as_normalized_form());
            Ok(ExitCode::from(vercmp_exit_code(ordering)))
        }
        Some(Commands::Sort { paths }) => {
            let mut identities = query_files(&extractor, &paths)?;
            identities.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.evr().cmp(b.evr())));
            print_identities(&identities, cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "rpm-metadata", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            // No command provided, show help
            println!("rpm-metadata v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'rpm-metadata --help' for usage information");
            Ok(ExitCode::SUCCESS)
        }
    }
}
