// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn paths_arg() -> Arg {
    Arg::new("paths")
        .required(true)
        .num_args(1..)
        .value_name("PATH")
        .help("Paths to .rpm files")
}

fn build_cli() -> Command {
    Command::new("rpm-metadata")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract RPM package identities and compare versions")
        .subcommand_required(false)
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print identities as JSON"),
        )
        .arg(
            Arg::new("rpm_bin")
                .long("rpm-bin")
                .global(true)
                .value_name("PATH")
                .default_value("rpm")
                .help("rpm executable used for database queries [env: RPM_METADATA_RPM_BIN]"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .global(true)
                .value_parser(["header", "rpm"])
                .default_value("header")
                .help("How package files are read [env: RPM_METADATA_BACKEND]"),
        )
        .subcommand(
            Command::new("installed")
                .about("Show the identity of an installed package")
                .arg(Arg::new("name").required(true).help("Package name"))
                .arg(
                    Arg::new("root")
                        .short('r')
                        .long("root")
                        .default_value("/")
                        .help("Filesystem root holding the RPM database"),
                ),
        )
        .subcommand(
            Command::new("file")
                .about("Show the identity of package files")
                .arg(paths_arg()),
        )
        .subcommand(
            Command::new("vercmp")
                .about("Compare two EVRs: `A B` or `E1 V1 R1 E2 V2 R2`")
                .after_help("Exit status: 0 if equal, 11 if the first is newer, 12 if the second is newer")
                .arg(
                    Arg::new("args")
                        .required(true)
                        .num_args(2..=6)
                        .allow_hyphen_values(true),
                ),
        )
        .subcommand(
            Command::new("sort")
                .about("Print package files ordered by name, then oldest to newest")
                .arg(paths_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("Failed to render man page");

    let man_path = man_dir.join("rpm-metadata.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
