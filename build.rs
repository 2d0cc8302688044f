// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: package selection
fn packages_arg() -> Arg {
    Arg::new("packages")
        .num_args(0..)
        .value_name("NAME[@VERSION]")
        .help("Packages to act on (default: all declared)")
}

/// Common argument: dry run
fn dry_run_arg() -> Arg {
    Arg::new("dry_run")
        .long("dry-run")
        .action(ArgAction::SetTrue)
        .help("Print the planned choco invocations without running them")
}

fn action_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(packages_arg())
        .arg(dry_run_arg())
}

fn build_cli() -> Command {
    Command::new("choco-reconcile")
        .version(env!("CARGO_PKG_VERSION"))
        .author("choco-reconcile Contributors")
        .about("Desired-state package reconciliation for Chocolatey")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to the package declaration file"),
        )
        .arg(Arg::new("source").long("source").help("Repository to scope queries and installs to"))
        .arg(Arg::new("options").long("options").help("Extra options passed verbatim to choco"))
        .arg(Arg::new("timeout").long("timeout").value_name("SECS").help("Per-invocation timeout"))
        .arg(Arg::new("binary").long("binary").value_name("PATH").help("Path to choco.exe"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(action_command("install", "Install packages, one invocation per pinned version"))
        .subcommand(action_command("upgrade", "Upgrade packages, one invocation per pinned version"))
        .subcommand(action_command("remove", "Remove packages in a single invocation"))
        .subcommand(action_command("purge", "Remove packages (identical to remove)"))
        .subcommand(action_command("uninstall", "Deprecated: use remove"))
        .subcommand(Command::new("status").about("Show declared, installed and available versions"))
        .subcommand(
            Command::new("model")
                .about("Work with the declaration file as a whole")
                .subcommand(Command::new("diff").about("Show changes needed to reach the model"))
                .subcommand(Command::new("apply").about("Apply the model").arg(dry_run_arg()))
                .subcommand(
                    Command::new("check")
                        .about("Exit 2 if installed packages drifted from the model")
                        .arg(
                            Arg::new("details")
                                .short('d')
                                .long("details")
                                .action(ArgAction::SetTrue)
                                .help("Show details of differences"),
                        ),
                )
                .subcommand(
                    Command::new("snapshot")
                        .about("Create a declaration file from installed packages")
                        .arg(Arg::new("output").short('o').long("output").help("Output file path")),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = out_dir.join("choco-reconcile.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
