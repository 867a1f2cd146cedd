//! corptrust CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use corptrust::inspect::{inspect, BundleStatus};
use corptrust::{ensure_certificate, policy, Outcome, DEFAULT_BUNDLE_PATH, DEFAULT_SUBJECT_FILTER};

/// Bootstraps the TLS-interception root certificate bundle consumed by
/// the container image build.
#[derive(Parser, Debug)]
#[command(name = "corptrust")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the interception root from the OS trust store, or write a
    /// placeholder to be replaced by hand
    Ensure {
        /// Destination bundle path
        #[arg(short, long, default_value = DEFAULT_BUNDLE_PATH)]
        output: PathBuf,
        /// Substring to match against certificate subjects
        #[arg(short, long, default_value = DEFAULT_SUBJECT_FILTER)]
        subject: String,
    },
    /// Report whether the bundle holds real certificates or the placeholder
    Inspect {
        /// Bundle path to examine
        #[arg(default_value = DEFAULT_BUNDLE_PATH)]
        path: PathBuf,
    },
    /// Print the TLS-bypass fallback environment the container uses when
    /// the bundle is absent or wrong
    Env,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Ensure { output, subject } => match ensure_certificate(&output, &subject) {
            Ok(Outcome::AlreadyPresent) => {
                println!("{}: already present, left untouched", output.display());
                ExitCode::SUCCESS
            }
            Ok(Outcome::Exported) => {
                println!(
                    "{}: exported certificate(s) matching {:?} from the system trust store",
                    output.display(),
                    subject
                );
                ExitCode::SUCCESS
            }
            Ok(Outcome::PlaceholderWritten) => {
                println!(
                    "{}: wrote placeholder, replace it with your network's root certificate \
                     before building the image",
                    output.display()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Inspect { path } => match inspect(&path) {
            Ok(BundleStatus::Missing) => {
                println!("{}: missing, run `corptrust ensure`", path.display());
                ExitCode::SUCCESS
            }
            Ok(BundleStatus::Placeholder) => {
                println!(
                    "{}: placeholder, replace it with your network's root certificate",
                    path.display()
                );
                ExitCode::SUCCESS
            }
            Ok(BundleStatus::Certificates(count)) => {
                println!("{}: {count} certificate(s)", path.display());
                ExitCode::SUCCESS
            }
            Ok(BundleStatus::Unrecognized) => {
                println!(
                    "{}: not a certificate bundle or placeholder",
                    path.display()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to read {}: {e}", path.display());
                ExitCode::FAILURE
            }
        },
        Command::Env => {
            print!("{}", policy::render_dotenv());
            ExitCode::SUCCESS
        }
    }
}
