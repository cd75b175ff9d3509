//! fport - free port resolution CLI
//!
//! Command-line interface over the freeport resolver

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use freeport_core::{
    check_port, get_port_memoized, get_port_with_env, get_random_port, socket_address,
    wait_for_port, EnvDefaults, FileMemo, Hosts, PortOptions, SocketOptions, WaitOptions,
};

#[derive(Parser)]
#[command(name = "fport")]
#[command(version = "0.1.0")]
#[command(about = "Resolve a free TCP port", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an available port from the given hints
    Get {
        /// Preferred port, tried first (0 requests an ephemeral port)
        #[arg(long)]
        port: Option<u16>,
        /// Additional candidate ports, comma separated
        #[arg(long, value_delimiter = ',')]
        ports: Vec<u16>,
        /// Candidate range, e.g. "3000-3100" (upper bound excluded)
        #[arg(long)]
        port_range: Option<String>,
        /// Fallback range walked after the primary candidates
        #[arg(long)]
        alternative_port_range: Option<String>,
        /// Host to probe (default: every reachable local address)
        #[arg(long)]
        host: Option<String>,
        /// Go straight to an OS-assigned ephemeral port
        #[arg(long)]
        random: bool,
        /// Never fall back to an ephemeral port
        #[arg(long, conflicts_with = "random")]
        no_random: bool,
        /// Treat an invalid host as public-facing (wildcard fallback)
        #[arg(long)]
        public: bool,
        /// Emit diagnostics to stderr
        #[arg(long, short)]
        verbose: bool,
        /// Options YAML file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Memoize the result under this name (requires --memo-dir)
        #[arg(long)]
        name: Option<String>,
        /// Directory holding the .fports memo file
        #[arg(long)]
        memo_dir: Option<PathBuf>,
    },
    /// Check whether a port is available
    Check {
        port: u16,
        /// Host to probe (default: every reachable local address)
        #[arg(long)]
        host: Option<String>,
        #[arg(long, short)]
        verbose: bool,
    },
    /// Wait until a port becomes free
    Wait {
        port: u16,
        #[arg(long)]
        host: Option<String>,
        /// Delay between probes in milliseconds
        #[arg(long, default_value_t = 500)]
        delay: u64,
        /// Number of probes before giving up
        #[arg(long, default_value_t = 4)]
        retries: u32,
    },
    /// Resolve an OS-assigned ephemeral port
    Random {
        #[arg(long)]
        host: Option<String>,
    },
    /// Print the local socket address for a name
    SocketPath {
        name: String,
        /// Append the process id
        #[arg(long)]
        pid: bool,
        /// Append a random number
        #[arg(long)]
        random: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            port,
            ports,
            port_range,
            alternative_port_range,
            host,
            random,
            no_random,
            public,
            verbose,
            config,
            name,
            memo_dir,
        } => {
            let mut options = match config {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read config {}", path.display()))?;
                    serde_yaml::from_str::<PortOptions>(&content)
                        .with_context(|| format!("Invalid config {}", path.display()))?
                }
                None => PortOptions::default(),
            };

            // flags override config values
            options.port = port.or(options.port);
            if !ports.is_empty() {
                options.ports = ports;
            }
            if let Some(range) = port_range {
                options.port_range = Some(parse_range(&range)?);
            }
            if let Some(range) = alternative_port_range {
                options.alternative_port_range = Some(parse_range(&range)?);
            }
            options.host = host.or(options.host);
            options.name = name.or(options.name);
            if random {
                options.random = Some(true);
            } else if no_random {
                options.random = Some(false);
            }
            options.public = options.public || public;
            options.verbose = options.verbose || verbose;

            let resolved = match memo_dir {
                Some(dir) => {
                    let mut memo = FileMemo::new(&dir)?;
                    get_port_memoized(options, &mut memo).await?
                }
                None => get_port_with_env(options, EnvDefaults::capture()).await?,
            };
            println!("{}", resolved);
        }
        Commands::Check {
            port,
            host,
            verbose,
        } => {
            let hosts = match host {
                Some(host) => Hosts::from(host),
                None => Hosts::Local,
            };
            match check_port(port, hosts, verbose).await {
                Some(port) => println!("{}", port),
                None => {
                    eprintln!("Port {} is unavailable", port);
                    std::process::exit(1);
                }
            }
        }
        Commands::Wait {
            port,
            host,
            delay,
            retries,
        } => {
            wait_for_port(
                port,
                WaitOptions {
                    host,
                    delay_ms: delay,
                    retries,
                },
            )
            .await?;
            println!("{}", port);
        }
        Commands::Random { host } => {
            let port = get_random_port(host.as_deref()).await?;
            println!("{}", port);
        }
        Commands::SocketPath { name, pid, random } => {
            let path = socket_address(&SocketOptions { name, pid, random });
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn parse_range(input: &str) -> anyhow::Result<(u16, u16)> {
    let Some((from, to)) = input.split_once('-') else {
        bail!("Invalid range {:?}, expected \"from-to\"", input);
    };
    let from = from.trim().parse::<u16>().context("Invalid range start")?;
    let to = to.trim().parse::<u16>().context("Invalid range end")?;
    Ok((from, to))
}
