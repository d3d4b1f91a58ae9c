//! Command-line DNS lookup tool.
//!
//! # Usage
//!
//! ```bash
//! # A records through the configured server (1.1.1.1:53 by default)
//! dnsdig www.example.com
//!
//! # MX records from a specific server
//! dnsdig -s 9.9.9.9 -t MX example.com
//!
//! # Only the IPv4 addresses, one per line
//! dnsdig --short www.example.com
//!
//! # RFC 1035 box diagram of the full reply
//! dnsdig --diagram --no-color example.com
//! ```
//!
//! Settings come from `--config`, else `./dnsdig.toml`, else built-in
//! defaults; flags override the file.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use dnsdig::config::{CliOverrides, Config};
use dnsdig::dns::RecordType;
use dnsdig::logging::init_logging;
use dnsdig::render::{RenderOptions, render_diagram, render_summary};
use dnsdig::resolver::Resolver;

#[derive(Parser)]
#[command(name = "dnsdig")]
#[command(version)]
#[command(about = "Query one DNS server and print the decoded reply")]
struct Cli {
    /// Domain name to look up
    name: String,

    /// Server to query (ip or ip:port)
    #[arg(short = 's', long)]
    server: Option<String>,

    /// Query type (A, AAAA, MX, NS, TXT, TYPE<n>, ...)
    #[arg(short = 't', long = "type", default_value = "A")]
    qtype: RecordType,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Reply timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the RFC 1035 box diagram instead of the summary
    #[arg(long)]
    diagram: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Print only the IPv4 addresses of A records
    #[arg(long, conflicts_with_all = ["qtype", "diagram"])]
    short: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        server: cli.server.clone(),
        timeout_ms: cli.timeout_ms,
        log_level: cli.log_level.clone(),
        no_color: cli.no_color,
        diagram: cli.diagram,
    };
    let config = Config::load(cli.config.as_deref(), cli_overrides)?;
    config.validate()?;

    init_logging(&config.logging)?;

    let resolver = Resolver::from_config(&config.resolver)?;
    info!(
        server = %resolver.server(),
        timeout_ms = config.resolver.timeout_ms,
        "resolver ready"
    );

    if cli.short {
        let addrs = resolver
            .lookup_a(&cli.name)
            .with_context(|| format!("lookup of {} failed", cli.name))?;
        for addr in addrs {
            println!("{addr}");
        }
        return Ok(());
    }

    let message = resolver
        .lookup(&cli.name, cli.qtype)
        .with_context(|| format!("{} lookup of {} failed", cli.qtype, cli.name))?;

    let options = RenderOptions {
        color: config.output.color,
    };
    if config.output.diagram {
        print!("{}", render_diagram(&message, &options));
    } else {
        print!("{}", render_summary(&message, &options));
    }
    Ok(())
}
