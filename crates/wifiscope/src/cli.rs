//! Clap derive structures for the `wifiscope` CLI.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wifiscope -- who is on your MikroTik WiFi, and where
#[derive(Debug, Parser)]
#[command(
    name = "wifiscope",
    version,
    about = "Live view of the WiFi clients on a MikroTik RouterOS router",
    long_about = "Polls a RouterOS 7 router over its REST API (DHCP leases, WiFi\n\
        registrations, radios and interfaces), joins the tables into one\n\
        record per associated client, and serves the result over HTTP.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "WIFISCOPE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Router address or URL (overrides router.host)
    #[arg(long, env = "WIFISCOPE_HOST", global = true)]
    pub host: Option<String>,

    /// RouterOS user (overrides router.username)
    #[arg(long, short = 'u', env = "WIFISCOPE_USER", global = true)]
    pub user: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "WIFISCOPE_INSECURE", global = true)]
    pub insecure: bool,

    /// Per-request timeout in seconds (overrides router.timeout_secs)
    #[arg(long, env = "WIFISCOPE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Format ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one MAC address per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the router and serve the client view over HTTP
    Serve(ServeArgs),

    /// Poll once and print the current clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Inspect configuration and store credentials
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.listen)
    #[arg(long, short = 'l', env = "WIFISCOPE_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Directory served at `/` (overrides server.static_dir)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Give up on `/api/graph` requests after this many seconds when no
    /// snapshot exists yet (overrides server.snapshot_timeout_secs)
    #[arg(long)]
    pub snapshot_timeout: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ClientsArgs {
    /// Output format
    #[arg(long, short = 'o', env = "WIFISCOPE_OUTPUT", default_value = "table")]
    pub output: OutputFormat,

    /// Seconds to wait for the first snapshot
    #[arg(long, short = 'w', default_value = "30")]
    pub wait: u64,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (password masked)
    Show,

    /// Print the config file path
    Path,

    /// Store the router password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
