//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Nexus configuration - Normalize repository manager configuration and apply it over REST
#[derive(Parser, Debug)]
#[command(name = "nexus-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Convert configuration into the REST API shape
    Normalize {
        #[command(subcommand)]
        target: NormalizeTarget,
    },

    /// Reconcile the user token settings
    ///
    /// Examples:
    ///   nexus-config tokens --state present --required-for-auth
    ///   nexus-config tokens --state absent --check
    Tokens {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Desired token state
        #[arg(long, value_enum, default_value = "present")]
        state: TokenStateArg,

        /// Require a token for repository authentication
        #[arg(long)]
        required_for_auth: bool,

        /// Expire tokens after --expiration-days
        #[arg(long)]
        expire_tokens: bool,

        /// Days before a token expires
        #[arg(long, default_value_t = 30)]
        expiration_days: u32,

        /// Report what would change without changing it
        #[arg(long)]
        check: bool,
    },

    /// Show node id, version, edition and system details
    NodeInfo {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Upload or delete a raw component
    Component {
        #[command(subcommand)]
        action: ComponentAction,
    },

    /// Download a Nexus distributable archive
    ///
    /// Examples:
    ///   nexus-config download --state latest --dest /opt/nexus
    ///   nexus-config download --version 3.78.0-14 --dest /opt/nexus
    ///   nexus-config download --url https://mirror/nexus-3.78.0-14-unix.tar.gz --dest /opt/nexus
    Download {
        /// Resolve the latest release or a specific version
        #[arg(long, value_enum, default_value = "present")]
        state: DownloadStateArg,

        /// Version to download, such as 3.78.0-14
        #[arg(long)]
        version: Option<String>,

        /// CPU architecture of the archive
        #[arg(long, default_value = "x86-64")]
        arch: String,

        /// Direct archive URL or base URL to probe
        #[arg(long)]
        url: Option<String>,

        /// Directory to store the archive in
        #[arg(long)]
        dest: PathBuf,

        /// Download timeout in seconds
        #[arg(long, default_value_t = 120)]
        timeout: u64,

        /// Disable certificate validation
        #[arg(long)]
        insecure: bool,

        /// Report what would change without changing it
        #[arg(long)]
        check: bool,
    },
}

/// Inputs accepted by `normalize`
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeTarget {
    /// Repository records of one type and format
    Repositories {
        /// Schema registry file (.toml, .json, .yaml)
        #[arg(long)]
        schema: PathBuf,

        /// Repository type (hosted, proxy, group)
        #[arg(long = "type")]
        repo_type: String,

        /// Repository format (maven, raw, docker, ...)
        #[arg(long = "format")]
        repo_format: String,

        /// Report every failing record instead of stopping at the first
        #[arg(long)]
        collect_errors: bool,

        /// File holding a list of repository records
        records: PathBuf,
    },

    /// Security realms from a list or from legacy flags
    Realms {
        /// File mapping legacy flag names to realm names
        #[arg(long)]
        mappings: PathBuf,

        /// File holding the realm list or flag mapping
        value: PathBuf,
    },

    /// Anonymous access from a boolean or a settings mapping
    AnonymousAccess { file: PathBuf },

    /// Local users
    Users { file: PathBuf },

    /// Content selectors
    Selectors { file: PathBuf },

    /// LDAP connections
    Ldap { file: PathBuf },

    /// Cleanup policies
    CleanupPolicies { file: PathBuf },
}

/// Raw component actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ComponentAction {
    /// Upload a file unless it already exists
    Upload {
        #[command(flatten)]
        target: ComponentArgs,

        /// Local file to upload
        #[arg(long)]
        src: PathBuf,
    },

    /// Delete a component if it exists
    Delete {
        #[command(flatten)]
        target: ComponentArgs,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ComponentArgs {
    /// Repository URL, such as https://nexus.example.com/repository/raw-hosted
    #[arg(long)]
    pub repository: String,

    /// Component file name
    #[arg(long)]
    pub name: String,

    /// Directory inside the repository
    #[arg(long, default_value = "/")]
    pub dest: String,

    #[command(flatten)]
    pub auth: AuthArgs,

    /// Report what would change without changing it
    #[arg(long)]
    pub check: bool,
}

/// Server address plus credentials
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// Base URL of the Nexus instance
    #[arg(long, env = "NEXUS_URL")]
    pub url: String,

    #[command(flatten)]
    pub auth: AuthArgs,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AuthArgs {
    #[arg(long, env = "NEXUS_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "NEXUS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Disable certificate validation
    #[arg(long)]
    pub insecure: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStateArg {
    Present,
    Enabled,
    Absent,
    Disabled,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStateArg {
    Latest,
    Present,
}
