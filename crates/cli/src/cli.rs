//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};

/// Earn allocator - rebalance capital across Euler Earn strategies
#[derive(Parser, Debug)]
#[command(name = "earn-allocator")]
#[command(about = "Allocation bot for Euler Earn vaults", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a candidate allocation and print it without touching the chain
    Preview(RunArgs),
    /// Execute a full allocation run
    Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Euler Earn vault address
    pub earn_vault: String,

    /// How the candidate allocation is computed
    #[arg(long, default_value = "equalization")]
    pub mode: ModeArg,

    /// Chain id the vault is deployed on
    #[arg(long, default_value = "1")]
    pub chain_id: u64,

    /// RPC URL for the target chain (can also use ETH_RPC_URL env var)
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: String,

    /// Private key for signing transactions (can also use PRIVATE_KEY env var)
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true, default_value = "")]
    pub private_key: String,

    /// Ethereum Vault Connector address
    #[arg(long, default_value = "0x0000000000000000000000000000000000000000")]
    pub evc: String,

    /// EVK vault lens address
    #[arg(long)]
    pub evk_vault_lens: String,

    /// Euler Earn lens address
    #[arg(long, default_value = "0x0000000000000000000000000000000000000000")]
    pub euler_earn_lens: String,

    /// Skip execution unless the largest per-vault change exceeds this
    /// amount (underlying asset units)
    #[arg(long, default_value = "0")]
    pub allocation_diff_tolerance: String,

    /// Minimum spread compression (APY percentage points) required to execute
    #[arg(long, default_value = "0")]
    pub apy_spread_tolerance: f64,

    /// Fraction of allocatable capital kept idle, in basis points
    #[arg(long, default_value = "0")]
    pub cash_percentage: u64,

    /// Submit the rebalance transaction; without this flag the run is a dry run
    #[arg(long)]
    pub broadcast: bool,

    /// The earn vault holds no idle-capital sink
    #[arg(long)]
    pub no_idle_vault: bool,

    /// Drain mode: vault to withdraw from
    #[arg(long)]
    pub drain_source_vault: Option<String>,

    /// Drain mode: vault to deposit into
    #[arg(long)]
    pub drain_target_vault: Option<String>,

    /// Drain mode: source allocations at or below this are left alone
    #[arg(long)]
    pub drain_threshold: Option<String>,

    /// Operator soft cap as vault=amount; may be repeated
    #[arg(long = "soft-cap")]
    pub soft_caps: Vec<String>,

    /// Use these strategies instead of the vault's withdrawal queue
    #[arg(long, value_delimiter = ',')]
    pub strategies: Option<Vec<String>>,

    /// Telegram bot token for run notifications
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat id for run notifications
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModeArg {
    Equalization,
    Drain,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
