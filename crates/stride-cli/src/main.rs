mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    milestone::MilestoneSubcommand, post::PostSubcommand, report::ReportSubcommand,
    strategy::StrategySubcommand, task::TaskSubcommand, tenant::TenantSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stride",
    about = "Strategy performance scoring — tenants, strategies, tasks, monthly reports, and milestones",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .stride/)
    #[arg(long, global = true, env = "STRIDE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize stride in the current project
    Init {
        /// Project name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show project state
    State,

    /// Manage tenants
    Tenant {
        #[command(subcommand)]
        subcommand: TenantSubcommand,
    },

    /// Manage strategies
    Strategy {
        #[command(subcommand)]
        subcommand: StrategySubcommand,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Record and list content activity
    Post {
        #[command(subcommand)]
        subcommand: PostSubcommand,
    },

    /// Monthly performance reports
    Report {
        #[command(subcommand)]
        subcommand: ReportSubcommand,
    },

    /// Earned milestones
    Milestone {
        #[command(subcommand)]
        subcommand: MilestoneSubcommand,
    },

    /// Serve the REST API
    Ui {
        /// Port to listen on
        #[arg(long, default_value = "3141")]
        port: u16,
        /// Open the browser after starting
        #[arg(long)]
        open: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let root = root::resolve_root(cli.root.as_deref());

    match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref(), cli.json),
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Tenant { subcommand } => cmd::tenant::run(&root, subcommand, cli.json),
        Commands::Strategy { subcommand } => cmd::strategy::run(&root, subcommand, cli.json),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Post { subcommand } => cmd::post::run(&root, subcommand, cli.json),
        Commands::Report { subcommand } => cmd::report::run(&root, subcommand, cli.json),
        Commands::Milestone { subcommand } => cmd::milestone::run(&root, subcommand, cli.json),
        Commands::Ui { port, open } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(stride_server::serve(root, port, open))
        }
    }
}
