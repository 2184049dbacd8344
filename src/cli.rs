//! CLI argument parsing for the brand research client.
//!
//! Each subcommand maps onto one transport operation, except `run`, which
//! performs the full health-gated, stage-by-stage research workflow.
use campaign_brief::config::ConfigOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "cbrief",
    version,
    about = "Campaign brief client for the brand research workflow service",
    after_help = "Examples:\n  cbrief health\n  cbrief run --brief brief.json\n  cbrief run --input research.json --json\n  cbrief node <EXECUTION_ID> node_b\n  cbrief results <EXECUTION_ID>",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Health(HealthArgs),
    Stages(StagesArgs),
    Start(StartArgs),
    Run(RunArgs),
    /// Execute the whole workflow of an existing execution in one call
    Execute(ExecutionArgs),
    Node(NodeArgs),
    /// Print the current state of an execution
    State(ExecutionArgs),
    /// Print the final results of an execution
    Results(ExecutionArgs),
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Health(args) => args.connection.verbose,
            Command::Stages(args) => args.connection.verbose,
            Command::Start(args) => args.connection.verbose,
            Command::Run(args) => args.connection.verbose,
            Command::Execute(args) | Command::State(args) | Command::Results(args) => {
                args.connection.verbose
            }
            Command::Node(args) => args.connection.verbose,
        }
    }
}

/// Where the service lives and how to reach it.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Workflow service base URL (overrides config and CBRIEF_BASE_URL)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Config file (default: <config dir>/cbrief/config.json when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log request and stage activity to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            base_url: self.base_url.clone(),
            ..ConfigOverrides::default()
        }
    }
}

/// Research request source: a campaign brief or a ready-made input body.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Campaign brief JSON; section 5 supplies the research links
    #[arg(long, value_name = "FILE")]
    pub brief: Option<PathBuf>,

    /// Brand research input JSON (brand_brief, lp_links, social_links)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Probe the workflow service health endpoint")]
pub struct HealthArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Parser, Debug)]
#[command(about = "List the research stages in execution order")]
pub struct StagesArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Start a research workflow and print the start response")]
pub struct StartArgs {
    #[command(flatten)]
    pub source: InputArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Start a research workflow and drive every stage to completion")]
pub struct RunArgs {
    #[command(flatten)]
    pub source: InputArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Emit the final results as JSON instead of a text summary
    #[arg(long)]
    pub json: bool,

    /// Pause between stages in milliseconds
    #[arg(long, value_name = "MS")]
    pub stage_delay_ms: Option<u64>,

    /// Pause before fetching final results in milliseconds
    #[arg(long, value_name = "MS")]
    pub settle_delay_ms: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct ExecutionArgs {
    /// Execution id returned by `start`
    #[arg(value_name = "EXECUTION_ID")]
    pub execution_id: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Execute one named stage of an existing execution")]
pub struct NodeArgs {
    /// Execution id returned by `start`
    #[arg(value_name = "EXECUTION_ID")]
    pub execution_id: String,

    /// Stage node name (see `cbrief stages`)
    #[arg(value_name = "NODE")]
    pub node: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}
