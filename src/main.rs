use anyhow::{anyhow, Result};
use campaign_brief::brief::{load_brief, load_research_input};
use campaign_brief::config::{resolve_config, ClientConfig, ConfigOverrides};
use campaign_brief::report::{format_progress, format_stage_board, ResearchSummary};
use campaign_brief::transport::{
    BrandResearchInput, HttpTransport, WorkflowResponse, WorkflowTransport,
};
use campaign_brief::util::pretty_json;
use campaign_brief::workflow::{
    run_brand_research, start_research, ProgressObserver, Stage, WorkflowProgress,
    STAGE_SEQUENCE,
};
use campaign_brief::ResearchError;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{
    Command, ExecutionArgs, HealthArgs, InputArgs, NodeArgs, RootArgs, RunArgs, StagesArgs,
    StartArgs,
};

const LOG_ENV: &str = "CBRIEF_LOG";

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.command.verbose());

    match args.command {
        Command::Health(args) => cmd_health(&args),
        Command::Stages(args) => cmd_stages(&args),
        Command::Start(args) => cmd_start(&args),
        Command::Run(args) => cmd_run(&args),
        Command::Execute(args) => cmd_execute(&args),
        Command::Node(args) => cmd_node(&args),
        Command::State(args) => cmd_state(&args),
        Command::Results(args) => cmd_results(&args),
    }
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn connect(overrides: &ConfigOverrides) -> Result<(ClientConfig, HttpTransport)> {
    let config = resolve_config(overrides)?;
    let transport = HttpTransport::new(&config.base_url);
    Ok((config, transport))
}

fn cmd_health(args: &HealthArgs) -> Result<()> {
    let (config, transport) = connect(&args.connection.overrides())?;
    if !transport.health_check() {
        return Err(anyhow!(
            "brand research service unavailable at {}",
            config.base_url
        ));
    }
    println!("ok");
    Ok(())
}

fn cmd_stages(args: &StagesArgs) -> Result<()> {
    if args.json {
        let stages: Vec<_> = STAGE_SEQUENCE
            .iter()
            .map(|stage| {
                json!({
                    "id": stage.id(),
                    "title": stage.title(),
                    "description": stage.description(),
                    "operation": stage.operation(),
                })
            })
            .collect();
        println!("{}", pretty_json(&stages)?);
        return Ok(());
    }
    for (index, stage) in STAGE_SEQUENCE.iter().enumerate() {
        println!(
            "{}. {:<12} {:<24} {}",
            index + 1,
            stage.id(),
            stage.title(),
            stage.description()
        );
    }
    Ok(())
}

fn cmd_start(args: &StartArgs) -> Result<()> {
    let (config, transport) = connect(&args.connection.overrides())?;
    let input = load_input(&args.source)?;
    let (_, response) =
        start_research(&transport, &input).map_err(|err| research_error(err, &config))?;
    println!("{}", pretty_json(&response)?);
    Ok(())
}

fn cmd_run(args: &RunArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        stage_delay_ms: args.stage_delay_ms,
        settle_delay_ms: args.settle_delay_ms,
        ..args.connection.overrides()
    };
    let (config, transport) = connect(&overrides)?;
    let input = load_input(&args.source)?;

    let mut observer = CliObserver::default();
    let execution_id = run_brand_research(
        &transport,
        &input,
        config.driver_settings(),
        &mut observer,
    )
    .map_err(|err| research_error(err, &config))?;

    match observer.outcome {
        Some(Ok(results)) => {
            if args.json {
                println!("{}", pretty_json(&results)?);
            } else {
                print!("{}", ResearchSummary::from_response(&results).render());
            }
            Ok(())
        }
        Some(Err(err)) => Err(anyhow::Error::new(err)
            .context(format!("brand research run {execution_id} failed"))),
        None => Err(anyhow!(
            "brand research run {execution_id} ended without a result"
        )),
    }
}

fn cmd_execute(args: &ExecutionArgs) -> Result<()> {
    let (_, transport) = connect(&args.connection.overrides())?;
    print_response(&transport.execute_workflow(&args.execution_id)?)
}

fn cmd_node(args: &NodeArgs) -> Result<()> {
    let (_, transport) = connect(&args.connection.overrides())?;
    if Stage::from_id(&args.node).is_none() {
        tracing::warn!(node = %args.node, "node is not part of the research stage sequence");
    }
    let response = transport.execute_single_node(&args.execution_id, &args.node)?;
    print_response(&response)?;
    if !response.success {
        return Err(ResearchError::StageFailed {
            stage: args.node.clone(),
            message: response.message,
        }
        .into());
    }
    Ok(())
}

fn cmd_state(args: &ExecutionArgs) -> Result<()> {
    let (_, transport) = connect(&args.connection.overrides())?;
    print_response(&transport.get_workflow_state(&args.execution_id)?)
}

fn cmd_results(args: &ExecutionArgs) -> Result<()> {
    let (_, transport) = connect(&args.connection.overrides())?;
    print_response(&transport.get_workflow_results(&args.execution_id)?)
}

fn print_response(response: &WorkflowResponse) -> Result<()> {
    println!("{}", pretty_json(response)?);
    Ok(())
}

fn load_input(source: &InputArgs) -> Result<BrandResearchInput> {
    match (&source.brief, &source.input) {
        (Some(path), _) => load_brief(path)?.research_input(),
        (None, Some(path)) => load_research_input(path),
        (None, None) => Err(anyhow!("either --brief or --input is required")),
    }
}

fn research_error(err: ResearchError, config: &ClientConfig) -> anyhow::Error {
    match err {
        ResearchError::ServiceUnavailable => anyhow!(
            "brand research service unavailable at {}",
            config.base_url
        ),
        other => anyhow::Error::new(other),
    }
}

/// Streams progress to stderr and keeps the terminal outcome.
#[derive(Default)]
struct CliObserver {
    outcome: Option<Result<WorkflowResponse, ResearchError>>,
}

impl CliObserver {
    fn report(progress: &WorkflowProgress) {
        eprintln!("{}", format_progress(progress));
        eprintln!("{}", format_stage_board(&progress.current_node));
    }
}

impl ProgressObserver for CliObserver {
    fn on_started(&mut self, progress: &WorkflowProgress) {
        Self::report(progress);
    }

    fn on_progress(&mut self, progress: &WorkflowProgress) {
        Self::report(progress);
    }

    fn on_complete(&mut self, results: WorkflowResponse) {
        self.outcome = Some(Ok(results));
    }

    fn on_error(&mut self, error: ResearchError) {
        self.outcome = Some(Err(error));
    }
}
