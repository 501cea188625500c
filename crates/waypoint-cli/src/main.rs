// crates/waypoint-cli/src/main.rs
// ============================================================================
// Module: Waypoint CLI Entry Point
// Description: Command dispatcher for Waypoint pipeline components.
// Purpose: Serve individual components or a full local demo deployment.
// Dependencies: clap, tokio, waypoint-config, waypoint-enforce, component crates
// ============================================================================

//! ## Overview
//! The Waypoint CLI starts pipeline components from one validated TOML
//! configuration. Each protected component is wrapped in its enforcement
//! point before it starts listening, so there is no serving mode without
//! authorization. Security posture: configuration files are untrusted input
//! and are size-limited and validated before any component starts.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;
use waypoint_agent::AgentState;
use waypoint_agent::GatewayClient;
use waypoint_agent::WorkerAgent;
use waypoint_config::AgentConfig;
use waypoint_config::GatewayConfig;
use waypoint_config::WaypointConfig;
use waypoint_core::Domain;
use waypoint_core::Identity;
use waypoint_enforce::Enforcer;
use waypoint_enforce::HttpDecisionPoint;
use waypoint_enforce::JsonLineSink;
use waypoint_enforce::protect;
use waypoint_gateway::GatewayState;
use waypoint_gateway::HttpBackend;
use waypoint_gateway::InMemoryBackend;
use waypoint_gateway::SessionTable;
use waypoint_orchestrator::AgentRegistry;
use waypoint_orchestrator::HttpContextStore;
use waypoint_orchestrator::InMemoryContextStore;
use waypoint_orchestrator::Orchestrator;
use waypoint_orchestrator::OrchestratorState;
use waypoint_pdp::PdpState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Every travel domain a deployment may wire.
const DOMAINS: [Domain; 3] = [Domain::Flights, Domain::Lodging, Domain::Vehicles];

/// Delay between spawning demo components and running discovery.
const DEMO_STARTUP_DELAY: Duration = Duration::from_millis(250);

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "waypoint", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start one pipeline component.
    Serve {
        /// Selected component to serve.
        #[command(subcommand)]
        command: ServeCommand,
    },
    /// Start every configured component in one process with in-memory
    /// collaborators.
    Demo(ConfigArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Components that can be served individually.
#[derive(Subcommand, Debug)]
enum ServeCommand {
    /// Start the policy decision point.
    Pdp(ConfigArgs),
    /// Start the orchestrator entry point.
    Orchestrator(ConfigArgs),
    /// Start one domain worker agent.
    Agent(DomainArgs),
    /// Start one domain tool gateway.
    Gateway(DomainArgs),
}

/// Configuration utility subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a configuration file.
    Check(ConfigArgs),
}

/// Arguments shared by every component command.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Path to the deployment configuration file.
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
}

/// Arguments for per-domain components.
#[derive(Args, Debug)]
struct DomainArgs {
    /// Path to the deployment configuration file.
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
    /// Travel domain this component owns.
    #[arg(long, value_enum, value_name = "DOMAIN")]
    domain: DomainArg,
}

/// Travel domain selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum DomainArg {
    /// Flight search and booking.
    Flights,
    /// Hotel search and booking.
    Lodging,
    /// Rental vehicle search and booking.
    Vehicles,
}

impl DomainArg {
    /// Maps the CLI selector onto the core domain type.
    const fn into_domain(self) -> Domain {
        match self {
            Self::Flights => Domain::Flights,
            Self::Lodging => Domain::Lodging,
            Self::Vehicles => Domain::Vehicles,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve {
            command,
        } => match command {
            ServeCommand::Pdp(args) => serve_pdp(&load_config(&args)?).await,
            ServeCommand::Orchestrator(args) => serve_orchestrator(&load_config(&args)?).await,
            ServeCommand::Agent(args) => {
                let config = load_domain_config(&args)?;
                serve_agent(&config, args.domain.into_domain()).await
            }
            ServeCommand::Gateway(args) => {
                let config = load_domain_config(&args)?;
                serve_gateway(&config, args.domain.into_domain()).await
            }
        },
        Commands::Demo(args) => serve_demo(&load_config(&args)?).await,
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Check(args) => command_config_check(&args),
        },
    }
}

// ============================================================================
// SECTION: Configuration Loading
// ============================================================================

/// Loads and validates the configuration file named by the arguments.
fn load_config(args: &ConfigArgs) -> CliResult<WaypointConfig> {
    WaypointConfig::load(&args.config)
        .map_err(|err| CliError::new(format!("configuration rejected: {err}")))
}

/// Loads configuration for a per-domain command.
fn load_domain_config(args: &DomainArgs) -> CliResult<WaypointConfig> {
    WaypointConfig::load(&args.config)
        .map_err(|err| CliError::new(format!("configuration rejected: {err}")))
}

/// Executes the `config check` command.
fn command_config_check(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args)?;
    let wired_domains = DOMAINS.iter().filter(|domain| config.agent(**domain).is_some()).count();
    write_stderr_line(&format!(
        "configuration OK: {} registry entries, {wired_domains} wired domains",
        config.registry.len()
    ))
    .map_err(|err| CliError::new(format!("stderr write failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Component Wiring
// ============================================================================

/// Builds the enforcement point guarding one protected component.
fn enforcer_for(config: &WaypointConfig, target: Identity) -> CliResult<Arc<Enforcer>> {
    let decision_point =
        HttpDecisionPoint::new(config.pdp.endpoint.clone(), config.decide_timeout())
            .map_err(|err| CliError::new(format!("decision point client failed: {err}")))?;
    let audit = JsonLineSink::new(std::io::stderr());
    Ok(Arc::new(Enforcer::new(target, Arc::new(decision_point), Arc::new(audit))))
}

/// Serves the policy decision point.
async fn serve_pdp(config: &WaypointConfig) -> CliResult<ExitCode> {
    let state = Arc::new(PdpState::new(
        Identity::from(config.pdp.identity.as_str()),
        config.policy_registry(),
    ));
    serve("pdp", &config.pdp.listen, waypoint_pdp::router(state)).await
}

/// Serves the orchestrator entry point.
async fn serve_orchestrator(config: &WaypointConfig) -> CliResult<ExitCode> {
    let context_store = HttpContextStore::new(
        config.orchestrator.context_endpoint.clone(),
        Duration::from_millis(config.orchestrator.request_timeout_ms),
    )
    .map_err(|err| CliError::new(format!("context store client failed: {err}")))?;
    let orchestrator = build_orchestrator(config, Arc::new(context_store))?;
    orchestrator.discover().await;
    let state = Arc::new(OrchestratorState::new(orchestrator));
    let enforcer = enforcer_for(config, Identity::from(config.orchestrator.identity.as_str()))?;
    let app = protect(waypoint_orchestrator::router(state), enforcer);
    serve("orchestrator", &config.orchestrator.listen, app).await
}

/// Serves one domain worker agent behind its enforcement point.
async fn serve_agent(config: &WaypointConfig, domain: Domain) -> CliResult<ExitCode> {
    let agent_config = require_agent(config, domain)?;
    let app = agent_router(agent_config, domain)?;
    let enforcer = enforcer_for(config, Identity::from(agent_config.identity.as_str()))?;
    serve("agent", &agent_config.listen, protect(app, enforcer)).await
}

/// Serves one domain tool gateway behind its enforcement point.
async fn serve_gateway(config: &WaypointConfig, domain: Domain) -> CliResult<ExitCode> {
    let gateway_config = require_gateway(config, domain)?;
    let backend = HttpBackend::new(
        gateway_config.backend_endpoint.clone(),
        Duration::from_millis(gateway_config.request_timeout_ms),
    )
    .map_err(|err| CliError::new(format!("backend client failed: {err}")))?;
    let app = gateway_router(gateway_config, domain, Arc::new(backend));
    let enforcer = enforcer_for(config, Identity::from(gateway_config.identity.as_str()))?;
    serve("gateway", &gateway_config.listen, protect(app, enforcer)).await
}

/// Serves every configured component in one process.
///
/// Gateways run over in-memory backends and the orchestrator over an
/// in-memory context store, so the demo needs no external collaborators.
/// Every hop, the chat entry point included, still crosses the wire and
/// its enforcement point.
async fn serve_demo(config: &WaypointConfig) -> CliResult<ExitCode> {
    let pdp_state = Arc::new(PdpState::new(
        Identity::from(config.pdp.identity.as_str()),
        config.policy_registry(),
    ));
    spawn_component("pdp", &config.pdp.listen, waypoint_pdp::router(pdp_state)).await?;

    for domain in DOMAINS {
        let Some(agent_config) = config.agent(domain) else {
            continue;
        };
        let gateway_config = require_gateway(config, domain)?;
        let gateway_app = gateway_router(
            gateway_config,
            domain,
            Arc::new(InMemoryBackend::new(domain)),
        );
        let gateway_enforcer =
            enforcer_for(config, Identity::from(gateway_config.identity.as_str()))?;
        spawn_component("gateway", &gateway_config.listen, protect(gateway_app, gateway_enforcer))
            .await?;

        let agent_app = agent_router(agent_config, domain)?;
        let agent_enforcer = enforcer_for(config, Identity::from(agent_config.identity.as_str()))?;
        spawn_component("agent", &agent_config.listen, protect(agent_app, agent_enforcer)).await?;
    }

    tokio::time::sleep(DEMO_STARTUP_DELAY).await;
    let orchestrator = build_orchestrator(config, Arc::new(InMemoryContextStore::new()))?;
    orchestrator.discover().await;
    let state = Arc::new(OrchestratorState::new(orchestrator));
    let enforcer = enforcer_for(config, Identity::from(config.orchestrator.identity.as_str()))?;
    let app = protect(waypoint_orchestrator::router(state), enforcer);
    serve("orchestrator", &config.orchestrator.listen, app).await
}

/// Builds the orchestrator over a context store and the configured agents.
fn build_orchestrator(
    config: &WaypointConfig,
    context_store: Arc<dyn waypoint_orchestrator::ContextStore>,
) -> CliResult<Orchestrator> {
    let mut registry = AgentRegistry::new();
    for domain in DOMAINS {
        if let Some(agent) = config.agent(domain) {
            registry.register(
                domain,
                Identity::from(agent.identity.as_str()),
                agent.endpoint.clone(),
            );
        }
    }
    Orchestrator::new(
        Identity::from(config.orchestrator.identity.as_str()),
        context_store,
        registry,
        Duration::from_millis(config.orchestrator.request_timeout_ms),
    )
    .map_err(|err| CliError::new(format!("orchestrator build failed: {err}")))
}

/// Builds one worker agent router from its configuration section.
fn agent_router(agent_config: &AgentConfig, domain: Domain) -> CliResult<Router> {
    let client = GatewayClient::new(
        Identity::from(agent_config.identity.as_str()),
        agent_config.gateway_endpoint.clone(),
        Duration::from_millis(agent_config.request_timeout_ms),
    )
    .map_err(|err| CliError::new(format!("gateway client failed: {err}")))?;
    let agent = WorkerAgent::new(
        Identity::from(agent_config.identity.as_str()),
        domain,
        client,
        None,
    );
    Ok(waypoint_agent::router(Arc::new(AgentState::new(agent))))
}

/// Builds one tool gateway router over the given backend.
fn gateway_router(
    gateway_config: &GatewayConfig,
    domain: Domain,
    backend: Arc<dyn waypoint_gateway::Backend>,
) -> Router {
    let state = Arc::new(GatewayState::new(
        Identity::from(gateway_config.identity.as_str()),
        domain,
        SessionTable::new(Duration::from_secs(gateway_config.session_ttl_secs)),
        backend,
    ));
    waypoint_gateway::router(state)
}

/// Looks up the agent section for a domain.
fn require_agent(config: &WaypointConfig, domain: Domain) -> CliResult<&AgentConfig> {
    config
        .agent(domain)
        .ok_or_else(|| CliError::new(format!("no agent configured for {}", domain.as_str())))
}

/// Looks up the gateway section for a domain.
fn require_gateway(config: &WaypointConfig, domain: Domain) -> CliResult<&GatewayConfig> {
    config
        .gateway(domain)
        .ok_or_else(|| CliError::new(format!("no gateway configured for {}", domain.as_str())))
}

// ============================================================================
// SECTION: Serving
// ============================================================================

/// Binds the listen address and serves the router until shutdown.
async fn serve(component: &str, listen: &str, app: Router) -> CliResult<ExitCode> {
    let listener = bind(component, listen).await?;
    axum::serve(listener, app)
        .await
        .map_err(|err| CliError::new(format!("{component} serve failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Binds and serves a router on a background task.
async fn spawn_component(component: &str, listen: &str, app: Router) -> CliResult<()> {
    let listener = bind(component, listen).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(())
}

/// Binds one listen address and announces the component on stderr.
async fn bind(component: &str, listen: &str) -> CliResult<tokio::net::TcpListener> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|err| CliError::new(format!("{component} bind {listen} failed: {err}")))?;
    let addr = listener
        .local_addr()
        .map_err(|err| CliError::new(format!("{component} local addr failed: {err}")))?;
    let _ = write_stderr_line(&format!("waypoint {component} listening on {addr}"));
    Ok(listener)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
