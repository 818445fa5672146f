//! SpecForge CLI - distribute code-generation specs across an agent pool.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use specforge_agent_client::AgentClient;
use specforge_coordinator::{Coordinator, CoordinatorConfig};
use specforge_core::{Spec, SpecId, StackEffect};

mod report;

use report::RunReport;

/// SpecForge CLI - batch runner for remote code-generation agents
#[derive(Parser)]
#[command(name = "specforge")]
#[command(about = "Distribute code-generation specs across remote agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a batch of specifications
    Run {
        /// Path to a JSON file containing the spec batch
        #[arg(long, conflicts_with = "demo")]
        specs: Option<PathBuf>,

        /// Generate a demo batch of N square-function specs instead
        #[arg(long)]
        demo: Option<usize>,

        /// Agent base URLs (comma separated)
        #[arg(long, value_delimiter = ',')]
        agents: Vec<String>,

        /// Pool size when --agents is not given; agents are assumed at
        /// http://localhost:{base-port}..{base-port + N - 1}
        #[arg(long, default_value_t = 10, conflicts_with = "agents")]
        num_agents: usize,

        /// First localhost port when --agents is not given
        #[arg(long, default_value_t = 8080)]
        base_port: u16,

        /// Dequeue poll interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        poll_interval_ms: u64,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 30)]
        request_timeout_secs: u64,

        /// Write the machine-readable JSON report to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            specs,
            demo,
            agents,
            num_agents,
            base_port,
            poll_interval_ms,
            request_timeout_secs,
            output,
        } => {
            let batch = load_batch(specs, demo)?;
            let config = build_config(
                agents,
                num_agents,
                base_port,
                poll_interval_ms,
                request_timeout_secs,
            );
            run_batch(batch, config, output).await?;
        }
    }

    Ok(())
}

/// Load the spec batch from a file, or generate the demo batch.
fn load_batch(
    specs: Option<PathBuf>,
    demo: Option<usize>,
) -> Result<Vec<Spec>, Box<dyn std::error::Error>> {
    match (specs, demo) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(&path)?;
            let batch: Vec<Spec> = serde_json::from_str(&text)?;
            info!(specs = batch.len(), path = %path.display(), "Loaded spec batch");
            Ok(batch)
        }
        (None, Some(n)) => Ok(demo_batch(n)?),
        (None, None) => Err("one of --specs or --demo is required".into()),
    }
}

/// The demo batch: N square-function specs.
fn demo_batch(n: usize) -> Result<Vec<Spec>, Box<dyn std::error::Error>> {
    let effect: StackEffect = "( n -- n² )".parse()?;
    Ok((0..n)
        .map(|i| {
            Spec::new(format!("function_{i}"), effect.clone(), "DUP_TRANSFORM_001")
                .with_id(SpecId::new(format!("func_{i}")))
                .with_test_case(vec![5], vec![25])
                .with_test_case(vec![0], vec![0])
        })
        .collect())
}

fn build_config(
    agents: Vec<String>,
    num_agents: usize,
    base_port: u16,
    poll_interval_ms: u64,
    request_timeout_secs: u64,
) -> CoordinatorConfig {
    let agent_urls = if agents.is_empty() {
        (0..num_agents)
            .map(|i| format!("http://localhost:{}", base_port as usize + i))
            .collect()
    } else {
        agents
    };

    CoordinatorConfig {
        agent_urls,
        poll_interval: Duration::from_millis(poll_interval_ms),
        request_timeout: Duration::from_secs(request_timeout_secs),
    }
}

async fn run_batch(
    batch: Vec<Spec>,
    config: CoordinatorConfig,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let clients: Vec<AgentClient> = config
        .agent_urls
        .iter()
        .map(|url| AgentClient::new(url.clone(), config.request_timeout))
        .collect();

    let mut coordinator = Coordinator::new(config, clients);
    coordinator.initialize().await?;

    let started = Instant::now();
    let result = coordinator.run(batch).await;
    // Sessions are released whether or not the run completed.
    coordinator.close();
    let outcomes = result?;

    let run_report = RunReport::new(&outcomes, started.elapsed());
    run_report.print();

    if let Some(path) = output {
        std::fs::write(&path, serde_json::to_string_pretty(&run_report)?)?;
        println!();
        println!("Report written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_batch_shape() {
        let batch = demo_batch(3).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].id.as_str(), "func_0");
        assert_eq!(batch[0].word, "function_0");
        assert_eq!(batch[0].test_cases.len(), 2);
    }

    #[test]
    fn test_generated_agent_urls() {
        let config = build_config(Vec::new(), 3, 8080, 1000, 30);
        assert_eq!(
            config.agent_urls,
            vec![
                "http://localhost:8080",
                "http://localhost:8081",
                "http://localhost:8082",
            ]
        );
    }

    #[test]
    fn test_explicit_agent_urls_win() {
        let config = build_config(vec!["http://agent-a:9000".to_string()], 3, 8080, 500, 10);
        assert_eq!(config.agent_urls, vec!["http://agent-a:9000"]);
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
