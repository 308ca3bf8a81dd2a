use clap::Parser;
use httpd_bmx_agent::{
    shared::config::DEFAULT_CONFIG_PATH,
    AgentError,
    NewRelicSink,
    PollCycle,
    Reporter,
    Settings,
    StatsFetcher,
};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::{signal, task, time};

#[derive(Parser)]
#[command(name = "httpd-bmx-agent")]
#[command(about = "Polls an Apache mod_bmx status page and reports its stats")]
#[command(version)]
struct Cli {
    /// Path to the YAML settings file
    #[arg(short, long, env = "BMX_AGENT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AgentError> {
    info!("Loading settings from {}", cli.config.display());
    let settings = Settings::from_file(&cli.config)?;
    let agent = &settings.agent;

    let source = StatsFetcher::from_config(agent)?;
    let reporter = if agent.debug {
        info!("Debug mode: metrics are printed, not delivered");
        Reporter::console()
    } else {
        Reporter::Forward(NewRelicSink::from_settings(&settings)?)
    };

    let cycle = Arc::new(PollCycle::new(source, reporter, agent.testrun));
    let mut interval = time::interval(settings.newrelic.poll_interval());
    info!(
        "Polling {} every {} seconds",
        agent.label(),
        settings.newrelic.poll
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }

        let cycle = Arc::clone(&cycle);
        let outcome = match task::spawn_blocking(move || cycle.run_cycle()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Poll cycle aborted: {}", e);
                continue;
            }
        };

        if outcome.should_stop() {
            info!("Test run finished after one cycle");
            break;
        }
    }

    Ok(())
}
