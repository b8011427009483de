use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use connect_skill::{Config, Session, Skill, TurnContext, TurnRequest};

/// Connect - control streaming playback devices by voice
#[derive(Parser)]
#[command(name = "connect", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Streaming account access token
    #[arg(long, env = "CONNECT_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// User id the device cache is keyed by
    #[arg(short, long, env = "CONNECT_USER_ID", default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the account's devices, numbered as they would be spoken
    Devices,
    /// Run one intent and print the rendered response
    Intent {
        /// Intent name (e.g. "GetDevicesIntent", "AMAZON.HelpIntent")
        name: String,
        /// Slot value as KEY=VALUE, repeatable
        #[arg(short, long = "slot", value_parser = parse_slot)]
        slots: Vec<(String, String)>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,connect_skill=info",
        1 => "info,connect_skill=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;
    let skill = Skill::from_config(&config);

    let mut session = Session::new(cli.user.clone());
    if let Some(token) = cli.token {
        session = session.with_access_token(token);
    }

    match cli.command {
        Command::Devices => list_devices(&skill, &mut session).await,
        Command::Intent { name, slots } => {
            run_intent(&skill, &mut session, &config, name, slots).await
        }
    }
}

async fn list_devices(skill: &Skill, session: &mut Session) -> anyhow::Result<()> {
    if session.access_token().is_none() {
        anyhow::bail!("an access token is required, pass --token or set CONNECT_ACCESS_TOKEN");
    }

    let snapshot = skill.resolver().refresh(session).await?;

    if snapshot.is_empty() {
        println!("No devices found");
        return Ok(());
    }

    for device in &snapshot {
        println!("{:>3}. {} ({})", device.number, device.name, device.id);
    }

    Ok(())
}

async fn run_intent(
    skill: &Skill,
    session: &mut Session,
    config: &Config,
    name: String,
    slots: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let mut request = TurnRequest::intent(name);
    if let Some(id) = &config.skill.application_id {
        request = request.with_application_id(id.clone());
    }
    for (key, value) in slots {
        request = request.with_slot(key, value);
    }

    let response = skill.handle(&request, session).await;
    let rendered = response.render(session.attributes());

    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

fn parse_slot(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}
