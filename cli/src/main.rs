use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use console::style;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tripmate_core::config::{self, Config};
use tripmate_core::interface::{PlanTripRequest, PublicError, TravelService};
use tripmate_core::{ChatMessage, TravelContext};

mod onboard;
mod render;
mod telemetry;

const FOLLOW_UP_HISTORY: usize = 5;

#[derive(Parser)]
#[command(name = "tripmate")]
#[command(about = "tripmate - plan trips and check visa rules from your terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Configure the model provider")]
    Onboard,
    #[command(about = "Plan a trip from a free-text goal")]
    Plan {
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,
        #[command(flatten)]
        trip: TripArgs,
        #[arg(long, help = "Print the full run result as JSON")]
        json: bool,
    },
    #[command(about = "Check visa and transit requirements")]
    Visa {
        #[command(flatten)]
        trip: TripArgs,
        #[arg(long)]
        json: bool,
        #[arg(long, help = "Exit after the first answer")]
        no_follow_up: bool,
    },
    #[command(about = "List the available travel tools")]
    Tools,
}

#[derive(Args, Debug, Default)]
struct TripArgs {
    #[arg(long, help = "Passport country")]
    passport: Option<String>,
    #[arg(long, help = "Departure country")]
    from: Option<String>,
    #[arg(long, help = "Destination country")]
    to: Option<String>,
    #[arg(long)]
    transit: Option<String>,
    #[arg(long, help = "Layover length in hours")]
    layover: Option<String>,
    #[arg(long)]
    leave_airport: bool,
    #[arg(long)]
    second_transit: Option<String>,
    #[arg(long)]
    second_layover: Option<String>,
    #[arg(long)]
    second_leave_airport: bool,
    #[arg(long, help = "budget, mid-range or luxury")]
    style: Option<String>,
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

impl TripArgs {
    fn into_context(self) -> TravelContext {
        let will_leave_airport = self.transit.as_ref().map(|_| yes_no(self.leave_airport));
        let second_will_leave_airport = self
            .second_transit
            .as_ref()
            .map(|_| yes_no(self.second_leave_airport));

        TravelContext {
            passport_from: self.passport,
            travel_from: self.from,
            travel_to: self.to,
            transit_country: self.transit,
            layover_duration: self.layover,
            will_leave_airport,
            second_transit_country: self.second_transit,
            second_layover_duration: self.second_layover,
            second_will_leave_airport,
            travel_style: self.style,
            ..Default::default()
        }
    }
}

fn request_token(timeout: Duration) -> (CancellationToken, tokio::task::JoinHandle<()>) {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let watcher = tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => warn!("Interrupted, cancelling request"),
            _ = tokio::time::sleep(timeout) => warn!("Request timed out after {:?}", timeout),
            _ = token.cancelled() => return,
        }
        token.cancel();
    });

    (cancel, watcher)
}

async fn plan(
    service: &TravelService,
    config: &Config,
    goal: String,
    travel: Option<TravelContext>,
    json: bool,
) -> Result<()> {
    let (cancel, watcher) = request_token(config.request_timeout());
    if !json {
        render::status("Planning your trip...");
    }

    let request = PlanTripRequest {
        goal_text: goal,
        travel_context: travel,
    };
    let result = service.plan_trip(request, cancel).await;
    watcher.abort();
    let result = result.map_err(PublicError::from)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render::run_result(&result);
    }
    Ok(())
}

fn describe_query(travel: &TravelContext) -> String {
    let mut query = format!(
        "Visa requirements for a {} passport holder traveling from {} to {}",
        travel.passport_from.as_deref().unwrap_or("?"),
        travel.travel_from.as_deref().unwrap_or("?"),
        travel.travel_to.as_deref().unwrap_or("?"),
    );
    if let Some(transit) = &travel.transit_country {
        query.push_str(&format!(" via {}", transit));
    }
    if let Some(second) = &travel.second_transit_country {
        query.push_str(&format!(" and {}", second));
    }
    query
}

async fn visa(
    service: &TravelService,
    config: &Config,
    travel: TravelContext,
    json: bool,
    follow_up: bool,
) -> Result<()> {
    let (cancel, watcher) = request_token(config.request_timeout());
    if !json {
        render::status("Checking visa requirements...");
    }
    let response = service.visa_info(travel.clone(), cancel).await;
    watcher.abort();
    let response = response.map_err(PublicError::from)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        render::markdown(&response.visa_info);
        render::suggestions(&response.suggestions);
    }

    if !follow_up || json {
        return Ok(());
    }

    let mut history = vec![
        ChatMessage::user(describe_query(&travel)),
        ChatMessage::assistant(response.visa_info),
    ];
    let conversation_id = response.conversation_id;
    let mut editor = DefaultEditor::new().context("Failed to start line editor")?;

    println!();
    println!(
        "{}",
        style("Ask a follow-up question (Ctrl+D to exit)").dim()
    );

    loop {
        let question = match editor.readline("> ") {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };
        if question.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(question.as_str());

        let start = history.len().saturating_sub(FOLLOW_UP_HISTORY);
        let request = TravelContext {
            follow_up_question: Some(question.clone()),
            conversation_id: Some(conversation_id.clone()),
            conversation_history: history[start..].to_vec(),
            ..travel.clone()
        };

        let (cancel, watcher) = request_token(config.request_timeout());
        render::status("Thinking...");
        let answer = service.visa_info(request, cancel).await;
        watcher.abort();

        match answer {
            Ok(answer) => {
                render::markdown(&answer.visa_info);
                render::suggestions(&answer.suggestions);
                history.push(ChatMessage::user(question));
                history.push(ChatMessage::assistant(answer.visa_info));
            }
            Err(e) => {
                eprintln!("{} {}", style("✗").red(), PublicError::from(e));
            }
        }
        println!();
    }

    println!("\n👋 Safe travels!");
    Ok(())
}

fn init() -> Result<(Config, TravelService)> {
    let config = Config::load_or_init()?;
    telemetry::init_telemetry(&config.log_level);

    let service = TravelService::from_config(&config).map_err(PublicError::from)?;
    Ok((config, service))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None if !config::config_exists() => Commands::Onboard,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard().context("Onboarding failed")?;
            config::save_config(&onboard_config)?;
        }
        Commands::Plan { goal, trip, json } => {
            let (config, service) = init()?;
            let travel = trip.into_context();
            let travel = (travel != TravelContext::default()).then_some(travel);
            plan(&service, &config, goal.join(" "), travel, json).await?;
        }
        Commands::Visa {
            trip,
            json,
            no_follow_up,
        } => {
            let (config, service) = init()?;
            visa(&service, &config, trip.into_context(), json, !no_follow_up).await?;
        }
        Commands::Tools => {
            let (_, service) = init()?;
            println!("{}", style("Available tools").bold());
            render::tool_specs(&service.agent().registry().specs());
        }
    }

    Ok(())
}
