use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select};
use tripmate_core::config::{Config, get_config_path};

const BANNER: &str = r"
    -------------------------------------

     _        _                         _
    | |_ _ __(_)_ __  _ __ ___   __ _| |_ ___
    | __| '__| | '_ \| '_ ` _ \ / _` | __/ _ \
    | |_| |  | | |_) | | | | | | (_| | ||  __/
     \__|_|  |_| .__/|_| |_| |_|\__,_|\__\___|
               |_|

    -------------------------------------
";

const PROVIDERS: [&str; 2] = ["openai", "ollama"];
const OPENAI_MODELS: [&str; 4] = ["gpt-4o-mini", "gpt-4o", "gpt-5-mini", "gpt-5"];

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_provider() -> Result<&'static str> {
    let selection = Select::new()
        .with_prompt("Select your model provider")
        .items(&PROVIDERS)
        .default(0)
        .interact()
        .context("Failed to select provider")?;

    Ok(PROVIDERS[selection])
}

fn setup_api_key() -> Result<String> {
    let api_key: String = Input::new()
        .with_prompt("Enter your OpenAI API key")
        .interact_text()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        return Err(anyhow::anyhow!("API key cannot be empty"));
    }

    Ok(api_key.trim().to_string())
}

fn setup_base_url() -> Result<String> {
    Input::new()
        .with_prompt("Ollama base URL")
        .default("http://localhost:11434".to_string())
        .interact_text()
        .context("Failed to read base URL")
}

fn setup_model(provider: &str) -> Result<String> {
    if provider == "ollama" {
        return Input::new()
            .with_prompt("Ollama model")
            .default("llama3.2".to_string())
            .interact_text()
            .context("Failed to read model");
    }

    let selection = Select::new()
        .with_prompt("Select your model")
        .items(&OPENAI_MODELS)
        .default(0)
        .interact()
        .context("Failed to select model")?;

    Ok(OPENAI_MODELS[selection].to_string())
}

pub fn run_onboard() -> Result<Config> {
    println!("{}", style(BANNER).cyan().bold());

    println!("  {}", style("Welcome to tripmate!").white().bold());
    println!(
        "  {}",
        style("This wizard connects tripmate to a language model.").dim()
    );
    println!();

    print_step(1, 3, "Provider");
    let provider = setup_provider()?;

    print_step(2, 3, "Credentials");
    let mut config = Config {
        provider: Some(provider.to_string()),
        ..Default::default()
    };
    if provider == "ollama" {
        config.base_url = Some(setup_base_url()?);
    } else {
        config.api_key = setup_api_key()?;
    }

    print_step(3, 3, "Model Selection");
    config.model = setup_model(provider)?;

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Config saved to {}",
        style("→").green(),
        style(get_config_path().display()).cyan()
    );
    println!();
    println!(
        "  {} You can now run: {}",
        style("→").green(),
        style("tripmate plan \"10 days in Japan in spring\"").cyan().bold()
    );
    println!();

    Ok(config)
}
