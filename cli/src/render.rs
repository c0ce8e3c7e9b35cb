use console::style;
use termimad::MadSkin;
use tripmate_core::AgentRunResult;
use tripmate_core::traits::ToolSpec;

pub fn markdown(text: &str) {
    let skin = MadSkin::default();
    skin.print_text(text);
}

pub fn status(message: &str) {
    println!("\n{} {}\n", style("→").cyan(), style(message).dim());
}

pub fn suggestions(suggestions: &[String]) {
    if suggestions.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Suggested follow-up questions").cyan().bold());
    for (i, question) in suggestions.iter().enumerate() {
        println!("  {} {}", style(format!("{}.", i + 1)).dim(), question);
    }
}

pub fn run_result(result: &AgentRunResult) {
    println!("{}", style(format!("Plan: {}", result.plan.goal)).bold());
    for step in &result.steps {
        println!(
            "  {} {}",
            style(format!("{}.", step.id)).dim(),
            style(step.action.as_str()).cyan()
        );
    }
    println!();
    markdown(&result.final_text);
}

pub fn tool_specs(specs: &[ToolSpec]) {
    for spec in specs {
        let policy = if spec.recoverable {
            style("degrades on failure").yellow()
        } else {
            style("fails the run").dim()
        };
        println!(
            "  {} {} ({})",
            style(&spec.name).cyan().bold(),
            spec.description,
            policy
        );
    }
}
