use crate::agent::{StepInput, ToolAction, ToolContext, TravelContext};
use crate::error::Result;
use crate::tools::{ask_model, complete};
use crate::traits::{ChatMessage, Provider, Role, Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const VISA_TEMPERATURE: f64 = 0.7;
const VISA_MAX_TOKENS: u32 = 2000;
const DEFAULT_HISTORY_WINDOW: usize = 5;
const NO_VISA_INFO: &str = "No visa information available";

const VISA_SYSTEM_PROMPT: &str = r#"You are an expert international travel assistant specializing in visa requirements and travel regulations. You provide accurate, helpful, and comprehensive information about visa requirements, transit rules, and travel advice.

Your responses should be:
- Clear and well-structured
- Include official links when available
- Provide practical advice
- Be conversational and helpful
- Include relevant follow-up suggestions
- Include useful travel resources and links

IMPORTANT: Always include practical links for:
- Official visa application websites
- Embassy/consulate websites
- Flight booking and price comparison websites
- Airport information and services
- Travel insurance options
- Currency exchange and banking
- Local transportation options

Useful travel websites to reference:
- Flight booking: Google Flights, Skyscanner, Kayak, Expedia, Booking.com
- Visa information: Official embassy websites, VisaHQ, iVisa
- Airport services: Official airport websites
- Travel insurance: World Nomads, Allianz Travel, Travel Guard
- Currency: XE.com, OANDA, local bank websites

Format your responses with clear sections and bullet points for easy reading."#;

const RESOURCES_SECTION: &str = r#"

IMPORTANT: Also include practical travel resources:
- Flight booking websites and price comparison tools
- Airport information and services
- Travel insurance options
- Currency exchange information
- Local transportation options
- Accommodation options if needed

Please provide specific, clickable links to useful websites and services.

IMPORTANT: At the end of your response, add a section titled "Suggested follow-up questions:" followed by 3-4 specific questions that the traveler might want to ask. Format each question on a new line starting with "- " (dash and space)."#;

pub struct CheckVisaTool {
    provider: Arc<dyn Provider>,
    history_window: usize,
}

impl CheckVisaTool {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    async fn answer_follow_up(
        &self,
        travel: &TravelContext,
        question: &str,
        ctx: &ToolContext<'_>,
    ) -> Result<Option<String>> {
        let history = &travel.conversation_history;
        let start = history.len().saturating_sub(self.history_window);

        let mut messages: Vec<ChatMessage> = history[start..]
            .iter()
            .filter(|m| matches!(m.role, Role::User | Role::Assistant))
            .cloned()
            .collect();
        messages.push(ChatMessage::user(question));

        complete(
            self.provider.as_ref(),
            ctx,
            &messages,
            VISA_TEMPERATURE,
            VISA_MAX_TOKENS,
        )
        .await
    }
}

fn known(field: &Option<String>) -> &str {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("an unspecified country")
}

fn hours(field: &Option<String>) -> &str {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("an unspecified number of")
}

fn airport_status(will_leave: &Option<String>) -> &'static str {
    match will_leave.as_deref().map(str::trim) {
        Some(answer) if answer.eq_ignore_ascii_case("yes") => "plans to leave the airport",
        _ => "will stay in the airport transit area",
    }
}

pub fn build_visa_prompt(travel: &TravelContext) -> String {
    let passport = known(&travel.passport_from);
    let origin = known(&travel.travel_from);
    let destination = known(&travel.travel_to);
    let transit = known(&travel.transit_country);
    let layover = hours(&travel.layover_duration);
    let status = airport_status(&travel.will_leave_airport);

    let mut prompt = if travel.has_second_layover() {
        let second_transit = known(&travel.second_transit_country);
        let second_layover = hours(&travel.second_layover_duration);
        let second_status = airport_status(&travel.second_will_leave_airport);

        format!(
            "A traveler with a {passport} passport is traveling from {origin} to {destination} with TWO layovers:

FIRST LAYOVER: {layover} hours in {transit} - The traveler {status}.
SECOND LAYOVER: {second_layover} hours in {second_transit} - The traveler {second_status}.

Please provide comprehensive information about BOTH layovers including:
1. Whether a transit visa is required for EACH country
2. Official application links if a visa is needed for each transit country
3. Official documentation sources for verification
4. Additional visa requirements and considerations for both countries
5. Alternative options if no visa is required for either country
6. Any special conditions or restrictions for each transit country
7. Recommended actions and next steps

IMPORTANT: You MUST provide separate, detailed visa information for BOTH {transit} and {second_transit}."
        )
    } else {
        format!(
            "A traveler with a {passport} passport is traveling from {origin} to {destination} with a {layover}-hour layover in {transit}. The traveler {status}.

Please provide comprehensive information about:
1. Whether a transit visa is required
2. Official application links if a visa is needed
3. Official documentation sources for verification
4. Additional visa requirements and considerations
5. Alternative options if no visa is required
6. Any special conditions or restrictions
7. Recommended actions and next steps"
        )
    };

    prompt.push_str(RESOURCES_SECTION);
    prompt
}

#[async_trait]
impl Tool for CheckVisaTool {
    fn action(&self) -> ToolAction {
        ToolAction::CheckVisa
    }

    fn description(&self) -> &str {
        "Check visa and transit requirements for a given itinerary."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "passportFrom": { "type": "string" },
                "travelFrom": { "type": "string" },
                "travelTo": { "type": "string" },
                "transitCountry": { "type": "string" },
                "layoverDuration": { "type": "string" },
                "willLeaveAirport": { "type": "string", "enum": ["yes", "no"] },
                "secondTransitCountry": { "type": "string" },
                "secondLayoverDuration": { "type": "string" },
                "secondWillLeaveAirport": { "type": "string", "enum": ["yes", "no"] },
                "followUpQuestion": { "type": "string" }
            },
            "required": ["passportFrom", "travelFrom", "travelTo"]
        })
    }

    async fn execute(&self, input: &StepInput, ctx: &ToolContext<'_>) -> Result<ToolResult> {
        let travel = ctx.travel.overlay(input);

        let reply = match travel.follow_up() {
            Some(question) => self.answer_follow_up(&travel, question, ctx).await?,
            None => {
                ask_model(
                    self.provider.as_ref(),
                    ctx,
                    VISA_SYSTEM_PROMPT,
                    &build_visa_prompt(&travel),
                    VISA_TEMPERATURE,
                    VISA_MAX_TOKENS,
                )
                .await?
            }
        };

        Ok(ToolResult::summary(
            reply.unwrap_or_else(|| NO_VISA_INFO.to_string()),
        ))
    }
}
