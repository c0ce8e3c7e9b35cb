use crate::traits::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

pub type StepInput = Map<String, Value>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layover_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_leave_airport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_transit_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_layover_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_will_leave_airport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conversation_history: Vec<ChatMessage>,
}

impl TravelContext {
    pub fn to_input(&self) -> StepInput {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => StepInput::new(),
        }
    }

    /// Trip facts the context does not know are filled from the step input;
    /// known ones win. The follow-up question and history go the other way:
    /// a step input that carries them overrides the context.
    pub fn overlay(&self, input: &StepInput) -> TravelContext {
        let mut merged = self.clone();
        let fields: [(&mut Option<String>, &str); 11] = [
            (&mut merged.passport_from, "passportFrom"),
            (&mut merged.travel_from, "travelFrom"),
            (&mut merged.travel_to, "travelTo"),
            (&mut merged.transit_country, "transitCountry"),
            (&mut merged.layover_duration, "layoverDuration"),
            (&mut merged.will_leave_airport, "willLeaveAirport"),
            (&mut merged.second_transit_country, "secondTransitCountry"),
            (&mut merged.second_layover_duration, "secondLayoverDuration"),
            (&mut merged.second_will_leave_airport, "secondWillLeaveAirport"),
            (&mut merged.travel_style, "travelStyle"),
            (&mut merged.conversation_id, "conversationId"),
        ];

        for (slot, key) in fields {
            if slot.is_none()
                && let Some(value) = input.get(key).and_then(Value::as_str)
            {
                *slot = Some(value.to_string());
            }
        }

        if let Some(question) = input.get("followUpQuestion").and_then(Value::as_str) {
            merged.follow_up_question = Some(question.to_string());
        }

        if let Some(history) = input.get("conversationHistory")
            && let Ok(turns) = serde_json::from_value::<Vec<ChatMessage>>(history.clone())
        {
            merged.conversation_history = turns;
        }

        merged
    }

    pub fn has_second_layover(&self) -> bool {
        [
            &self.second_transit_country,
            &self.second_layover_duration,
            &self.second_will_leave_airport,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    pub fn follow_up(&self) -> Option<&str> {
        self.follow_up_question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub travel: &'a TravelContext,
    pub cancel: &'a CancellationToken,
}

impl<'a> ToolContext<'a> {
    pub fn new(travel: &'a TravelContext, cancel: &'a CancellationToken) -> Self {
        Self { travel, cancel }
    }
}
