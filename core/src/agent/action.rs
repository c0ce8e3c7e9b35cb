use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolAction {
    CheckVisa,
    GenerateItinerary,
    EstimateBudget,
    TravelTips,
    GetWeather,
    Unrecognized(String),
}

impl ToolAction {
    pub const KNOWN: [ToolAction; 5] = [
        ToolAction::CheckVisa,
        ToolAction::GenerateItinerary,
        ToolAction::EstimateBudget,
        ToolAction::TravelTips,
        ToolAction::GetWeather,
    ];

    pub fn parse(name: &str) -> Self {
        match name {
            "check_visa" => Self::CheckVisa,
            "generate_itinerary" => Self::GenerateItinerary,
            "estimate_budget" => Self::EstimateBudget,
            "travel_tips" => Self::TravelTips,
            "get_weather" => Self::GetWeather,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::CheckVisa => "check_visa",
            Self::GenerateItinerary => "generate_itinerary",
            Self::EstimateBudget => "estimate_budget",
            Self::TravelTips => "travel_tips",
            Self::GetWeather => "get_weather",
            Self::Unrecognized(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for ToolAction {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<ToolAction> for String {
    fn from(action: ToolAction) -> Self {
        action.as_str().to_string()
    }
}

impl std::fmt::Display for ToolAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
