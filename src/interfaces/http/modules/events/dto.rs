use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventListQuery {
    /// Event type, e.g. `goal`, `yellow_card`, `substitution`
    pub event_type: Option<String>,
    pub season: Option<i32>,
    pub team_id: Option<String>,
    /// Player involved in any role
    pub player_id: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GoalQuery {
    pub season: Option<i32>,
    /// Scorer
    pub player_id: Option<String>,
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Yellow,
    Red,
}

impl CardType {
    /// The `match_event.type` value for this card
    pub fn event_type(self) -> &'static str {
        match self {
            CardType::Yellow => "yellow_card",
            CardType::Red => "red_card",
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CardQuery {
    /// `yellow` or `red`; both when absent
    pub card_type: Option<CardType>,
    pub season: Option<i32>,
    pub player_id: Option<String>,
}
