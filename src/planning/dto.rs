use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::airtable::Record;

pub const DEFAULT_STATUS: &str = "Planifié";

#[derive(Debug, Deserialize)]
pub struct PlanningQuery {
    pub week: Option<String>,
    pub year: Option<String>,
}

/// Body of `POST /api/planning`. Any `status` sent by the caller is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateEntryRequest {
    pub day: Option<Value>,
    pub date: Option<Value>,
    pub meal: Option<Value>,
    #[serde(rename = "recipeId")]
    pub recipe_id: Option<Value>,
    pub week: Option<Value>,
    pub year: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PlanningEntry {
    pub id: String,
    pub day: String,
    pub date: String,
    pub meal: String,
    pub recipe: Value,
    pub status: String,
}

impl From<Record> for PlanningEntry {
    fn from(r: Record) -> Self {
        Self {
            day: r.text_or("Jour", ""),
            date: r.text_or("Date", ""),
            meal: r.text_or("Moment", ""),
            recipe: r.value_or("Recette", json!([])),
            status: r.text_or("Statut", DEFAULT_STATUS),
            id: r.id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanningResponse {
    pub success: bool,
    pub planning: Vec<PlanningEntry>,
}

#[derive(Debug, Serialize)]
pub struct CreatedEntryResponse {
    pub success: bool,
    pub record: Record,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: &'static str,
}
