use serde::Serialize;
use serde_json::{json, Value};

use crate::airtable::Record;

#[derive(Debug, Serialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub ingredients: Value,
    pub calories: Value,
    pub proteins: Value,
    pub carbs: Value,
    pub fats: Value,
    pub servings: Value,
    pub tags: Value,
}

impl From<Record> for Recipe {
    fn from(r: Record) -> Self {
        let ingredients = match r.field("Ingrédients JSON") {
            Some(v) => v.clone(),
            None => r.value_or("Ingrédients Brut", json!("")),
        };
        Self {
            name: r.text_or("Nom", "Sans nom"),
            ingredients,
            calories: r.value_or("Calories (totales)", json!(0)),
            proteins: r.value_or("Protéines (g)", json!(0)),
            carbs: r.value_or("Glucides (g)", json!(0)),
            fats: r.value_or("Lipides (g)", json!(0)),
            servings: r.value_or("Nombre de personnes (base)", json!(1)),
            tags: r.value_or("Tags", json!([])),
            id: r.id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipesResponse {
    pub success: bool,
    pub recipes: Vec<Recipe>,
}
