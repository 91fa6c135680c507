use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::airtable::Record;

#[derive(Debug, Deserialize)]
pub struct ShoppingListQuery {
    pub status: Option<String>,
}

/// Exposed shape of a `Liste de Courses` row.
#[derive(Debug, Serialize)]
pub struct ShoppingList {
    pub id: String,
    pub nom: String,
    pub semaine: Value,
    pub annee: Value,
    #[serde(rename = "dateCreation")]
    pub date_creation: String,
    #[serde(rename = "dateModification")]
    pub date_modification: String,
    #[serde(rename = "ingredientsJSON")]
    pub ingredients_json: String,
    #[serde(rename = "repasInclusJSON")]
    pub repas_inclus_json: String,
    pub statut: String,
    #[serde(rename = "nbItems")]
    pub nb_items: Value,
    pub notes: String,
}

impl From<Record> for ShoppingList {
    fn from(r: Record) -> Self {
        Self {
            nom: r.text_or("Nom", ""),
            semaine: r.value_or("Semaine", json!(0)),
            annee: r.value_or("Annee", json!(0)),
            date_creation: r.text_or("Date Création", ""),
            date_modification: r.text_or("Date Modification", ""),
            ingredients_json: r.text_or("Ingrédients JSON", "[]"),
            repas_inclus_json: r.text_or("Repas Inclus JSON", "{}"),
            statut: r.text_or("Statut", "Brouillon"),
            nb_items: r.value_or("Nb Items", json!(0)),
            notes: r.text_or("Notes", ""),
            id: r.id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateShoppingListRequest {
    pub nom: Option<Value>,
    pub semaine: Option<Value>,
    pub annee: Option<Value>,
    pub ingredients: Option<Value>,
    #[serde(rename = "repasInclus")]
    pub repas_inclus: Option<Value>,
    pub statut: Option<Value>,
    pub notes: Option<Value>,
}

/// Partial update. A key that is present, even as `null`, is `Some`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateShoppingListRequest {
    #[serde(default, deserialize_with = "present")]
    pub ingredients: Option<Value>,
    #[serde(default, rename = "repasInclus", deserialize_with = "present")]
    pub repas_inclus: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub statut: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub nom: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(d).map(Some)
}

#[derive(Debug, Serialize)]
pub struct ShoppingListsResponse {
    pub success: bool,
    #[serde(rename = "shoppingLists")]
    pub shopping_lists: Vec<ShoppingList>,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListResponse<T> {
    pub success: bool,
    #[serde(rename = "shoppingList")]
    pub shopping_list: T,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: &'static str,
}
