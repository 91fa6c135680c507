use serde_json::{json, Value};

use super::dto::{CreateShoppingListRequest, UpdateShoppingListRequest};
use crate::airtable::{as_text, is_set, Fields};

/// `{Statut} = '<status>'` when a status is given.
pub fn status_filter(status: Option<&str>) -> Option<String> {
    let status = status.filter(|s| !s.is_empty())?;
    let escaped = status.replace('\\', "\\\\").replace('\'', "\\'");
    Some(format!("{{Statut}} = '{escaped}'"))
}

/// Ingredient count stored next to the serialized list. Only arrays and
/// strings have a length; anything else leaves `Nb Items` untouched.
pub fn item_count(ingredients: &Value) -> Option<usize> {
    match ingredients {
        Value::Array(items) => Some(items.len()),
        Value::String(s) => Some(s.encode_utf16().count()),
        _ => None,
    }
}

fn set(value: Option<Value>) -> Option<Value> {
    value.filter(is_set)
}

/// Outbound fields for a new list. Collections are stored as JSON strings.
pub fn new_list_fields(req: CreateShoppingListRequest, created_at: String) -> Fields {
    let ingredients = set(req.ingredients).unwrap_or_else(|| json!([]));
    let repas_inclus = set(req.repas_inclus).unwrap_or_else(|| json!({}));
    let nom = set(req.nom).unwrap_or_else(|| {
        json!(format!(
            "Liste semaine {} - {}",
            req.semaine.as_ref().map(as_text).unwrap_or_default(),
            req.annee.as_ref().map(as_text).unwrap_or_default(),
        ))
    });

    let mut fields = Fields::new();
    fields.insert("Nom".into(), nom);
    if let Some(semaine) = req.semaine {
        fields.insert("Semaine".into(), semaine);
    }
    if let Some(annee) = req.annee {
        fields.insert("Annee".into(), annee);
    }
    fields.insert("Date Création".into(), json!(created_at));
    fields.insert("Ingrédients JSON".into(), json!(ingredients.to_string()));
    fields.insert("Repas Inclus JSON".into(), json!(repas_inclus.to_string()));
    fields.insert(
        "Statut".into(),
        set(req.statut).unwrap_or_else(|| json!("Active")),
    );
    if let Some(count) = item_count(&ingredients) {
        fields.insert("Nb Items".into(), json!(count));
    }
    fields.insert("Notes".into(), set(req.notes).unwrap_or_else(|| json!("")));
    fields
}

/// Patch containing only the keys present in the request. An explicit
/// `null` for `ingredients` cannot be counted and is refused.
pub fn patch_fields(req: UpdateShoppingListRequest) -> Result<Fields, &'static str> {
    let mut fields = Fields::new();
    if let Some(ingredients) = req.ingredients {
        if ingredients.is_null() {
            return Err("ingredients cannot be null");
        }
        fields.insert("Ingrédients JSON".into(), json!(ingredients.to_string()));
        if let Some(count) = item_count(&ingredients) {
            fields.insert("Nb Items".into(), json!(count));
        }
    }
    if let Some(repas_inclus) = req.repas_inclus {
        fields.insert("Repas Inclus JSON".into(), json!(repas_inclus.to_string()));
    }
    if let Some(statut) = req.statut {
        fields.insert("Statut".into(), statut);
    }
    if let Some(notes) = req.notes {
        fields.insert("Notes".into(), notes);
    }
    if let Some(nom) = req.nom {
        fields.insert("Nom".into(), nom);
    }
    Ok(fields)
}
