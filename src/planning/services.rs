use serde_json::{json, Value};

use super::dto::{CreateEntryRequest, DEFAULT_STATUS};
use crate::airtable::Fields;

fn digits(s: &&str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `AND({Semaine} = w, {Annee} = y)`, only when both week and year are plain
/// numbers.
pub fn week_filter(week: Option<&str>, year: Option<&str>) -> Option<String> {
    let week = week.filter(digits)?;
    let year = year.filter(digits)?;
    Some(format!("AND({{Semaine}} = {week}, {{Annee}} = {year})"))
}

/// Outbound fields for a new planning row. Status is always the default.
pub fn entry_fields(req: CreateEntryRequest) -> Fields {
    let mut fields = Fields::new();
    let mut put = |key: &str, value: Option<Value>| {
        if let Some(v) = value {
            fields.insert(key.to_string(), v);
        }
    };
    put("Jour", req.day);
    put("Date", req.date);
    put("Moment", req.meal);
    put("Recette", req.recipe_id.map(|id| json!([id])));
    put("Statut", Some(json!(DEFAULT_STATUS)));
    put("Semaine", req.week);
    put("Annee", req.year);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_needs_both_week_and_year() {
        assert_eq!(
            week_filter(Some("12"), Some("2025")).as_deref(),
            Some("AND({Semaine} = 12, {Annee} = 2025)")
        );
        assert_eq!(week_filter(Some("12"), None), None);
        assert_eq!(week_filter(None, Some("2025")), None);
        assert_eq!(week_filter(Some(""), Some("2025")), None);
        assert_eq!(week_filter(None, None), None);
    }

    #[test]
    fn filter_refuses_formula_fragments() {
        assert_eq!(week_filter(Some("1), TRUE("), Some("2025")), None);
        assert_eq!(week_filter(Some("12"), Some("2025 OR 1")), None);
        assert_eq!(week_filter(Some("-1"), Some("2025")), None);
    }

    #[test]
    fn entry_fields_wrap_recipe_and_force_status() {
        let req = CreateEntryRequest {
            day: Some(json!("Lundi")),
            date: Some(json!("2025-03-17")),
            meal: Some(json!("Dîner")),
            recipe_id: Some(json!("recABC")),
            week: Some(json!(12)),
            year: Some(json!(2025)),
        };
        let fields = entry_fields(req);
        assert_eq!(
            Value::Object(fields),
            json!({
                "Jour": "Lundi",
                "Date": "2025-03-17",
                "Moment": "Dîner",
                "Recette": ["recABC"],
                "Statut": "Planifié",
                "Semaine": 12,
                "Annee": 2025
            })
        );
    }

    #[test]
    fn omitted_inputs_stay_omitted() {
        let fields = entry_fields(CreateEntryRequest::default());
        assert_eq!(Value::Object(fields), json!({ "Statut": "Planifié" }));
    }
}
