use serde::Serialize;
use serde_json::{Map, Value};

/// Product types kept in the dataset; everything else (veterinary,
/// devices, ...) is skipped.
pub const ALLOWED_PRODUCT_TYPES: [&str; 2] = ["HUMAN OTC DRUG", "HUMAN PRESCRIPTION DRUG"];

const SEARCH_TEXT_MAX: usize = 2000;

/// One accepted drug label, flattened. Field order here is the column
/// order of the CSV output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrugRecord {
    // Identification
    pub brand_name: String,
    pub generic_name: String,
    pub manufacturer: String,
    pub product_type: String,
    pub product_ndc: String,
    pub package_ndc: String,
    pub active_ingredients: String,
    pub route: String,

    // What it's for
    pub purpose: String,
    pub indications: String,

    // How to use
    pub dosage: String,

    // Safety
    pub warnings: String,
    pub do_not_use: String,
    pub stop_use: String,
    pub ask_doctor: String,
    pub when_using: String,
    pub side_effects: String,

    // Storage
    pub storage: String,
    pub keep_away_children: String,

    pub search_text: String,
}

/// First item of a list field, or the stringified scalar. Missing, null
/// and empty-list values fall back to `default`.
pub fn first_value(data: &Map<String, Value>, key: &str, default: &str) -> String {
    match data.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::Array(items)) => items
            .first()
            .map(value_text)
            .unwrap_or_else(|| default.to_string()),
        Some(other) => value_text(other),
    }
}

/// Join a list field into a comma-separated string, skipping empty
/// elements. Non-list values yield an empty string, never a stringified
/// scalar.
pub fn join_values(data: &Map<String, Value>, key: &str) -> String {
    match data.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| is_truthy(v))
            .map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Filter one raw label and flatten it. Filters run in order; the first
/// failure rejects the record and nothing after it is extracted.
pub fn process(raw: &Value) -> Option<DrugRecord> {
    let record = raw.as_object()?;
    let empty = Map::new();
    let openfda = record
        .get("openfda")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    // Must have a real brand name
    let brand_name = first_value(openfda, "brand_name", "Unknown");
    if brand_name.is_empty() || brand_name == "Unknown" {
        return None;
    }

    // Must have identification data at all
    if openfda.is_empty() {
        return None;
    }

    // Must be a human drug
    let product_type = first_value(openfda, "product_type", "");
    if product_type.is_empty() {
        return None;
    }
    if !ALLOWED_PRODUCT_TYPES.contains(&product_type.as_str()) {
        return None;
    }

    // Must carry at least one NDC code for barcode lookup
    let product_ndc = join_values(openfda, "product_ndc");
    let package_ndc = join_values(openfda, "package_ndc");
    if product_ndc.is_empty() && package_ndc.is_empty() {
        return None;
    }

    // Must name its active ingredients; substance_name is the structured
    // source, the label's own active_ingredient field is the fallback
    let mut active_ingredients = join_values(openfda, "substance_name");
    if active_ingredients.is_empty() {
        active_ingredients = first_value(record, "active_ingredient", "");
    }
    if active_ingredients.is_empty() {
        return None;
    }

    // Must say what it is for
    let purpose = first_value(record, "purpose", "");
    let indications = first_value(record, "indications_and_usage", "");
    if purpose.is_empty() && indications.is_empty() {
        return None;
    }

    Some(DrugRecord {
        brand_name,
        generic_name: first_value(openfda, "generic_name", ""),
        manufacturer: first_value(openfda, "manufacturer_name", ""),
        product_type,
        product_ndc,
        package_ndc,
        active_ingredients,
        route: join_values(openfda, "route"),
        purpose,
        indications,
        dosage: first_value(record, "dosage_and_administration", ""),
        warnings: first_value(record, "warnings", ""),
        do_not_use: first_value(record, "do_not_use", ""),
        stop_use: first_value(record, "stop_use", ""),
        ask_doctor: first_value(record, "ask_doctor", ""),
        when_using: first_value(record, "when_using", ""),
        side_effects: first_value(record, "adverse_reactions", ""),
        storage: first_value(record, "storage_and_handling", ""),
        keep_away_children: first_value(record, "keep_out_of_reach_of_children", ""),
        search_text: String::new(),
    })
}

/// Plain-text summary for search indexing: brand always, the optional
/// lines only when non-empty, capped at 2000 chars plus a "..." marker.
pub fn search_text(drug: &DrugRecord) -> String {
    let mut parts = vec![format!("Brand: {}", drug.brand_name)];
    if !drug.generic_name.is_empty() {
        parts.push(format!("Generic: {}", drug.generic_name));
    }
    if !drug.active_ingredients.is_empty() {
        parts.push(format!("Ingredients: {}", drug.active_ingredients));
    }
    if !drug.purpose.is_empty() {
        parts.push(format!("Purpose: {}", drug.purpose));
    }
    if !drug.indications.is_empty() {
        parts.push(format!("Uses: {}", drug.indications));
    }

    let text = parts.join("\n");
    if text.chars().count() <= SEARCH_TEXT_MAX {
        text
    } else {
        let capped: String = text.chars().take(SEARCH_TEXT_MAX).collect();
        format!("{}...", capped)
    }
}

/// Run the filter over every raw label in arrival order. Returns the
/// accepted records (search text attached) and the skip count.
pub fn process_all(raw_labels: &[Value]) -> (Vec<DrugRecord>, usize) {
    let mut accepted = Vec::new();
    let mut skipped = 0usize;

    for raw in raw_labels {
        match process(raw) {
            Some(mut drug) => {
                drug.search_text = search_text(&drug);
                accepted.push(drug);
            }
            None => skipped += 1,
        }
    }

    (accepted, skipped)
}
