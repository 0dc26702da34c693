use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::processor::DrugRecord;

pub const CSV_FILE: &str = "drugs_minimal.csv";
pub const JSON_FILE: &str = "drugs_minimal.json";

pub struct OutputPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Write the accepted set as CSV and JSON into `dir`, overwriting any
/// previous run. Failures here are the run's only fatal errors.
pub fn write_outputs(dir: &Path, drugs: &[DrugRecord]) -> Result<OutputPaths> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let csv_path = dir.join(CSV_FILE);
    let json_path = dir.join(JSON_FILE);
    write_csv(&csv_path, drugs)?;
    write_json(&json_path, drugs)?;

    Ok(OutputPaths {
        csv: csv_path,
        json: json_path,
    })
}

/// One row per drug, header row from the record's field names.
fn write_csv(path: &Path, drugs: &[DrugRecord]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for drug in drugs {
        writer.serialize(drug)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Array of objects, same fields as the CSV.
fn write_json(path: &Path, drugs: &[DrugRecord]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, drugs)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(brand: &str) -> DrugRecord {
        DrugRecord {
            brand_name: brand.to_string(),
            product_type: "HUMAN OTC DRUG".to_string(),
            product_ndc: "0573-0164".to_string(),
            active_ingredients: "IBUPROFEN".to_string(),
            purpose: "Pain reliever".to_string(),
            search_text: format!("Brand: {}", brand),
            ..Default::default()
        }
    }

    #[test]
    fn writes_both_files() {
        let dir = std::env::temp_dir().join(format!("fda_scraper_export_{}", std::process::id()));
        let drugs = vec![sample("Advil"), sample("Tylenol")];

        let paths = write_outputs(&dir, &drugs).unwrap();

        let csv = fs::read_to_string(&paths.csv).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("brand_name,generic_name,manufacturer,product_type"));
        assert!(header.ends_with("search_text"));
        assert_eq!(lines.count(), 2);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.json).unwrap()).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["brand_name"], "Advil");
        assert_eq!(rows[1]["search_text"], "Brand: Tylenol");

        let _ = fs::remove_dir_all(&dir);
    }
}
