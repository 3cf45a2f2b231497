//! Tabular parsing for bulk import: CSV and XLSX land in one normalized
//! header/row shape so the column mapper can treat both the same.

use std::collections::HashMap;
use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use calamine::{Reader, Xlsx};

#[derive(Debug, Default)]
pub struct ImportTable {
    /// Normalized headers in source order.
    pub headers: Vec<String>,
    /// One map per data row, keyed by normalized header.
    pub rows: Vec<HashMap<String, String>>,
}

/// Lowercase and strip separators so `Company Name`, `company_name` and
/// `company-name` all become `companyname`.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect()
}

/// XLSX files are zip archives; the PK magic is enough to tell them from
/// CSV text.
pub fn is_xlsx(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x50 && data[1] == 0x4B
}

pub fn parse_table(data: &[u8]) -> Result<ImportTable> {
    if is_xlsx(data) {
        parse_xlsx(data)
    } else {
        parse_csv(data)
    }
}

fn parse_csv(data: &[u8]) -> Result<ImportTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(normalize_header)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(anyhow!("CSV has no header row"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read CSV row")?;
        let mut row = HashMap::new();
        for (i, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(i) {
                if !header.is_empty() {
                    row.insert(header.clone(), value.to_string());
                }
            }
        }
        rows.push(row);
    }

    Ok(ImportTable { headers, rows })
}

fn parse_xlsx(data: &[u8]) -> Result<ImportTable> {
    let mut workbook =
        Xlsx::new(Cursor::new(data.to_vec())).context("Failed to open XLSX workbook")?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("XLSX workbook has no sheets"))?
        .context("Failed to read first worksheet")?;

    let mut cells = range.rows();

    let headers: Vec<String> = cells
        .next()
        .ok_or_else(|| anyhow!("Worksheet has no header row"))?
        .iter()
        .map(|cell| normalize_header(&cell.to_string()))
        .collect();

    let mut rows = Vec::new();
    for row_cells in cells {
        let mut row = HashMap::new();
        for (i, cell) in row_cells.iter().enumerate() {
            if let Some(header) = headers.get(i) {
                if !header.is_empty() {
                    row.insert(header.clone(), cell.to_string());
                }
            }
        }
        rows.push(row);
    }

    Ok(ImportTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_normalize_to_one_form() {
        assert_eq!(normalize_header("Company Name"), "companyname");
        assert_eq!(normalize_header("company_name"), "companyname");
        assert_eq!(normalize_header("COMPANY-NAME"), "companyname");
    }

    #[test]
    fn csv_rows_are_keyed_by_normalized_header() {
        let csv = "Company Name,Email\nInitech,grace@initech.test\n";
        let table = parse_table(csv.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["companyname", "email"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0]["companyname"], "Initech");
        assert_eq!(table.rows[0]["email"], "grace@initech.test");
    }

    #[test]
    fn csv_values_are_trimmed() {
        let csv = "name\n  Grace  \n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(table.rows[0]["name"], "Grace");
    }

    #[test]
    fn zip_magic_selects_the_xlsx_path() {
        assert!(is_xlsx(b"PK\x03\x04rest"));
        assert!(!is_xlsx(b"name,email\n"));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv = "name,email,notes\nGrace,grace@initech.test\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(table.rows[0].get("notes"), None);
    }
}
