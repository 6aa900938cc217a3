//! Row-oriented constructors for collaborator-supplied tabular data.
//!
//! Spreadsheet parsing and upload stay outside this crate; callers hand over
//! a header row plus data rows already split into cells and get typed records
//! back. Every problem in a batch is collected before returning so a
//! collaborator can fix the whole sheet in one pass.

use crate::core::{Component, Criterion};
use crate::errors::{ReportError, Result};
use crate::report::StudyRequest;

/// Column lookup over a header row. Matching is case-insensitive and
/// ignores surrounding whitespace.
struct HeaderMap {
    normalized: Vec<String>,
}

impl HeaderMap {
    fn new(headers: &[String]) -> Self {
        Self {
            normalized: headers.iter().map(|h| h.trim().to_lowercase()).collect(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.normalized.iter().position(|h| h == name)
    }

    fn require(&self, names: &[&str]) -> Result<()> {
        let issues: Vec<String> = names
            .iter()
            .filter(|name| self.position(name).is_none())
            .map(|name| format!("missing column: {name}"))
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ReportError::validations(issues))
        }
    }
}

fn cell<'a>(row: &'a [String], index: Option<usize>) -> Option<&'a str> {
    let text = row.get(index?)?.trim();
    (!text.is_empty()).then_some(text)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Build the component roster from header + data rows. Requires
/// `manufacturer` and `part_number` columns; `description` is optional.
/// Fully empty rows are skipped; ids are assigned in row order.
pub fn components_from_rows(headers: &[String], rows: &[Vec<String>]) -> Result<Vec<Component>> {
    let map = HeaderMap::new(headers);
    map.require(&["manufacturer", "part_number"])?;

    let manufacturer_col = map.position("manufacturer");
    let part_number_col = map.position("part_number");
    let description_col = map.position("description");

    let mut components = Vec::new();
    let mut issues = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        if is_blank(row) {
            continue;
        }
        // Row numbers are 1-based and count the header row.
        let line = index + 2;
        let manufacturer = cell(row, manufacturer_col);
        let part_number = cell(row, part_number_col);
        let (Some(manufacturer), Some(part_number)) = (manufacturer, part_number) else {
            issues.push(format!("row {line}: manufacturer and part_number are required"));
            continue;
        };
        let mut component = Component::new(components.len() as u64 + 1, manufacturer, part_number);
        if let Some(description) = cell(row, description_col) {
            component = component.with_description(description);
        }
        components.push(component);
    }

    if issues.is_empty() {
        Ok(components)
    } else {
        Err(ReportError::validations(issues))
    }
}

/// Build the criteria list from header + data rows. Requires `name` and
/// `weight` columns; `description`, `unit`, `higher_is_better`,
/// `min_requirement` and `max_requirement` are optional.
pub fn criteria_from_rows(headers: &[String], rows: &[Vec<String>]) -> Result<Vec<Criterion>> {
    let map = HeaderMap::new(headers);
    map.require(&["name", "weight"])?;

    let name_col = map.position("name");
    let weight_col = map.position("weight");
    let description_col = map.position("description");
    let unit_col = map.position("unit");
    let direction_col = map.position("higher_is_better");
    let min_col = map.position("min_requirement");
    let max_col = map.position("max_requirement");

    let mut criteria = Vec::new();
    let mut issues = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        if is_blank(row) {
            continue;
        }
        let line = index + 2;
        let Some(name) = cell(row, name_col) else {
            issues.push(format!("row {line}: name is required"));
            continue;
        };
        let weight = match cell(row, weight_col).map(parse_number) {
            Some(Ok(weight)) if weight > 0.0 && weight.is_finite() => weight,
            Some(Ok(weight)) => {
                issues.push(format!("row {line}: weight must be > 0, got {weight}"));
                continue;
            }
            Some(Err(text)) => {
                issues.push(format!("row {line}: weight is not a number: {text}"));
                continue;
            }
            None => {
                issues.push(format!("row {line}: weight is required"));
                continue;
            }
        };

        let mut criterion = Criterion::new(criteria.len() as u64 + 1, name, weight);
        if let Some(description) = cell(row, description_col) {
            criterion = criterion.with_description(description);
        }
        if let Some(unit) = cell(row, unit_col) {
            criterion = criterion.with_unit(unit);
        }
        if let Some(text) = cell(row, direction_col) {
            match parse_flag(text) {
                Some(flag) => criterion.higher_is_better = flag,
                None => {
                    issues.push(format!("row {line}: higher_is_better is not a boolean: {text}"))
                }
            }
        }
        for (column, slot, label) in [
            (min_col, &mut criterion.min_requirement, "min_requirement"),
            (max_col, &mut criterion.max_requirement, "max_requirement"),
        ] {
            if let Some(text) = cell(row, column) {
                match parse_number(text) {
                    Ok(value) => *slot = Some(value),
                    Err(text) => {
                        issues.push(format!("row {line}: {label} is not a number: {text}"))
                    }
                }
            }
        }
        criteria.push(criterion);
    }

    if issues.is_empty() {
        Ok(criteria)
    } else {
        Err(ReportError::validations(issues))
    }
}

fn parse_number(text: &str) -> std::result::Result<f64, &str> {
    text.parse::<f64>().map_err(|_| text)
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Range checks over an assembled request: weights positive and finite,
/// scores in [1, 10], confidence in [0, 1]. Collects every violation.
pub fn validate_request(request: &StudyRequest) -> Result<()> {
    let mut issues = Vec::new();
    for criterion in &request.criteria {
        if !(criterion.weight > 0.0 && criterion.weight.is_finite()) {
            issues.push(format!(
                "criterion '{}': weight must be > 0, got {}",
                criterion.name, criterion.weight
            ));
        }
    }
    for entry in &request.scores {
        if !(1..=10).contains(&entry.score) {
            issues.push(format!(
                "score {} for component {} outside [1, 10]",
                entry.score, entry.component_id
            ));
        }
        if let Some(confidence) = entry.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                issues.push(format!(
                    "confidence {} for component {} outside [0, 1]",
                    confidence, entry.component_id
                ));
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ReportError::validations(issues))
    }
}
