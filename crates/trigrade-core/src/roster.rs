//! Class roster loading.
//!
//! Reads a two-column CSV (student id, display name). Header names are
//! matched case-insensitively; missing headers fall back to column position
//! rather than failing.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::model::RosterEntry;

const ID_HEADERS: [&str; 2] = ["id", "학번"];
const NAME_HEADERS: [&str; 2] = ["이름", "name"];

/// The sample roster used until one is loaded.
pub fn default_roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new("S001", "홍길동"),
        RosterEntry::new("S002", "김영희"),
        RosterEntry::new("S003", "이민호"),
    ]
}

fn normalize_header(cell: &str) -> String {
    cell.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn find_column(header: &StringRecord, names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|cell| names.contains(&normalize_header(cell).as_str()))
}

/// First column index other than `taken`.
fn first_free(taken: Option<usize>) -> usize {
    match taken {
        Some(0) => 1,
        _ => 0,
    }
}

/// Parse roster CSV from any reader.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<RosterEntry>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in rdr.records() {
        rows.push(record.context("failed to read roster row")?);
    }
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };

    let id_col = find_column(first, &ID_HEADERS);
    let name_col = find_column(first, &NAME_HEADERS);
    let has_header = id_col.is_some() || name_col.is_some();
    if !has_header {
        tracing::warn!("roster has no recognized header, reading columns by position");
    } else if id_col.is_none() || name_col.is_none() {
        tracing::warn!("roster header is incomplete, using positional fallback");
    }
    let id_col = id_col.unwrap_or_else(|| first_free(name_col));
    let name_col = name_col.unwrap_or_else(|| if id_col == 1 { 0 } else { 1 });
    let data = if has_header { &rows[1..] } else { &rows[..] };

    let entries = data
        .iter()
        .filter_map(|row| {
            let id = row.get(id_col).unwrap_or_default().trim_start_matches('\u{feff}');
            if id.is_empty() {
                return None;
            }
            let name = row.get(name_col).filter(|n| !n.is_empty()).unwrap_or(id);
            Some(RosterEntry::new(id, name))
        })
        .collect();
    Ok(entries)
}

/// Parse roster CSV text.
pub fn parse_roster_str(content: &str) -> Result<Vec<RosterEntry>> {
    parse_roster(content.as_bytes())
}

/// Load a roster CSV file.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open roster: {}", path.display()))?;
    parse_roster(file).with_context(|| format!("failed to parse roster: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(entries: &[RosterEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn parse_english_headers_any_case() {
        let entries = parse_roster_str("Name,ID\nAlice,S010\nBob,S011\n").unwrap();
        assert_eq!(ids(&entries), vec!["S010", "S011"]);
        assert_eq!(entries[0].name, "Alice");
    }

    #[test]
    fn parse_korean_headers_with_bom() {
        let entries = parse_roster_str("\u{feff}학번,이름\n20301,홍길동\n").unwrap();
        assert_eq!(entries, vec![RosterEntry::new("20301", "홍길동")]);
    }

    #[test]
    fn headerless_file_is_positional() {
        let entries = parse_roster_str("S001,Kim\nS002,Lee\n").unwrap();
        assert_eq!(ids(&entries), vec!["S001", "S002"]);
        assert_eq!(entries[1].name, "Lee");
    }

    #[test]
    fn partial_header_falls_back_for_missing_column() {
        let entries = parse_roster_str("student,name,class\nS7,Park,2-1\n").unwrap();
        assert_eq!(entries, vec![RosterEntry::new("S7", "Park")]);

        let entries = parse_roster_str("id,full name\nS8,Choi\n").unwrap();
        assert_eq!(entries, vec![RosterEntry::new("S8", "Choi")]);
    }

    #[test]
    fn blank_rows_skipped_and_missing_name_uses_id() {
        let entries = parse_roster_str("ID,이름\nS001,Kim\n,\nS002\n").unwrap();
        assert_eq!(
            entries,
            vec![RosterEntry::new("S001", "Kim"), RosterEntry::new("S002", "S002")]
        );
    }

    #[test]
    fn empty_input_yields_empty_roster() {
        assert!(parse_roster_str("").unwrap().is_empty());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        std::fs::write(&path, "ID,name\nS100,Jung\n").unwrap();
        let entries = load_roster(&path).unwrap();
        assert_eq!(entries, vec![RosterEntry::new("S100", "Jung")]);
        assert!(load_roster(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn default_roster_has_three_students() {
        assert_eq!(ids(&default_roster()), vec!["S001", "S002", "S003"]);
    }
}
