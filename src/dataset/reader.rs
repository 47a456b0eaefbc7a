use std::path::Path;

use calamine::{Reader, open_workbook_auto};

use crate::dataset::DatasetError;

/// Raw cell text below the header row. `column_count` is the header width.
#[derive(Clone, Debug, Default)]
pub struct Table {
    pub column_count: usize,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Delimited(u8),
    Spreadsheet,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Format::Delimited(b',')),
            "tsv" | "txt" => Ok(Format::Delimited(b'\t')),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Format::Spreadsheet),
            _ => Err(DatasetError::UnsupportedFormat(ext)),
        }
    }
}

pub fn read_table(path: &Path) -> Result<Table, DatasetError> {
    match Format::from_path(path)? {
        Format::Delimited(delimiter) => read_delimited(path, delimiter),
        Format::Spreadsheet => read_spreadsheet(path),
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Table, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let column_count = reader.headers()?.len();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table { column_count, rows })
}

fn read_spreadsheet(path: &Path) -> Result<Table, DatasetError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DatasetError::NoWorksheet)??;

    let (_, column_count) = range.get_size();
    let rows = range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    Ok(Table { column_count, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            Format::from_path(Path::new("a.CSV")).unwrap(),
            Format::Delimited(b',')
        );
        assert_eq!(
            Format::from_path(Path::new("a.tsv")).unwrap(),
            Format::Delimited(b'\t')
        );
        assert_eq!(
            Format::from_path(Path::new("a.xlsx")).unwrap(),
            Format::Spreadsheet
        );
        assert!(matches!(
            Format::from_path(Path::new("a.pdf")),
            Err(DatasetError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_read_csv_with_quoted_commas() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "s.csv",
            "no,eng,kor\n1,\"Well, hello there.\",안녕\n2,Good night,잘자\n",
        );
        let table = read_table(&path).unwrap();
        assert_eq!(table.column_count, 3);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "Well, hello there.");
        assert_eq!(table.rows[1][2], "잘자");
    }

    #[test]
    fn test_read_tsv() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "s.tsv", "a\tb\tc\n7\tI'm here.\t여기\n");
        let table = read_table(&path).unwrap();
        assert_eq!(table.column_count, 3);
        assert_eq!(table.rows[0], vec!["7", "I'm here.", "여기"]);
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "s.csv", "a,b,c\n1,Only two\n2,Three,셋,extra\n");
        let table = read_table(&path).unwrap();
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        assert!(matches!(read_table(&path), Err(DatasetError::Csv(_))));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_read_xlsx_skips_header_row() {
        let table = read_table(&fixture("sentences.xlsx")).unwrap();
        assert_eq!(table.column_count, 3);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.rows[0],
            vec!["1", "Good morning everybody.", "모두 좋은 아침입니다."]
        );
        assert_eq!(table.rows[2][1], "Don't worry about it.");
    }

    #[test]
    fn test_xlsx_column_count_comes_from_sheet_width() {
        let table = read_table(&fixture("two_columns.xlsx")).unwrap();
        assert_eq!(table.column_count, 2);
        assert_eq!(table.rows, vec![vec!["1", "Only two columns."]]);
    }
}
