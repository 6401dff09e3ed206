use csv::ReaderBuilder;

use crate::types::{AppError, AppResult};

/// Read one named column out of CSV bytes.
///
/// The first record is the header. Rows shorter than the header yield
/// `None` for the absent cells; rows longer than the header are a parse
/// error. The whole file is validated before the column lookup so that
/// malformed content is reported ahead of a missing column.
pub fn read_column(content: &[u8], column: &str) -> AppResult<Vec<Option<String>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            if idx == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(AppError::Io("No columns to parse from file".to_string()));
    }

    let index = headers.iter().position(|h| h == column);
    let mut values = Vec::new();

    for record in rdr.records() {
        let record = record?;

        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(AppError::Io(format!(
                "Error tokenizing data. Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            )));
        }

        if let Some(idx) = index {
            values.push(record.get(idx).map(|v| v.to_string()));
        }
    }

    match index {
        Some(_) => Ok(values),
        None => Err(AppError::MissingColumn(column.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_column_in_order() {
        let data = b"id,review,stars\n1,great product,5\n2,terrible,1\n3,it arrived,3\n";
        let values = read_column(data, "review").unwrap();
        assert_eq!(
            values,
            vec![
                Some("great product".to_string()),
                Some("terrible".to_string()),
                Some("it arrived".to_string()),
            ]
        );
    }

    #[test]
    fn test_quoted_fields_and_embedded_commas() {
        let data = b"review\n\"good, but slow\"\n\"said \"\"wow\"\"\"\n";
        let values = read_column(data, "review").unwrap();
        assert_eq!(
            values,
            vec![Some("good, but slow".to_string()), Some("said \"wow\"".to_string())]
        );
    }

    #[test]
    fn test_short_rows_yield_none() {
        let data = b"id,review\n1\n2,fine\n";
        let values = read_column(data, "review").unwrap();
        assert_eq!(values, vec![None, Some("fine".to_string())]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let data = b"id,review\n1,fine\n2,bad,extra\n";
        let err = read_column(data, "review").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(
            err.to_string(),
            "Error tokenizing data. Expected 2 fields in line 3, saw 3"
        );
    }

    #[test]
    fn test_malformed_content_wins_over_missing_column() {
        let data = b"a,b\n1,2,3\n";
        assert!(matches!(read_column(data, "review"), Err(AppError::Io(_))));
    }

    #[test]
    fn test_column_name_is_case_sensitive() {
        let err = read_column(b"Review\ngood\n", "review").unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(_)));
    }

    #[test]
    fn test_empty_input() {
        let err = read_column(b"", "review").unwrap_err();
        assert_eq!(err.to_string(), "No columns to parse from file");
    }

    #[test]
    fn test_header_only() {
        assert!(read_column(b"review\n", "review").unwrap().is_empty());
    }

    #[test]
    fn test_bom_and_blank_lines() {
        let data = "\u{feff}review\ngood\n\nbad\n".as_bytes();
        let values = read_column(data, "review").unwrap();
        assert_eq!(values, vec![Some("good".to_string()), Some("bad".to_string())]);
    }

    #[test]
    fn test_first_duplicate_column_wins() {
        let data = b"review,review\nfirst,second\n";
        assert_eq!(read_column(data, "review").unwrap(), vec![Some("first".to_string())]);
    }

    #[test]
    fn test_invalid_utf8() {
        let data = b"review\n\xff\xfe\n";
        assert!(matches!(read_column(data, "review"), Err(AppError::Io(_))));
    }
}
