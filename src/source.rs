// File: ./src/source.rs
//! Spreadsheet decoding.
//!
//! Only the first worksheet is read. Its first non-blank row holds the column
//! labels; every later non-blank row becomes a [`RawRow`] keyed by those labels.
//! Empty cells are left out of the row, so callers see them as absent.
use crate::error::EventError;
use crate::model::{CellValue, RawRow};
use crate::model::time::to_local;
use calamine::{Data, ExcelDateTime, Range, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveTime};
use std::io::Cursor;
use std::path::Path;

/// Reads a spreadsheet file and decodes its first sheet.
pub async fn read_file(path: &Path) -> Result<Vec<RawRow>, EventError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| EventError::UnreadableSource(format!("{}: {}", path.display(), e)))?;
    log::info!("Read {} bytes from {}", bytes.len(), path.display());

    tokio::task::spawn_blocking(move || decode_workbook(bytes))
        .await
        .map_err(|e| EventError::UnreadableSource(format!("decoder task failed: {}", e)))?
}

/// Decodes spreadsheet bytes (xlsx, xlsm, xlsb, xls or ods).
pub fn decode_workbook(bytes: Vec<u8>) -> Result<Vec<RawRow>, EventError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| EventError::UnreadableSource(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EventError::UnreadableSource("workbook has no sheets".to_string()))?
        .map_err(|e| EventError::UnreadableSource(e.to_string()))?;

    Ok(rows_from_range(&range))
}

/// Splits a sheet range into a header row and labelled data rows.
pub fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows = range
        .rows()
        .filter(|cells| !cells.iter().all(|c| cell_value(c).is_empty()));

    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let labels: Vec<String> = header
        .iter()
        .map(|c| cell_value(c).display_text().trim().to_string())
        .collect();

    rows.map(|cells| {
        labels
            .iter()
            .zip(cells)
            .filter(|(label, _)| !label.is_empty())
            .map(|(label, c)| (label.clone(), cell_value(c)))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    })
    .collect()
}

/// Maps a decoded cell onto the loader's cell model.
///
/// Date-formatted cells are resolved here with the workbook's own epoch, so
/// the configured date system only applies to plain numbers.
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => date_cell(dt),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn date_cell(dt: &ExcelDateTime) -> CellValue {
    // `[h]:mm` style cells hold elapsed time, not a date.
    if dt.is_duration() {
        return CellValue::Empty;
    }
    let serial = dt.as_f64();
    if !serial.is_finite() || serial < 0.0 {
        // Left to the normalizer, which rejects it.
        return CellValue::Number(serial);
    }

    let (y, mo, d, h, mi, sec, milli) = dt.to_ymd_hms_milli();
    let date = NaiveDate::from_ymd_opt(y.into(), mo.into(), d.into()).or_else(|| {
        // The phantom 1900-02-29 reads as the day after.
        ((y, mo, d) == (1900, 2, 29))
            .then(|| NaiveDate::from_ymd_opt(1900, 3, 1))
            .flatten()
    });
    let time = NaiveTime::from_hms_milli_opt(h.into(), mi.into(), sec.into(), milli.into());

    match date.zip(time).and_then(|(date, time)| to_local(date.and_time(time))) {
        Some(local) => CellValue::DateTime(local),
        None => CellValue::Number(serial),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTimeType;
    use chrono::{Local, TimeZone};

    fn sheet(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), value.clone());
            }
        }
        range
    }

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    #[test]
    fn test_header_labels_rows() {
        let range = sheet(&[
            &[s("Subject"), s("Location"), s("Start"), s("End")],
            &[s("Standup"), s("Room 1"), Data::Float(45000.375), Data::Empty],
            &[s("Lunch"), Data::Empty, s("2024-06-01 12:00"), Data::Int(45001)],
        ]);
        let rows = rows_from_range(&range);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Subject"], CellValue::from("Standup"));
        assert_eq!(rows[0]["Location"], CellValue::from("Room 1"));
        assert_eq!(rows[0]["Start"], CellValue::Number(45000.375));
        assert!(!rows[0].contains_key("End"));
        assert!(!rows[1].contains_key("Location"));
        assert_eq!(rows[1]["End"], CellValue::Number(45001.0));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let range = sheet(&[
            &[Data::Empty, Data::Empty],
            &[s("Subject"), s("Start")],
            &[Data::Empty, Data::Empty],
            &[s("Only"), s("2024-06-01")],
        ]);
        let rows = rows_from_range(&range);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Subject"], CellValue::from("Only"));
    }

    #[test]
    fn test_unlabelled_columns_are_ignored() {
        let range = sheet(&[&[s("Subject"), Data::Empty], &[s("A"), s("stray")]]);
        let rows = rows_from_range(&range);
        assert_eq!(rows[0].len(), 1);
    }

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-06-01T10:00:00".to_string())),
            CellValue::from("2024-06-01T10:00:00")
        );
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> CellValue {
        CellValue::DateTime(
            Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap(),
        )
    }

    #[test]
    fn test_date_cells_use_workbook_epoch() {
        let mac = Data::DateTime(ExcelDateTime::new(43538.0, ExcelDateTimeType::DateTime, true));
        assert_eq!(cell_value(&mac), local(2023, 3, 15, 0, 0));

        let win = Data::DateTime(ExcelDateTime::new(45000.5, ExcelDateTimeType::DateTime, false));
        assert_eq!(cell_value(&win), local(2023, 3, 15, 12, 0));

        let phantom = Data::DateTime(ExcelDateTime::new(60.0, ExcelDateTimeType::DateTime, false));
        assert_eq!(cell_value(&phantom), local(1900, 3, 1, 0, 0));
    }

    #[test]
    fn test_duration_cells_are_not_dates() {
        let elapsed = Data::DateTime(ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false));
        assert_eq!(cell_value(&elapsed), CellValue::Empty);
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let err = decode_workbook(b"definitely not a spreadsheet".to_vec()).unwrap_err();
        assert!(matches!(err, EventError::UnreadableSource(_)));

        let err = decode_workbook(Vec::new()).unwrap_err();
        assert!(matches!(err, EventError::UnreadableSource(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_unreadable() {
        let err = read_file(Path::new("/nonexistent/events.xlsx")).await.unwrap_err();
        assert!(matches!(err, EventError::UnreadableSource(_)));
    }
}
