use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::error::{AppResult, FileError};
use crate::models::Record;

/// 读取工作簿的第一张工作表：首行为字段名，空单元格视为缺失
pub fn read_excel_records(path: &Path) -> AppResult<Vec<Record>> {
    let source = path.display().to_string();
    let malformed = |reason: String| FileError::MalformedRecords {
        path: source.clone(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| malformed(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| malformed("工作簿中没有工作表".to_string()))?
        .map_err(|e| malformed(e.to_string()))?;

    Ok(records_from_rows(range.rows()))
}

fn records_from_rows<'a>(mut rows: impl Iterator<Item = &'a [Data]>) -> Vec<Record> {
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let names: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();

    rows.filter(|row| row.iter().any(|cell| !is_blank(cell)))
        .map(|row| {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row
                        .get(i)
                        .filter(|cell| !is_blank(cell))
                        .map(|cell| cell.to_string());
                    (name.clone(), value)
                })
                .collect::<Record>()
        })
        .collect()
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
