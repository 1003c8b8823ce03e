use crate::error::{AppError, AppResult};
use crate::models::Record;

/// 解析 CSV 文本：首行为字段名，空单元格视为空值，缺失单元格视为缺失
pub fn parse_csv_records(content: &str, source: &str) -> AppResult<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::file_read_failed(source, e))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| AppError::file_read_failed(source, e))?;
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), row.get(i).map(str::to_string)))
            .collect();
        records.push(record);
    }

    Ok(records)
}
