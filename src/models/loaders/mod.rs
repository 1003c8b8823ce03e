pub mod csv_loader;
pub mod excel_loader;
pub mod json_loader;

pub use csv_loader::parse_csv_records;
pub use excel_loader::read_excel_records;
pub use json_loader::parse_json_records;

use crate::error::{AppError, AppResult, FileError};
use crate::models::Record;
use std::path::Path;
use tokio::{fs, task};
use tracing::info;

/// 按扩展名加载记录文件（`.csv` / `.json` / `.xlsx` / `.xls` / `.xlsm`）
pub async fn load_records(path: &Path) -> AppResult<Vec<Record>> {
    let path_str = path.display().to_string();

    if !path.exists() {
        return Err(FileError::NotFound { path: path_str }.into());
    }

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);

    let records = match extension.as_deref() {
        Some("csv") => parse_csv_records(&read_text(path).await?, &path_str)?,
        Some("json") => parse_json_records(&read_text(path).await?, &path_str)?,
        Some("xlsx" | "xls" | "xlsm") => {
            let owned = path.to_path_buf();
            task::spawn_blocking(move || read_excel_records(&owned))
                .await
                .map_err(|e| AppError::file_read_failed(&path_str, e))??
        }
        _ => return Err(FileError::UnsupportedFormat { path: path_str }.into()),
    };

    info!("成功加载 {} 条记录: {}", records.len(), path_str);

    Ok(records)
}

async fn read_text(path: &Path) -> AppResult<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_csv_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "title,applicant\nWidget,ACME").unwrap();

        let records = load_records(file.path()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields()[0].name, "title");
    }

    #[tokio::test]
    async fn rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = load_records(file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::UnsupportedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn spreadsheet_extensions_go_to_workbook_reader() {
        let mut file = tempfile::Builder::new().suffix(".XLSX").tempfile().unwrap();
        file.write_all(b"plain text").unwrap();

        let err = load_records(file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::MalformedRecords { .. })
        ));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = load_records(Path::new("/definitely/not/here.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }
}
