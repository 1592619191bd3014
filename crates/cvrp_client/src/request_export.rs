use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use cvrp_core::state::store::Store;
use thiserror::Error;
use tracing::info;

use crate::{
    request_formatter::format_request,
    solver_api::{CvrpRequest, RequestFormat},
};

pub const NO_EXPORT_DATA_NOTICE: &str = "No data to export. Please add customers first.";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("{}", NO_EXPORT_DATA_NOTICE)]
    NoCustomers,
}

pub fn export_file_name(timestamp: jiff::Timestamp) -> String {
    format!("cvrp-request-{}.json", timestamp.as_millisecond())
}

/// Writes `request` as pretty JSON into `dir`, named after the current time.
pub fn export_request(request: &CvrpRequest, dir: &Path) -> Result<PathBuf, ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }
    std::fs::create_dir_all(dir)?;

    let path = dir.join(export_file_name(jiff::Timestamp::now()));
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, request)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!("Exported {} request to {}", request.format(), path.display());

    Ok(path)
}

/// Exports the store's current problem with its full fleet.
pub fn export_current(
    store: &Store,
    dir: &Path,
    format: RequestFormat,
) -> Result<PathBuf, ExportError> {
    let state = store.snapshot();
    if state.customers().is_empty() {
        return Err(ExportError::NoCustomers);
    }

    let request = format_request(
        format,
        state.customers(),
        Some(state.vehicles()),
        state.depot(),
    );

    export_request(&request, dir)
}

#[cfg(test)]
mod tests {
    use cvrp_core::state::action::Action;

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "cvrp-export-{}-{}",
            name,
            jiff::Timestamp::now().as_nanosecond()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_export_file_name() {
        let timestamp = jiff::Timestamp::from_millisecond(1_717_000_000_123).unwrap();

        assert_eq!(
            export_file_name(timestamp),
            "cvrp-request-1717000000123.json"
        );
    }

    #[test]
    fn test_export_current() {
        let store = Store::default();
        store.dispatch(Action::AddCustomer { x: 10.0, y: 10.0 }).unwrap();
        let dir = temp_dir("current");

        let path = export_current(&store, &dir, RequestFormat::Extended).unwrap();
        let content: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("cvrp-request-")
        );
        assert_eq!(content["customers"][0]["id"], "1");
        assert_eq!(content["vehicles"].as_array().unwrap().len(), 2);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_export_without_customers() {
        let dir = temp_dir("empty");

        let result = export_current(&Store::default(), &dir, RequestFormat::Compact);

        assert!(matches!(result, Err(ExportError::NoCustomers)));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_export_into_file_path() {
        let dir = temp_dir("file");
        let file = dir.join("taken.json");
        std::fs::write(&file, "{}").unwrap();

        let request = format_request(RequestFormat::Compact, &[], None, &Default::default());

        assert!(matches!(
            export_request(&request, &file),
            Err(ExportError::NotADirectory(_))
        ));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
