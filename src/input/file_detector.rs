//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pickle,
    Json,
    Csv,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pkl" | "pickle" => FileType::Pickle,
            "json" => FileType::Json,
            "csv" => FileType::Csv,
            _ => FileType::Unknown,
        }
    }

    /// Detect the type from the substring after the last `.` of the file name.
    /// Files without an extension are `Unknown`.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Pickle => write!(f, "pickle"),
            FileType::Json => write!(f, "json"),
            FileType::Csv => write!(f, "csv"),
            FileType::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(FileType::from_extension("PKL"), FileType::Pickle);
        assert_eq!(FileType::from_extension("Json"), FileType::Json);
        assert_eq!(FileType::from_extension("CSV"), FileType::Csv);
        assert_eq!(FileType::from_extension("xml"), FileType::Unknown);
    }

    #[test]
    fn test_only_last_extension_counts() {
        assert_eq!(FileType::from_path(Path::new("tokens.csv.json")), FileType::Json);
        assert_eq!(FileType::from_path(Path::new("archive.json.gz")), FileType::Unknown);
        assert_eq!(FileType::from_path(Path::new("data/tokens")), FileType::Unknown);
    }
}
