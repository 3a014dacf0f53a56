use serde::{Deserialize, Serialize};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook with a single sheet.
    #[default]
    #[serde(rename = "xlsx")]
    Workbook,
    /// Comma-separated values.
    Csv,
}

impl OutputFormat {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Workbook => "Excel workbook",
            Self::Csv => "CSV",
        }
    }

    /// Get file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Workbook => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// File name used when the caller does not choose one.
pub fn default_file_name(format: OutputFormat) -> String {
    format!("mapped_output.{}", format.extension())
}
