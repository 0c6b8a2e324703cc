use crate::args::Args;
use chrono::NaiveDateTime;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "data/sample_data.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

/// Everything a single report run needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub output: PathBuf,

    /// Stamped into the report body and, by default, its file name.
    pub generated_at: NaiveDateTime,
}

impl ReportConfig {
    /// Uses the default input path and a timestamped file in the default
    /// output directory.
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT_DIR).join(report_file_name(generated_at)),
            generated_at,
        }
    }

    /// Resolves command line arguments, falling back to the defaults for
    /// anything left unspecified. An explicit output path wins over an
    /// output directory.
    pub fn from_args(args: &Args, generated_at: NaiveDateTime) -> Self {
        let mut config = Self::new(generated_at);

        if let Some(input) = &args.input {
            config.input = PathBuf::from(input);
        }

        match (&args.output, &args.output_dir) {
            (Some(output), _) => config.output = PathBuf::from(output),
            (None, Some(dir)) => {
                config.output = PathBuf::from(dir).join(report_file_name(generated_at))
            }
            (None, None) => {}
        }

        config
    }
}

/// `report_<YYYYmmdd>_<HHMMSS>.pdf`
pub fn report_file_name(generated_at: NaiveDateTime) -> String {
    format!("report_{}.pdf", generated_at.format("%Y%m%d_%H%M%S"))
}
