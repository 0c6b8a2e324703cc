use clap::{App, Arg};
use std::ffi::OsString;

pub struct Args {
    pub input: Option<String>,
    pub output: Option<String>,
    pub output_dir: Option<String>,
    pub verbose: u64,
    pub quiet: bool,
}

impl Args {
    pub fn parse() -> Self {
        Self::parse_from(std::env::args_os())
    }

    pub fn parse_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = App::new("financial-report")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Summarizes monthly financial data into a PDF report")
            .arg(Arg::with_name("input")
                .short("i").long("input").takes_value(true).value_name("PATH")
                .help("path of CSV file to read from [default: data/sample_data.csv]"))
            .arg(Arg::with_name("output")
                .short("o").long("output").takes_value(true).value_name("PATH")
                .conflicts_with("output_dir")
                .help("path of the PDF report to write"))
            .arg(Arg::with_name("output_dir")
                .short("d").long("output-dir").takes_value(true).value_name("DIR")
                .help("directory to write a timestamped report into [default: reports]"))
            .arg(Arg::with_name("verbose")
                .short("v").long("verbose").multiple(true)
                .help("increase logging verbosity (-v debug, -vv trace)"))
            .arg(Arg::with_name("quiet")
                .short("q").long("quiet").conflicts_with("verbose")
                .help("only log errors"))
            .get_matches_from(args);

        Self {
            input: matches.value_of("input").map(String::from),
            output: matches.value_of("output").map(String::from),
            output_dir: matches.value_of("output_dir").map(String::from),
            verbose: matches.occurrences_of("verbose"),
            quiet: matches.is_present("quiet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_require_no_arguments() {
        let args = Args::parse_from(vec!["financial-report"]);
        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(args.output_dir.is_none());
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn should_parse_paths_and_verbosity() {
        let args = Args::parse_from(vec![
            "financial-report",
            "--input",
            "q1.csv",
            "-o",
            "out/q1.pdf",
            "-vv",
        ]);
        assert_eq!(args.input.as_deref(), Some("q1.csv"));
        assert_eq!(args.output.as_deref(), Some("out/q1.pdf"));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn should_parse_output_dir_and_quiet() {
        let args = Args::parse_from(vec!["financial-report", "-d", "archive", "-q"]);
        assert_eq!(args.output_dir.as_deref(), Some("archive"));
        assert!(args.quiet);
    }
}
