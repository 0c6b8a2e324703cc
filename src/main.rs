use chrono::Local;
use financial_report::args::Args;
use financial_report::config::ReportConfig;
use log::error;
use std::process;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = ReportConfig::from_args(&args, Local::now().naive_local());

    if let Err(err) = financial_report::run(&config) {
        error!("failed to generate report: {}", err);
        process::exit(1);
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u64, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}
