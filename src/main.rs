use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use yt_analytics_report::args::default_filename;
use yt_analytics_report::config::{DATE_FORMAT, EARLIEST_DATE, INSECURE_TRANSPORT_VAR, METRICS};
use yt_analytics_report::{AppConfig, AuthFlow, InteractiveProvider, ReportArgs, run};

/// YouTube Analytics Report - Saves a daily analytics report for your channel as JSON or CSV
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    after_help = "You need a Google Developers project with the YouTube Analytics API enabled \
                  to run this. Download its OAuth client secret to the data directory as \
                  'secrets.json'."
)]
struct Args {
    /// The filename for the report; the extension (.json or .csv) picks the format
    #[arg(short, long, default_value_t = default_filename(Local::now().naive_local()))]
    filename: String,

    /// The start date for the report in YYYY-MM-DD format
    #[arg(short, long, default_value = EARLIEST_DATE)]
    start_date: String,

    /// The end date for the report in YYYY-MM-DD format
    #[arg(short, long, default_value_t = today().format(DATE_FORMAT).to_string())]
    end_date: String,

    /// A comma-separated list of metrics to request (default: all supported metrics)
    #[arg(short, long, default_value_t = METRICS.join(","), hide_default_value = true)]
    metrics: String,

    /// How to complete the OAuth consent
    #[arg(long, value_enum, default_value_t = AuthFlow::Console)]
    auth_flow: AuthFlow,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn main() {
    // SAFETY: no other threads exist yet; the runtime is built below.
    unsafe {
        std::env::set_var(INSECURE_TRANSPORT_VAR, "1");
    }

    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    let provider = InteractiveProvider::new(&config, args.auth_flow);
    let report_args = ReportArgs {
        filename: args.filename,
        start_date: args.start_date,
        end_date: args.end_date,
        metrics: args.metrics,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    match runtime.block_on(run(&config, &report_args, today(), &provider)) {
        Ok(target) => eprintln!("Report saved to: {}", target.path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_cover_full_history_and_every_metric() {
        let args = Args::try_parse_from(["yt-analytics-report"]).unwrap();

        assert!(args.filename.starts_with("analytics-"));
        assert!(args.filename.ends_with(".csv"));
        assert_eq!(args.filename.len(), "analytics-2020-01-01-00-00-00.csv".len());
        assert_eq!(args.start_date, "2005-02-14");
        assert_eq!(args.end_date, today().format("%Y-%m-%d").to_string());
        assert_eq!(args.metrics, METRICS.join(","));
        assert_eq!(args.metrics.split(',').count(), 35);
        assert_eq!(args.auth_flow, AuthFlow::Console);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn short_flags() {
        let args = Args::try_parse_from([
            "yt-analytics-report",
            "-f",
            "report.json",
            "-s",
            "2020-01-01",
            "-e",
            "2020-01-02",
            "-m",
            "views,likes",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.filename, "report.json");
        assert_eq!(args.start_date, "2020-01-01");
        assert_eq!(args.end_date, "2020-01-02");
        assert_eq!(args.metrics, "views,likes");
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn long_flags() {
        let args = Args::try_parse_from([
            "yt-analytics-report",
            "--filename",
            "report.csv",
            "--start-date",
            "2021-05-01",
            "--end-date",
            "2021-05-31",
            "--metrics",
            "views",
            "--auth-flow",
            "loopback",
        ])
        .unwrap();

        assert_eq!(args.filename, "report.csv");
        assert_eq!(args.start_date, "2021-05-01");
        assert_eq!(args.end_date, "2021-05-31");
        assert_eq!(args.metrics, "views");
        assert_eq!(args.auth_flow, AuthFlow::Loopback);
    }

    #[test]
    fn unknown_auth_flow_is_rejected() {
        let err =
            Args::try_parse_from(["yt-analytics-report", "--auth-flow", "bogus"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
