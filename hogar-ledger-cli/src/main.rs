#![warn(clippy::uninlined_format_args)]

mod report_json;

use hogar_ledger_application::BalanceService;
use hogar_ledger_domain::MemberId;
use hogar_ledger_infrastructure::{load_snapshot, settings_from_env};
use hogar_ledger_presentation::BalancePresenter;
use report_json::ReportJson;
use std::{borrow::Cow, env, process};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Cow<'static, str>>;

const USAGE: &str = "Usage: hogar-ledger <snapshot.json> [--viewer <member-id>] [--json]";

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    path: String,
    viewer: Option<String>,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let args = parse_args(env::args().skip(1))?;
    let settings = settings_from_env().map_err(|err| format!("Invalid configuration: {err}"))?;
    let loaded = load_snapshot(&args.path).map_err(|err| err.to_string())?;
    let viewer = args.viewer.map_or(loaded.viewer, MemberId::new);

    tracing::info!(
        path = %args.path,
        viewer = %viewer,
        tolerance = %settings.tolerance,
        "Computing balances"
    );

    let service = BalanceService::new(settings);
    let report = service.compute_balances(&loaded.snapshot, &viewer);
    let directory = loaded.snapshot.display_names();

    if args.json {
        let json = ReportJson::new(&report, &directory).with_skipped_rows(&loaded.warnings);
        let output = serde_json::to_string_pretty(&json)
            .map_err(|err| format!("Failed to serialize report: {err}"))?;
        println!("{output}");
    } else {
        print!("{}", BalancePresenter::render(&report, &directory));
        print!("{}", BalancePresenter::render_skipped_rows(&loaded.warnings));
    }

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> CliResult<CliArgs> {
    let mut path = None;
    let mut viewer = None;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--viewer" => {
                let Some(id) = args.next() else {
                    return Err("--viewer needs a member id".into());
                };
                viewer = Some(id);
            }
            "-h" | "--help" => return Err(USAGE.into()),
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{flag}'\n{USAGE}").into());
            }
            _ if path.is_none() => path = Some(arg.clone()),
            _ => return Err(USAGE.into()),
        }
    }

    let Some(path) = path else {
        return Err(USAGE.into());
    };
    Ok(CliArgs { path, viewer, json })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> + use<> {
        raw.iter()
            .map(|arg| (*arg).to_owned())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[rstest]
    #[case::path_only(&["snapshot.json"], None, false)]
    #[case::json(&["snapshot.json", "--json"], None, true)]
    #[case::viewer_first(&["--viewer", "abc", "snapshot.json"], Some("abc"), false)]
    fn parses_arguments(
        #[case] raw: &[&str],
        #[case] viewer: Option<&str>,
        #[case] json: bool,
    ) {
        let parsed = parse_args(args(raw)).expect("valid arguments");
        assert_eq!(
            parsed,
            CliArgs {
                path: "snapshot.json".to_owned(),
                viewer: viewer.map(str::to_owned),
                json,
            }
        );
    }

    #[rstest]
    #[case::missing_path(&[])]
    #[case::dangling_viewer(&["snapshot.json", "--viewer"])]
    #[case::unknown_flag(&["snapshot.json", "--csv"])]
    #[case::two_paths(&["a.json", "b.json"])]
    fn rejects_bad_arguments(#[case] raw: &[&str]) {
        assert!(parse_args(args(raw)).is_err());
    }
}
