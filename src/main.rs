use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use log::error;

use devheader::Config;

fn cli() -> Command {
    Command::new("devheader")
        .about("Generate userspace driver device headers from a JSON layout file")
        .arg(
            Arg::new("outdir")
                .help("Directory receiving the generated headers")
                .required(true)
                .value_name("OUTDIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("input")
                .help("JSON layout file")
                .required(true)
                .value_name("FILENAME.json")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log_level")
                .long("log")
                .short('l')
                .help(format!(
                    "Choose which messages to log (overrides {})",
                    env_logger::DEFAULT_FILTER_ENV
                ))
                .value_name("LEVEL")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"]),
        )
        .version(env!("CARGO_PKG_VERSION"))
}

fn config_from(matches: &ArgMatches) -> Result<Config> {
    let output_dir = matches
        .get_one::<PathBuf>("outdir")
        .context("missing output directory")?;
    let input = matches
        .get_one::<PathBuf>("input")
        .context("missing layout file")?;
    let mut config = Config::new(output_dir.clone(), input.clone());
    config.log_level = matches.get_one::<String>("log_level").cloned();
    Ok(config)
}

fn run(config: &Config) -> Result<()> {
    devheader::generate(config)?;
    Ok(())
}

fn setup_logging(log_level: Option<&str>) {
    // * Log at info by default.
    // * `RUST_LOG` takes complex filters and wins when set.
    // * Otherwise `--log` picks the level.
    let env = env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info");
    let mut builder = env_logger::Builder::from_env(env);
    builder.format_timestamp(None);

    let log_lvl_from_env = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();

    if log_lvl_from_env {
        log::set_max_level(log::LevelFilter::Trace);
    } else {
        let level = log_level
            .and_then(|lvl| lvl.parse().ok())
            .unwrap_or(log::LevelFilter::Info);
        log::set_max_level(level);
        builder.filter_level(level);
    }

    builder.init();
}

fn main() {
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        // usage errors exit with 1, help and version go through clap
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let config = match config_from(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    setup_logging(config.log_level.as_deref());

    if let Err(ref e) = run(&config) {
        error!("{}", e);

        for e in e.chain().skip(1) {
            error!("caused by: {}", e);
        }

        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn takes_outdir_then_layout() {
        let matches = cli()
            .try_get_matches_from(["devheader", "generated", "layout.json"])
            .unwrap();
        let config = config_from(&matches).unwrap();
        assert_eq!(config.output_dir(), Path::new("generated"));
        assert_eq!(config.input(), Path::new("layout.json"));
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn wrong_argument_count_is_a_usage_error() {
        for args in [
            &["devheader"][..],
            &["devheader", "generated"],
            &["devheader", "generated", "layout.json", "extra"],
        ] {
            let err = cli().try_get_matches_from(args.iter().copied()).unwrap_err();
            assert!(err.use_stderr(), "{args:?}");
        }
    }

    #[test]
    fn log_level_flag() {
        let matches = cli()
            .try_get_matches_from(["devheader", "--log", "debug", "out", "layout.json"])
            .unwrap();
        assert_eq!(config_from(&matches).unwrap().log_level.as_deref(), Some("debug"));

        assert!(cli()
            .try_get_matches_from(["devheader", "-l", "loud", "out", "layout.json"])
            .is_err());
    }

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }
}
