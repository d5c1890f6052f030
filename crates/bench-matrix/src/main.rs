use anyhow::Context;
use bench_matrix::dispatch::dump_catalog;
use bench_matrix::exec::ProcessRunner;
use bench_matrix::scm::GitCli;
use bench_matrix::{Dispatcher, Registry, RunPolicy, Selection, DEFAULT_DRIVER};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("bench-matrix")
        .version("0.1.0")
        .about("Benchmark-matrix orchestrator for memory-model variant comparisons")
        .arg(
            Arg::new("test")
                .long("test")
                .action(ArgAction::Append)
                .help("Catalog entry to run (repeatable; default: all)"),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .action(ArgAction::Append)
                .help("Variant group contributing binaries (repeatable)"),
        )
        .arg(
            Arg::new("subtest")
                .long("subtest")
                .action(ArgAction::Append)
                .help("Restrict which subtests run (repeatable; default: all)"),
        )
        .arg(
            Arg::new("branch")
                .long("branch")
                .action(ArgAction::Append)
                .help("Run the whole selection once per named branch (repeatable)"),
        )
        .arg(
            Arg::new("bare_group")
                .long("bare_group")
                .action(ArgAction::Append)
                .help("Extra groups run once on the current checkout, independent of --branch"),
        )
        .arg(
            Arg::new("scale")
                .long("scale")
                .default_value("1.0")
                .value_parser(value_parser!(f64))
                .help("Multiplier applied to each entry's base run count before ceiling"),
        )
        .arg(
            Arg::new("rebuild")
                .long("rebuild")
                .action(ArgAction::SetTrue)
                .help("Rebuild after each branch checkout before running"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Dump the resolved catalog for the selected entries"),
        )
}

fn values(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|vs| vs.cloned().collect())
        .unwrap_or_default()
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let selection = Selection {
        tests: values(matches, "test"),
        groups: values(matches, "group"),
        subtests: values(matches, "subtest"),
        branches: values(matches, "branch"),
        bare_groups: values(matches, "bare_group"),
        scale: *matches.get_one::<f64>("scale").unwrap_or(&1.0),
    };

    let registry = Registry::builtin();
    let tools = ProcessRunner::new();
    let scm = GitCli::new(&tools);
    let policy = RunPolicy {
        rebuild: matches.get_flag("rebuild"),
        ..RunPolicy::default()
    };
    let dispatcher = Dispatcher::new(&registry, &scm, &tools, policy, DEFAULT_DRIVER);

    if matches.get_flag("debug") {
        let entries = dispatcher.selected_entries(&selection)?;
        let dump = dump_catalog(&entries).context("serializing catalog dump")?;
        println!("{dump}");
    }

    dispatcher.run(&selection)?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = cli().get_matches();
    if let Err(e) = run(&matches) {
        eprintln!("bench-matrix: {e:#}");
        std::process::exit(1);
    }
}
