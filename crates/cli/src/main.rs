use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use ramble_language::{ApplicationLibrary, LanguageConfig, config::default_config_path};
use ramble_types::PhaseGraph;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let matches = build_cli().get_matches();
    let config = LanguageConfig::load();
    debug!(pipelines = ?config.default_pipelines, "loaded language config");

    match matches.subcommand() {
        Some(("list", sub)) => run_list(sub, &config),
        Some(("show", sub)) => run_show(sub, &config),
        Some(("phases", sub)) => run_phases(sub, &config),
        Some(("config", _)) => run_config(&config),
        _ => bail!("expected a subcommand; see `ramble --help`"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_cli() -> Command {
    let from = Arg::new("from")
        .long("from")
        .short('f')
        .required(true)
        .num_args(1..)
        .action(ArgAction::Append)
        .value_parser(value_parser!(PathBuf))
        .help("Application definition files or directories");
    let application = Arg::new("application").required(true).help("Application name");

    Command::new("ramble")
        .about("Inspect directive-based application definitions")
        .subcommand_required(true)
        .subcommand(
            Command::new("list").about("List applications and their bases").arg(
                Arg::new("paths")
                    .required(true)
                    .num_args(1..)
                    .value_parser(value_parser!(PathBuf))
                    .help("Application definition files or directories"),
            ),
        )
        .subcommand(
            Command::new("show")
                .about("Compose an application and print its model")
                .arg(application.clone())
                .arg(from.clone())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["json", "yaml"])
                        .default_value("yaml")
                        .help("Output format"),
                ),
        )
        .subcommand(
            Command::new("phases")
                .about("Print an application's phase dependencies")
                .arg(application)
                .arg(from)
                .arg(Arg::new("pipeline").long("pipeline").short('p').help("Only show this pipeline")),
        )
        .subcommand(Command::new("config").about("Show the effective configuration and its location"))
}

fn load_library(paths: Vec<PathBuf>, config: &LanguageConfig) -> Result<ApplicationLibrary> {
    ApplicationLibrary::load_paths(&paths, config).context("failed to load application definitions")
}

fn paths(matches: &ArgMatches, id: &str) -> Vec<PathBuf> {
    matches.get_many::<PathBuf>(id).map(|values| values.cloned().collect()).unwrap_or_default()
}

fn run_list(matches: &ArgMatches, config: &LanguageConfig) -> Result<()> {
    let library = load_library(paths(matches, "paths"), config)?;
    for class in library.classes() {
        let bases: Vec<&str> = class.bases().iter().map(|base| base.name()).collect();
        if bases.is_empty() {
            println!("{}", class.name());
        } else {
            println!("{} ({})", class.name(), bases.join(", "));
        }
    }
    Ok(())
}

fn run_show(matches: &ArgMatches, config: &LanguageConfig) -> Result<()> {
    let library = load_library(paths(matches, "from"), config)?;
    let name = matches.get_one::<String>("application").context("missing application name")?;
    let application = library.instantiate(name)?;

    let rendered = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => serde_json::to_string_pretty(application.model())?,
        _ => serde_yaml::to_string(application.model())?,
    };
    println!("{rendered}");
    Ok(())
}

fn run_phases(matches: &ArgMatches, config: &LanguageConfig) -> Result<()> {
    let library = load_library(paths(matches, "from"), config)?;
    let name = matches.get_one::<String>("application").context("missing application name")?;
    let application = library.instantiate(name)?;
    let graph = &application.model().phase_definitions;

    match matches.get_one::<String>("pipeline") {
        Some(pipeline) => {
            if !application.recognized_pipelines().contains(pipeline) {
                bail!("application {name} does not recognize pipeline \"{pipeline}\"");
            }
            print!("{}", render_pipeline(graph, pipeline));
        }
        None => {
            for pipeline in graph.pipelines() {
                print!("{}", render_pipeline(graph, pipeline));
            }
        }
    }
    Ok(())
}

fn run_config(config: &LanguageConfig) -> Result<()> {
    println!("# {}", default_config_path().display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// One line per phase, `phase <- dependency, ...`, under the pipeline name.
fn render_pipeline(graph: &PhaseGraph, pipeline: &str) -> String {
    let mut out = format!("{pipeline}\n");
    let Some(phases) = graph.phases(pipeline) else {
        return out;
    };
    for (phase, dependencies) in phases {
        if dependencies.is_empty() {
            out.push_str(&format!("  {phase}\n"));
        } else {
            let joined: Vec<&str> = dependencies.iter().map(String::as_str).collect();
            out.push_str(&format!("  {phase} <- {}\n", joined.join(", ")));
        }
    }
    out
}
