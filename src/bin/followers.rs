//! Command-line interface for followers
//! Converts, filters, sorts and inspects follower documents.
//!
//! Usage:
//!   followers convert `<path>` [--to `<format>`] [--output `<file>`]       - Re-write a document
//!   followers tree `<path>` `<start-id>`                                 - Print the reference tree
//!   followers layout `<path>` `<start-id>`                               - Print box positions as JSON
//!   followers filter `<path>` --where `<field>=<text>`...                - Keep matching followers
//!   followers sort `<path>` --by `<field>` [--desc]                      - Sort by one field
//!   followers fields                                                 - List field names

use clap::{Arg, ArgAction, ArgMatches, Command};
use followers::config::{FollowersConfig, Loader};
use followers::graph::{layout, render_tree};
use followers::loader::DocumentLoader;
use followers::query::{Filter, SortOrder};
use followers::{Field, Follower, FollowerSet};
use std::fmt::Display;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let matches = Command::new("followers")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for reading, converting and walking follower documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("matcher")
                .long("matcher")
                .global(true)
                .value_parser(["pattern", "grammar"])
                .help("Record matcher to use"),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .global(true)
                .value_parser(clap::value_parser!(u32).range(1..))
                .help("Number of ingestion workers"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .help("Log filter when RUST_LOG is not set (e.g., 'info', 'followers=debug')"),
        )
        .subcommand(
            Command::new("convert")
                .about("Re-write a document in another format")
                .arg(path_arg())
                .args(output_args()),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the reference tree reachable from a follower")
                .arg(path_arg())
                .arg(start_arg()),
        )
        .subcommand(
            Command::new("layout")
                .about("Print the box layout of the reference tree as JSON")
                .arg(path_arg())
                .arg(start_arg()),
        )
        .subcommand(
            Command::new("filter")
                .about("Keep followers whose fields contain the given text")
                .arg(path_arg())
                .arg(
                    Arg::new("where")
                        .long("where")
                        .short('w')
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Criterion 'field=text'; may be repeated"),
                )
                .args(output_args()),
        )
        .subcommand(
            Command::new("sort")
                .about("Sort followers by one field")
                .arg(path_arg())
                .arg(
                    Arg::new("by")
                        .long("by")
                        .short('b')
                        .required(true)
                        .help("Field to sort by"),
                )
                .arg(
                    Arg::new("desc")
                        .long("desc")
                        .help("Sort in descending order")
                        .action(ArgAction::SetTrue),
                )
                .args(output_args()),
        )
        .subcommand(Command::new("fields").about("List the field names of a follower"))
        .get_matches();

    init_logging(matches.get_one::<String>("log-level").unwrap());

    let config = load_config(&matches).unwrap_or_else(|e| fail("Configuration error", e));
    let loader = DocumentLoader::from_config(&config);

    match matches.subcommand() {
        Some(("convert", sub)) => {
            let set = load(&loader, sub).await;
            emit(&loader, &set, sub);
        }
        Some(("tree", sub)) => {
            let set = load(&loader, sub).await;
            let start = sub.get_one::<String>("start").unwrap();
            match render_tree(&set, start) {
                Some(tree) => print!("{}", tree),
                None => not_found(start),
            }
        }
        Some(("layout", sub)) => {
            let set = load(&loader, sub).await;
            let start = sub.get_one::<String>("start").unwrap();
            let Some(placed) = layout(&set, start, &config.layout) else {
                not_found(start)
            };
            let json = serde_json::to_string_pretty(&placed)
                .unwrap_or_else(|e| fail("Serialization error", e));
            println!("{}", json);
        }
        Some(("filter", sub)) => {
            let mut filter = Filter::new();
            for criterion in sub.get_many::<String>("where").unwrap() {
                filter = filter
                    .with_criterion(criterion)
                    .unwrap_or_else(|e| fail("Invalid filter", e));
            }
            let set = load(&loader, sub).await;
            emit(&loader, &set.filter(&filter), sub);
        }
        Some(("sort", sub)) => {
            let field: Field = sub
                .get_one::<String>("by")
                .unwrap()
                .parse()
                .unwrap_or_else(|e| fail("Invalid sort field", e));
            let order = if sub.get_flag("desc") {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            let set = load(&loader, sub).await;
            emit(&loader, &set.sorted_by(field, order), sub);
        }
        Some(("fields", _)) => {
            for name in Follower::list_fields() {
                println!("{}", name);
            }
        }
        _ => unreachable!(),
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the follower document")
        .required(true)
        .index(1)
}

fn start_arg() -> Arg {
    Arg::new("start")
        .help("Id of the follower to start from")
        .required(true)
        .index(2)
}

fn output_args() -> [Arg; 2] {
    [
        Arg::new("to")
            .long("to")
            .short('t')
            .help("Output format (e.g., 'elements', 'json', 'yaml')"),
        Arg::new("output")
            .long("output")
            .short('o')
            .help("Write to this file instead of stdout"),
    ]
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<FollowersConfig, followers::config::ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(matcher) = matches.get_one::<String>("matcher") {
        loader = loader.set_override("parse.matcher", matcher.as_str())?;
    }
    if let Some(workers) = matches.get_one::<u32>("workers") {
        loader = loader.set_override("ingest.workers", i64::from(*workers))?;
    }
    loader.build()
}

async fn load(loader: &DocumentLoader, sub: &ArgMatches) -> FollowerSet {
    let path = sub.get_one::<String>("path").unwrap();
    loader
        .load(path)
        .await
        .unwrap_or_else(|e| fail("Error reading document", e))
}

fn emit(loader: &DocumentLoader, set: &FollowerSet, sub: &ArgMatches) {
    let format = sub.get_one::<String>("to");
    match sub.get_one::<String>("output") {
        Some(path) => {
            let result = match format {
                Some(format) => loader.save_as(set, path, format),
                None => loader.save(set, path),
            };
            result.unwrap_or_else(|e| fail("Error writing document", e));
            eprintln!("Wrote {} followers to {}", set.len(), path);
        }
        None => {
            let result = match format {
                Some(format) => loader.render_as(set, format),
                None => loader.render(set),
            };
            let text = result.unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                eprintln!("Available formats:");
                let formats = loader.formats();
                for name in formats.list_formats() {
                    if let Ok(format) = formats.get(&name) {
                        eprintln!("  {:<10} {}", name, format.description());
                    }
                }
                std::process::exit(1);
            });
            print!("{}", text);
        }
    }
}

fn not_found(id: &str) -> ! {
    eprintln!("Follower '{}' not found", id);
    std::process::exit(1);
}

fn fail(context: &str, error: impl Display) -> ! {
    eprintln!("{}: {}", context, error);
    std::process::exit(1);
}
