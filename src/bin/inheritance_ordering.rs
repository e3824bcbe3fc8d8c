use clap::{Arg, ArgMatches, Command};
use env_logger::Env;
use inheritance_ordering::{
    analyze_with_config,
    report::{render, CONSISTENT_MESSAGE},
    AnalysisResult, AnalyzerConfig, CompilerOutputArtifact, ExcludePatterns,
};
use log::{debug, info};
use serde::Serialize;

const EXIT_CONFLICT: i32 = 1;
const EXIT_BAD_ARTIFACT: i32 = 2;

#[derive(Serialize)]
struct ArtifactReport<'a> {
    artifact: &'a str,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

fn main() {
    let matches = Command::new("inheritance_ordering")
        .version("0.1.0")
        .about("Detect contradictory inheritance orders in solc compiler output")
        .arg(
            Arg::new("artifacts")
                .help("Compiler output or Hardhat build-info json files")
                .value_name("ARTIFACT")
                .takes_value(true)
                .multiple_values(true)
                .required(true),
        )
        .arg(
            Arg::new("exclude")
                .help("Additional source path prefix to leave out of the analysis")
                .long("exclude")
                .value_name("PREFIX")
                .takes_value(true)
                .multiple_occurrences(true),
        )
        .arg(
            Arg::new("no-default-excludes")
                .help("Do not exclude contracts-exposed/ and contracts/mocks/")
                .long("no-default-excludes"),
        )
        .arg(
            Arg::new("long-cycles")
                .help("Also report ordering cycles of three or more contracts")
                .long("long-cycles"),
        )
        .arg(
            Arg::new("format")
                .help("Output format")
                .long("format")
                .takes_value(true)
                .possible_values(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("verbose")
                .help("Enable debug logging")
                .short('v')
                .long("verbose"),
        )
        .get_matches();

    let level = if matches.is_present("verbose") {
        "debug"
    } else {
        "warn"
    };
    env_logger::init_from_env(Env::default().default_filter_or(level));

    std::process::exit(run(&matches));
}

fn analyzer_config(matches: &ArgMatches) -> AnalyzerConfig {
    let mut exclude = if matches.is_present("no-default-excludes") {
        ExcludePatterns::none()
    } else {
        ExcludePatterns::default()
    };
    if let Some(prefixes) = matches.values_of("exclude") {
        for prefix in prefixes {
            exclude = exclude.with(prefix);
        }
    }

    AnalyzerConfig {
        exclude,
        long_cycles: matches.is_present("long-cycles"),
    }
}

fn run(matches: &ArgMatches) -> i32 {
    let config = analyzer_config(matches);
    let json = matches.value_of("format") == Some("json");
    debug!("excluding {:?}", config.exclude.iter().collect::<Vec<_>>());

    let mut exit_code = 0;
    for path in matches.values_of("artifacts").into_iter().flatten() {
        // load and parse the artifact, any failure aborts the run
        let artifact = match CompilerOutputArtifact::load(path) {
            Ok(artifact) => artifact,
            Err(err) => {
                eprintln!("{}: {}", path, err);
                return EXIT_BAD_ARTIFACT;
            }
        };
        info!("{}: {} contract definition(s)", path, artifact.contract_count());

        let result = analyze_with_config(std::slice::from_ref(&artifact), &config);
        if result.has_conflicts {
            exit_code = EXIT_CONFLICT;
        }

        if json {
            let report = ArtifactReport {
                artifact: path,
                result: &result,
            };
            match serde_json::to_string_pretty(&report) {
                Ok(out) => println!("{}", out),
                Err(err) => {
                    eprintln!("{}: {}", path, err);
                    return EXIT_BAD_ARTIFACT;
                }
            }
        } else if result.has_conflicts {
            println!("{}:", path);
            println!("{}", render(&result));
        }
    }

    if exit_code == 0 && !json {
        println!("{}", CONSISTENT_MESSAGE);
    }
    exit_code
}
