use std::io::{self, BufRead, BufWriter};
use std::process;

use clap::{App, Arg, ArgMatches, SubCommand};

use config::Config;
use emitter::{FinalLineEmitter, IntermediateLineEmitter};
use errors::*;
use io::open_shard;
use job::Job;
use mapper::{run_map, Map};
use pipeline::run_pipeline;
use policy::Policy;
use reducer::run_reduce;
use stats::log_summary;
use util;

fn build_app<'a, 'b>(name: &str) -> App<'a, 'b> {
    App::new(name.to_owned())
        .version(crate_version!())
        .about("Aggregates taxi trip records with map, sort and reduce")
        .subcommand(
            SubCommand::with_name("map")
                .about("Reads raw trip records on stdin and writes key-value lines to stdout"),
        )
        .subcommand(
            SubCommand::with_name("reduce")
                .about("Reads key-sorted key-value lines on stdin and writes one line per key"),
        )
        .subcommand(
            SubCommand::with_name("pipeline")
                .about("Maps, sorts and reduces the given files (or stdin) in one process")
                .arg(
                    Arg::with_name("input")
                        .help("Input shards, mapped in parallel")
                        .multiple(true),
                ),
        )
        .subcommand(SubCommand::with_name("sanity-check"))
}

/// `parse_command_line` uses `clap` to parse the command-line arguments passed to the payload.
///
/// The output of this function is required by the `run` function, to decide what subcommand to
/// run.
pub fn parse_command_line<'a>(name: &str) -> ArgMatches<'a> {
    build_app(name).get_matches()
}

/// `run` begins the primary operations of the payload, and delegates to sub-functions.
///
/// # Arguments
///
/// `matches` - The output of the `parse_command_line` function.
/// `job` - The mapper and policy built with a `JobBuilder`.
pub fn run<M, P>(matches: &ArgMatches, job: &Job<M, P>) -> Result<()>
where
    M: Map + Sync,
    P: Policy<Value = M::Value> + Sync,
    M::Value: Send,
    P::Value: Send,
    P::Accumulator: Send,
{
    match matches.subcommand() {
        ("map", _) => run_map_command(job),
        ("reduce", _) => run_reduce_command(job, &read_config()?),
        ("pipeline", Some(sub)) => run_pipeline_command(job, &read_config()?, sub),
        ("sanity-check", _) => {
            run_sanity_check();
            Ok(())
        }
        _ => {
            eprintln!("{}", matches.usage());
            Ok(())
        }
    }
}

/// Runs a payload: initialises logging, calls `run_fn` and exits with status 1 if it failed.
pub fn execute<F>(run_fn: F)
where
    F: FnOnce() -> Result<()>,
{
    if let Err(err) = util::init_logger() {
        eprintln!("Error initialising logging: {}", err);
        process::exit(1);
    }

    if let Err(ref err) = run_fn() {
        util::output_error(err);
        process::exit(1);
    }
}

// Only the commands that use the environment knobs read them.
fn read_config() -> Result<Config> {
    Config::from_env().chain_err(|| "Error reading configuration.")
}

fn run_map_command<M, P>(job: &Job<M, P>) -> Result<()>
where
    M: Map,
    P: Policy<Value = M::Value>,
{
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut sink = BufWriter::new(stdout.lock());

    let stats = run_map(
        job.mapper,
        &job.parser,
        stdin.lock(),
        IntermediateLineEmitter::new(&mut sink),
    ).chain_err(|| "Error running map operation.")?;

    log_summary("map", &stats);
    Ok(())
}

fn run_reduce_command<M, P>(job: &Job<M, P>, config: &Config) -> Result<()>
where
    M: Map,
    P: Policy<Value = M::Value>,
{
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut sink = BufWriter::new(stdout.lock());

    let stats = run_reduce(
        job.policy,
        config.order_check,
        stdin.lock(),
        FinalLineEmitter::new(job.policy, &mut sink),
    ).chain_err(|| "Error running reduce operation.")?;

    log_summary("reduce", &stats);
    Ok(())
}

fn run_pipeline_command<M, P>(job: &Job<M, P>, config: &Config, matches: &ArgMatches) -> Result<()>
where
    M: Map + Sync,
    P: Policy<Value = M::Value> + Sync,
    M::Value: Send,
    P::Value: Send,
    P::Accumulator: Send,
{
    let mut shards: Vec<Box<dyn BufRead + Send>> = Vec::new();
    match matches.values_of("input") {
        Some(paths) => {
            for path in paths {
                shards.push(Box::new(open_shard(path)?));
            }
        }
        None => shards.push(Box::new(io::BufReader::new(io::stdin()))),
    }

    let stdout = io::stdout();
    let mut sink = BufWriter::new(stdout.lock());

    let stats = run_pipeline(
        job,
        shards,
        config.reduce_partitions,
        config.order_check,
        FinalLineEmitter::new(job.policy, &mut sink),
    ).chain_err(|| "Error running pipeline.")?;

    match stats.to_json() {
        Ok(json) => info!("pipeline finished: {}", json),
        Err(err) => warn!("pipeline finished, stats unavailable: {}", err),
    }
    Ok(())
}

fn run_sanity_check() {
    println!("sanity located");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommands_take_no_flags() {
        let app = build_app("fare-per-day");

        let matches = app.get_matches_from_safe(vec!["fare-per-day", "map"]).unwrap();
        assert_eq!(Some("map"), matches.subcommand_name());

        let app = build_app("fare-per-day");
        assert!(app.get_matches_from_safe(vec!["fare-per-day", "reduce", "--sorted"]).is_err());
    }

    #[test]
    fn pipeline_takes_input_shards() {
        let matches = build_app("trips-per-payment")
            .get_matches_from_safe(vec!["trips-per-payment", "pipeline", "a.csv", "b.csv"])
            .unwrap();

        let sub = matches.subcommand_matches("pipeline").unwrap();
        let inputs: Vec<&str> = sub.values_of("input").unwrap().collect();
        assert_eq!(vec!["a.csv", "b.csv"], inputs);
    }
}
