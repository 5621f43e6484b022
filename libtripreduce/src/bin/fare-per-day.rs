//! Total fare per pickup day.
extern crate tripreduce;

use tripreduce::*;
use tripreduce::trips::FarePerDay;

fn run() -> Result<()> {
    let mapper = FarePerDay::default();
    let policy = Sum;

    let matches = tripreduce::parse_command_line("fare-per-day");

    let job = JobBuilder::new()
        .mapper(&mapper)
        .policy(&policy)
        .build()
        .chain_err(|| "Error building Job.")?;

    tripreduce::run(&matches, &job)
}

fn main() {
    tripreduce::execute(run);
}
