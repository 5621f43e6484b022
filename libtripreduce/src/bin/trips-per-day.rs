//! Number of trips per pickup day.
extern crate tripreduce;

use tripreduce::*;
use tripreduce::trips::TripsPerDay;

fn run() -> Result<()> {
    let mapper = TripsPerDay::default();
    let policy = Count;

    let matches = tripreduce::parse_command_line("trips-per-day");

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
