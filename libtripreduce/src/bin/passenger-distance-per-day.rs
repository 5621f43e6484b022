//! Total passengers and trip distance per pickup day.
extern crate tripreduce;

use tripreduce::*;
use tripreduce::trips::PassengerDistancePerDay;

fn run() -> Result<()> {
    let mapper = PassengerDistancePerDay::default();
    let policy = PairedSum;

    let matches = tripreduce::parse_command_line("passenger-distance-per-day");

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
