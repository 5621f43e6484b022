//! Number of trips per pickup zone.
extern crate tripreduce;

use tripreduce::*;
use tripreduce::trips::TripsPerCategory;

fn run() -> Result<()> {
    let mapper = TripsPerCategory::pickup_zone();
    let policy = Count;

    let matches = tripreduce::parse_command_line("trips-per-pickup-zone");

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
