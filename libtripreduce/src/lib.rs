#![recursion_limit = "1024"]

extern crate chrono;
#[macro_use]
extern crate clap;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate util;

pub mod errors {
    error_chain! {
        foreign_links {
            Io(::std::io::Error);
        }

        errors {
            OrderingViolation(previous: String, next: String) {
                description("reduce input is not sorted by key")
                display("key '{}' arrived after key '{}': reduce input is not sorted by key", next, previous)
            }
        }
    }
}

pub mod config;
pub mod emitter;
pub mod io;
pub mod job;
pub mod mapper;
pub mod partition;
pub mod pipeline;
pub mod policy;
pub mod record;
pub mod reducer;
pub mod runner;
pub mod shuffle;
pub mod stats;
pub mod trips;
pub mod wire;

pub use errors::*;
pub use config::Config;
pub use emitter::{EmitFinal, EmitIntermediate, FinalLineEmitter, FinalVecEmitter,
                  IntermediateLineEmitter, IntermediateVecEmitter};
pub use job::{Job, JobBuilder};
pub use mapper::{map_line, run_map, Map};
pub use partition::{HashPartitioner, Partition};
pub use pipeline::{run_pipeline, PipelineStats};
pub use policy::{Count, PairedSum, Policy, Sum};
pub use record::{ParseError, ParseResult, Record, RecordParser};
pub use reducer::{reduce_pairs, run_reduce, Aggregate, OrderCheck, Reducer};
pub use runner::{execute, parse_command_line, run};
pub use shuffle::{Shuffle, SortShuffle};
pub use stats::RunStats;
