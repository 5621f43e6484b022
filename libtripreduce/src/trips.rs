//! Mappers for the taxi trip-record jobs.
//!
//! Column indices default to the layout of the CSV exports the jobs were written against. Each
//! mapper exposes its columns as public fields so a different export can be mapped without new
//! code.

use chrono::NaiveDate;

use mapper::Map;
use record::{ParseResult, Record};

pub const PICKUP_DATETIME_COLUMN: usize = 1;
pub const PASSENGER_COUNT_COLUMN: usize = 3;
pub const TRIP_DISTANCE_COLUMN: usize = 4;
pub const TOTAL_AMOUNT_COLUMN: usize = 12;
pub const PAYMENT_TYPE_COLUMN: usize = 19;
pub const PICKUP_LOCATION_COLUMN: usize = 21;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Total fare per pickup day: `<YYYY-MM-DD>\t<fare>`.
#[derive(Clone, Debug)]
pub struct FarePerDay {
    pub pickup_column: usize,
    pub fare_column: usize,
}

impl Default for FarePerDay {
    fn default() -> Self {
        FarePerDay {
            pickup_column: PICKUP_DATETIME_COLUMN,
            fare_column: TOTAL_AMOUNT_COLUMN,
        }
    }
}

impl Map for FarePerDay {
    type Value = f64;
    fn map(&self, record: &Record) -> ParseResult<(String, f64)> {
        let date = record.date(self.pickup_column)?;
        let fare = record.number(self.fare_column)?;
        Ok((day_key(date), fare))
    }
}

/// Passengers and distance per pickup day: `<YYYY-MM-DD>\t<passengers>,<distance>`.
///
/// A blank passenger count or distance counts as zero, since exports leave them empty for trips
/// where the meter did not record them.
#[derive(Clone, Debug)]
pub struct PassengerDistancePerDay {
    pub pickup_column: usize,
    pub passenger_column: usize,
    pub distance_column: usize,
}

impl Default for PassengerDistancePerDay {
    fn default() -> Self {
        PassengerDistancePerDay {
            pickup_column: PICKUP_DATETIME_COLUMN,
            passenger_column: PASSENGER_COUNT_COLUMN,
            distance_column: TRIP_DISTANCE_COLUMN,
        }
    }
}

impl Map for PassengerDistancePerDay {
    type Value = (f64, f64);
    fn map(&self, record: &Record) -> ParseResult<(String, (f64, f64))> {
        let date = record.date(self.pickup_column)?;
        let passengers = record.number_or_zero(self.passenger_column)?;
        let distance = record.number_or_zero(self.distance_column)?;
        Ok((day_key(date), (passengers, distance)))
    }
}

/// One trip per record, keyed by a categorical column taken verbatim: `<code>\t1`.
#[derive(Clone, Debug)]
pub struct TripsPerCategory {
    pub column: usize,
}

impl TripsPerCategory {
    pub fn payment_type() -> Self {
        TripsPerCategory {
            column: PAYMENT_TYPE_COLUMN,
        }
    }

    pub fn pickup_zone() -> Self {
        TripsPerCategory {
            column: PICKUP_LOCATION_COLUMN,
        }
    }
}

impl Map for TripsPerCategory {
    type Value = u64;
    fn map(&self, record: &Record) -> ParseResult<(String, u64)> {
        Ok((record.key(self.column)?.to_owned(), 1))
    }
}

/// One trip per record, keyed by pickup day: `<YYYY-MM-DD>\t1`.
#[derive(Clone, Debug)]
pub struct TripsPerDay {
    pub pickup_column: usize,
}

impl Default for TripsPerDay {
    fn default() -> Self {
        TripsPerDay {
            pickup_column: PICKUP_DATETIME_COLUMN,
        }
    }
}

impl Map for TripsPerDay {
    type Value = u64;
    fn map(&self, record: &Record) -> ParseResult<(String, u64)> {
        let date = record.date(self.pickup_column)?;
        Ok((day_key(date), 1))
    }
}
