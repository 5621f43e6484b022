use wire::{format_float, WireValue, FIELD_SEPARATOR};

/// The `Policy` trait defines how the values of one key are folded into a single aggregate.
///
/// The `Reducer` holds exactly one `Accumulator` at a time and drives it through `zero`, `fold`
/// and `render`. `fold` must be commutative and associative, so that the aggregate does not
/// depend on the order in which values for the same key arrive.
pub trait Policy {
    /// The partial value read from each reduce input line.
    type Value: WireValue;
    /// The running aggregate for the active key.
    type Accumulator;

    fn zero(&self) -> Self::Accumulator;

    fn fold(&self, accumulator: Self::Accumulator, value: Self::Value) -> Self::Accumulator;

    /// Renders the aggregate as the output column(s) following the key.
    fn render(&self, accumulator: &Self::Accumulator) -> String;
}

/// `Count` counts the pairs seen for a key. The value of each pair is only checked to be an
/// integer; it never changes the increment.
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl Policy for Count {
    type Value = u64;
    type Accumulator = u64;

    fn zero(&self) -> u64 {
        0
    }

    fn fold(&self, accumulator: u64, _value: u64) -> u64 {
        accumulator + 1
    }

    fn render(&self, accumulator: &u64) -> String {
        accumulator.to_string()
    }
}

/// `Sum` adds up one numeric value per pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum;

impl Policy for Sum {
    type Value = f64;
    type Accumulator = f64;

    fn zero(&self) -> f64 {
        0.0
    }

    fn fold(&self, accumulator: f64, value: f64) -> f64 {
        accumulator + value
    }

    fn render(&self, accumulator: &f64) -> String {
        format_float(*accumulator)
    }
}

/// `PairedSum` adds up two independent numeric values per pair, rendered as two output columns.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairedSum;

impl Policy for PairedSum {
    type Value = (f64, f64);
    type Accumulator = (f64, f64);

    fn zero(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    fn fold(&self, accumulator: (f64, f64), value: (f64, f64)) -> (f64, f64) {
        (accumulator.0 + value.0, accumulator.1 + value.1)
    }

    fn render(&self, accumulator: &(f64, f64)) -> String {
        format!(
            "{}{}{}",
            format_float(accumulator.0),
            FIELD_SEPARATOR,
            format_float(accumulator.1)
        )
    }
}
