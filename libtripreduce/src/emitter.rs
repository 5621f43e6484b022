use std::io::Write;

use errors::*;
use policy::Policy;
use reducer::Aggregate;
use wire::{self, WireValue};

/// The `EmitIntermediate` trait specifies structs which receive the key-value pairs of a map
/// operation.
pub trait EmitIntermediate<V> {
    /// Takes ownership of a key-value pair and moves it somewhere else.
    ///
    /// Returns an empty `Result` used for error handling.
    fn emit(&mut self, key: String, value: V) -> Result<()>;

    /// Flushes any buffered output. Emitters without a buffer do nothing.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The `EmitFinal` trait specifies structs which receive the aggregates of a reduce operation.
pub trait EmitFinal<A> {
    fn emit(&mut self, aggregate: Aggregate<A>) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A struct implementing `EmitIntermediate` which emits to an in-memory vector.
pub struct IntermediateVecEmitter<'a, V: 'a> {
    sink: &'a mut Vec<(String, V)>,
}

impl<'a, V> IntermediateVecEmitter<'a, V> {
    /// Constructs a new `IntermediateVecEmitter` with a mutable reference to a given vector.
    ///
    /// # Arguments
    ///
    /// * `sink` - A mutable reference to the vector to receive the emitted pairs.
    pub fn new(sink: &'a mut Vec<(String, V)>) -> Self {
        IntermediateVecEmitter { sink }
    }
}

impl<'a, V> EmitIntermediate<V> for IntermediateVecEmitter<'a, V> {
    fn emit(&mut self, key: String, value: V) -> Result<()> {
        self.sink.push((key, value));
        Ok(())
    }
}

/// A struct implementing `EmitIntermediate` which writes `<key>\t<value>` lines.
pub struct IntermediateLineEmitter<'a, W: Write + 'a> {
    sink: &'a mut W,
}

impl<'a, W: Write> IntermediateLineEmitter<'a, W> {
    pub fn new(sink: &'a mut W) -> Self {
        IntermediateLineEmitter { sink }
    }
}

impl<'a, W: Write, V: WireValue> EmitIntermediate<V> for IntermediateLineEmitter<'a, W> {
    fn emit(&mut self, key: String, value: V) -> Result<()> {
        wire::write_pair(&mut *self.sink, &key, &value.encode())
    }

    fn flush(&mut self) -> Result<()> {
        self.sink.flush().chain_err(|| "Error flushing map output.")?;
        Ok(())
    }
}

/// A struct implementing `EmitFinal` which emits to an in-memory vector.
pub struct FinalVecEmitter<'a, A: 'a> {
    sink: &'a mut Vec<Aggregate<A>>,
}

impl<'a, A> FinalVecEmitter<'a, A> {
    pub fn new(sink: &'a mut Vec<Aggregate<A>>) -> Self {
        FinalVecEmitter { sink }
    }
}

impl<'a, A> EmitFinal<A> for FinalVecEmitter<'a, A> {
    fn emit(&mut self, aggregate: Aggregate<A>) -> Result<()> {
        self.sink.push(aggregate);
        Ok(())
    }
}

/// A struct implementing `EmitFinal` which renders each aggregate through its policy and writes
/// it as one output line.
pub struct FinalLineEmitter<'a, P: Policy + 'a, W: Write + 'a> {
    policy: &'a P,
    sink: &'a mut W,
}

impl<'a, P: Policy, W: Write> FinalLineEmitter<'a, P, W> {
    pub fn new(policy: &'a P, sink: &'a mut W) -> Self {
        FinalLineEmitter { policy, sink }
    }
}

impl<'a, P: Policy, W: Write> EmitFinal<P::Accumulator> for FinalLineEmitter<'a, P, W> {
    fn emit(&mut self, aggregate: Aggregate<P::Accumulator>) -> Result<()> {
        let rendered = self.policy.render(&aggregate.aggregate);
        wire::write_pair(&mut *self.sink, &aggregate.key, &rendered)
    }

    fn flush(&mut self) -> Result<()> {
        self.sink.flush().chain_err(|| "Error flushing reduce output.")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy::PairedSum;

    #[test]
    fn vec_emitter_keeps_emission_order() {
        let mut vec: Vec<(String, u64)> = Vec::new();

        {
            let mut emitter = IntermediateVecEmitter::new(&mut vec);
            emitter.emit("2".to_owned(), 1).unwrap();
            emitter.emit("1".to_owned(), 1).unwrap();
        }

        assert_eq!(vec![("2".to_owned(), 1), ("1".to_owned(), 1)], vec);
    }

    #[test]
    fn line_emitter_encodes_values() {
        let mut sink = Vec::new();
        let first: (f64, f64) = (2.0, 5.5);
        let second: (f64, f64) = (1.0, 2.5);

        {
            let mut emitter = IntermediateLineEmitter::new(&mut sink);
            emitter.emit("2024-01-01".to_owned(), first).unwrap();
            emitter.emit("2024-01-01".to_owned(), second).unwrap();
            EmitIntermediate::<(f64, f64)>::flush(&mut emitter).unwrap();
        }

        assert_eq!(
            "2024-01-01\t2.0,5.5\n2024-01-01\t1.0,2.5\n",
            String::from_utf8(sink).unwrap()
        );
    }

    #[test]
    fn final_line_emitter_renders_through_policy() {
        let mut sink = Vec::new();

        {
            let mut emitter = FinalLineEmitter::new(&PairedSum, &mut sink);
            emitter
                .emit(Aggregate::new("2024-01-01".to_owned(), (3.0, 8.0)))
                .unwrap();
            emitter.flush().unwrap();
        }

        assert_eq!("2024-01-01\t3.0\t8.0\n", String::from_utf8(sink).unwrap());
    }
}
