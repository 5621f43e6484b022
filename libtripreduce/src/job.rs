use errors::*;
use mapper::Map;
use policy::Policy;
use record::RecordParser;

/// `Job` ties a mapper to the aggregation policy that reduces its output.
///
/// The user should use the `JobBuilder` to create this and then pass it in to `run`.
pub struct Job<'a, M, P>
where
    M: Map + 'a,
    P: Policy<Value = M::Value> + 'a,
{
    pub mapper: &'a M,
    pub policy: &'a P,
    pub parser: RecordParser,
}

/// `JobBuilder` is used to create a `Job`.
pub struct JobBuilder<'a, M, P>
where
    M: Map + 'a,
    P: Policy<Value = M::Value> + 'a,
{
    mapper: Option<&'a M>,
    policy: Option<&'a P>,
    parser: Option<RecordParser>,
}

impl<'a, M, P> Default for JobBuilder<'a, M, P>
where
    M: Map + 'a,
    P: Policy<Value = M::Value> + 'a,
{
    fn default() -> JobBuilder<'a, M, P> {
        JobBuilder {
            mapper: None,
            policy: None,
            parser: None,
        }
    }
}

impl<'a, M, P> JobBuilder<'a, M, P>
where
    M: Map + 'a,
    P: Policy<Value = M::Value> + 'a,
{
    pub fn new() -> JobBuilder<'a, M, P> {
        Default::default()
    }

    pub fn mapper(mut self, mapper: &'a M) -> JobBuilder<'a, M, P> {
        self.mapper = Some(mapper);
        self
    }

    pub fn policy(mut self, policy: &'a P) -> JobBuilder<'a, M, P> {
        self.policy = Some(policy);
        self
    }

    /// Overrides the default comma-delimited parser with its trip-record header literals.
    pub fn parser(mut self, parser: RecordParser) -> JobBuilder<'a, M, P> {
        self.parser = Some(parser);
        self
    }

    pub fn build(&self) -> Result<Job<'a, M, P>> {
        let mapper = self.mapper
            .chain_err(|| "Error building Job: No Mapper provided")?;
        let policy = self.policy
            .chain_err(|| "Error building Job: No Policy provided")?;

        Ok(Job {
            mapper,
            policy,
            parser: self.parser.clone().unwrap_or_default(),
        })
    }
}
