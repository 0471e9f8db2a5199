pub mod graph;
pub mod statistics;

pub use crate::analysis::graph::*;
pub use crate::analysis::statistics::*;

use crate::data::*;
use crate::engine::{Mode, Model};
use crate::inference::{Sampler, TraceBatch};
use crate::pipeline::Options;
use tracing::*;

/// Reduces batches of traces into an execution graph and length statistics.
pub struct Analytics<'m, M: Model> {
    sampler: Sampler<'m, M>,
    use_address_base: bool,
}

impl<'m, M: Model> Analytics<'m, M> {
    pub fn new(model: &'m M, opt: Options) -> Self {
        Analytics {
            sampler: Sampler::new(model, opt),
            use_address_base: true,
        }
    }
    /// Key graph nodes by full address (call site plus occurrence) instead of
    /// by call site alone.
    pub fn with_full_addresses(mut self) -> Self {
        self.use_address_base = false;
        self
    }
    pub fn sampler(&self) -> &Sampler<'m, M> {
        &self.sampler
    }

    pub fn prior_graph(&self, num_traces: usize) -> Result<(ExecutionGraph, TraceStats)> {
        let batch = self.sampler.traces(num_traces, Mode::Prior)?;
        self.reduce(&batch, false)
    }

    pub fn posterior_graph(
        &self,
        num_traces: usize,
        observe: &ObservationSet,
    ) -> Result<(ExecutionGraph, TraceStats)> {
        let batch = self.sampler.traces(num_traces, Mode::Posterior(observe))?;
        self.reduce(&batch, true)
    }

    pub fn graph_of<R>(&self, batch: &TraceBatch<R>) -> Result<ExecutionGraph> {
        ExecutionGraph::from_traces(batch.traces(), self.use_address_base)
    }

    pub fn stats_of<R>(&self, batch: &TraceBatch<R>, weighted: bool) -> Result<TraceStats> {
        TraceStats::of_batch(batch, weighted)
    }

    fn reduce<R>(
        &self,
        batch: &TraceBatch<R>,
        weighted: bool,
    ) -> Result<(ExecutionGraph, TraceStats)> {
        let stats = self.stats_of(batch, weighted)?;
        let graph = self.graph_of(batch)?;
        info!(
            "{} traces: length mean {:.4}, stddev {:.4}, min {}, max {}",
            stats.num_traces,
            stats.trace_length_mean,
            stats.trace_length_stddev,
            stats.trace_length_min,
            stats.trace_length_max
        );
        debug!(
            "graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok((graph, stats))
    }
}
