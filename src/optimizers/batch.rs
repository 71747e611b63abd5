use ndarray::Array2;
use plotly::Plot;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::data::Examples;
use crate::error::NetworkError;
use crate::f::round_robin;
use crate::nn::{Network, WeightIndex, Weights};

use super::{iparam, plateaued, Gradients, Hyper, Monitor, Solver, Trainer};

/// A private replica and the gradients it accumulates.
struct Worker {
    net: Network,
    grads: Gradients,
}

impl Worker {
    fn new(n: &Network) -> Result<Worker, NetworkError> {
        let net = Network::new(n.config.clone())?;
        Ok(Worker {
            grads: Gradients::new(&net),
            net,
        })
    }

    /// Copy the authoritative weights and input tuning into the replica.
    fn sync(&mut self, n: &Network, weights: &Weights) -> Result<(), NetworkError> {
        self.net.apply_weights(weights)?;
        self.net.significance.clone_from(&n.significance);
        self.net.shift.clone_from(&n.shift);
        Ok(())
    }
}

/// Mini-batch trainer running gradient computation on a pool of workers.
///
/// Each batch is dealt round-robin to the workers, which all start from the
/// same weight snapshot. Their gradients are summed in worker order and
/// applied once per batch, one task per layer.
pub struct BatchTrainer<S: Solver> {
    solver: S,
    hyper: Hyper,
    monitor: Monitor,
}

impl<S: Solver> BatchTrainer<S> {
    pub fn new(solver: S) -> BatchTrainer<S> {
        BatchTrainer {
            solver,
            hyper: Hyper::new(),
            monitor: Monitor::new(),
        }
    }

    /// Examples per weight update; 0 means 1.
    pub fn set_batch_size(&mut self, batch_size: usize) -> &mut Self {
        self.hyper.batch_size = batch_size;
        self
    }

    /// Worker threads; 0 means 1.
    pub fn set_workers(&mut self, workers: usize) -> &mut Self {
        self.hyper.workers = workers;
        self
    }

    pub fn set_verbosity(&mut self, verbosity: usize) -> &mut Self {
        self.hyper.verbosity = verbosity;
        self
    }

    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.hyper.seed = Some(seed);
        self
    }

    pub fn set_patience(&mut self, patience: usize) -> &mut Self {
        self.hyper.patience = patience;
        self
    }

    pub fn set_min_delta(&mut self, min_delta: f64) -> &mut Self {
        self.hyper.min_delta = min_delta;
        self
    }

    pub fn until(&mut self) -> &mut Self {
        let (patience, min_delta) = (self.hyper.patience, self.hyper.min_delta);
        self.monitor
            .set_early_terminate(Box::new(move |losses: &[f64]| plateaued(losses, patience, min_delta)));
        self
    }

    pub fn until_some(
        &mut self,
        early_terminate: impl Fn(&[f64]) -> bool + Send + 'static,
    ) -> &mut Self {
        self.monitor.set_early_terminate(Box::new(early_terminate));
        self
    }

    pub fn losses(&self) -> &[f64] {
        &self.monitor.losses
    }

    pub fn loss_plot(&self) -> Plot {
        self.monitor.loss_plot()
    }

    pub fn loss_graph(&mut self) -> &mut Self {
        self.monitor.loss_plot().show();
        self
    }
}

impl<S: Solver> Trainer for BatchTrainer<S> {
    fn override_hyper(&mut self, hyper: Hyper) -> &mut Self {
        self.hyper = hyper;
        self
    }

    fn train(
        &mut self,
        n: &mut Network,
        examples: &Examples,
        validation: &Examples,
        iterations: usize,
    ) -> Result<(), NetworkError> {
        let batch_size = iparam(self.hyper.batch_size, 1);
        let parallelism = iparam(self.hyper.workers, 1);
        let pool = ThreadPoolBuilder::new().num_threads(parallelism).build()?;

        let mut train = examples.clone();
        let mut rng = match self.hyper.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let index = WeightIndex::new(n);
        let mut workers = (0..parallelism)
            .map(|_| Worker::new(n))
            .collect::<Result<Vec<Worker>, NetworkError>>()?;
        let mut accumulated = Gradients::new(n).partial;

        self.solver.init(index.len());
        self.monitor.start(n, self.hyper.verbosity);

        log::info!(
            "training {} weights on {} examples, batch size {}, {} workers",
            index.len(),
            train.len(),
            batch_size,
            parallelism
        );

        for it in 1..=iterations {
            train.shuffle(&mut rng);

            for batch in train.split_size(batch_size) {
                let weights = n.weights();
                for w in workers.iter_mut() {
                    w.sync(n, &weights)?;
                }

                let shares = round_robin(batch.iter(), parallelism);
                pool.install(|| {
                    workers
                        .par_iter_mut()
                        .zip(shares.into_par_iter())
                        .try_for_each(|(w, share)| -> Result<(), NetworkError> {
                            for e in share {
                                w.net.forward(&e.input, true)?;
                                w.grads.backward(&mut w.net, &e.response)?;
                            }
                            Ok(())
                        })
                })?;

                for w in workers.iter_mut() {
                    pool.install(|| reduce(&mut accumulated, &mut w.grads.partial));
                }

                apply(&pool, n, &mut self.solver, &mut accumulated, &index, it);
            }

            log::debug!("iteration {} done after {:.2?}", it, self.monitor.elapsed());

            if self.monitor.report(n, validation, it, self.hyper.verbosity)? {
                break;
            }
        }

        log::info!("training finished in {:.2?}", self.monitor.elapsed());
        Ok(())
    }
}

/// Add a worker's partial gradients into the accumulator and zero them.
fn reduce(accumulated: &mut [Array2<f64>], partial: &mut [Array2<f64>]) {
    accumulated
        .par_iter_mut()
        .zip(partial.par_iter_mut())
        .for_each(|(acc, p)| {
            *acc += &*p;
            p.fill(0.);
        });
}

/// One task per layer, each owning its layer's weights, accumulated
/// gradients and solver state.
fn apply<S: Solver>(
    pool: &ThreadPool,
    n: &mut Network,
    solver: &mut S,
    accumulated: &mut [Array2<f64>],
    index: &WeightIndex,
    iteration: usize,
) {
    let regions = solver.regions(index.layer_bounds());

    pool.install(|| {
        n.layers
            .par_iter_mut()
            .zip(accumulated.par_iter_mut())
            .zip(regions.into_par_iter())
            .enumerate()
            .for_each(|(i, ((layer, acc), mut region))| {
                for (j, neuron) in layer.neurons.iter_mut().enumerate() {
                    for (k, s) in neuron.inputs.iter_mut().enumerate() {
                        s.weight += region.update(s.weight, acc[[j, k]], iteration, index.of(i, j, k));
                        acc[[j, k]] = 0.;
                    }
                }
            });
    });
}
