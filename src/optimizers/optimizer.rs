use std::time::{Duration, Instant};

use plotly::{Bar, Plot};

use crate::data::Examples;
use crate::error::NetworkError;
use crate::nn::Network;

use super::StatsPrinter;

#[derive(Clone, Debug)]
pub struct Hyper {
    /// Report every `verbosity` iterations; 0 disables reporting.
    pub verbosity: usize,
    pub batch_size: usize,
    pub workers: usize,
    pub patience: usize,
    pub min_delta: f64,
    pub seed: Option<u64>,
}

impl Hyper {
    pub fn new() -> Hyper {
        Hyper {
            verbosity: 0,
            batch_size: 1,
            workers: 1,
            patience: 0,
            min_delta: 0.,
            seed: None,
        }
    }
}

impl Default for Hyper {
    fn default() -> Hyper {
        Hyper::new()
    }
}

pub trait Trainer {
    fn override_hyper(&mut self, hyper: Hyper) -> &mut Self;
    /// Train `n` in place for `iterations` passes over `examples`, reporting
    /// against `validation` on the configured cadence.
    fn train(
        &mut self,
        n: &mut Network,
        examples: &Examples,
        validation: &Examples,
        iterations: usize,
    ) -> Result<(), NetworkError>;
}

pub type EarlyTerminate = Box<dyn Fn(&[f64]) -> bool + Send>;

/// True once the mean loss improvement over the last `patience` reports
/// falls under `min_delta`.
pub fn plateaued(losses: &[f64], patience: usize, min_delta: f64) -> bool {
    let len = losses.len();
    if patience == 0 || patience + 1 > len {
        return false;
    }

    let deltas = ((len - patience)..len)
        .map(|i| losses[i - 1] - losses[i])
        .collect::<Vec<f64>>();
    let avg_delta = deltas.iter().sum::<f64>() / deltas.len() as f64;

    log::debug!("average loss delta {}", avg_delta);

    avg_delta < min_delta
}

/// Progress bookkeeping shared by the trainers: the printer, the recorded
/// validation losses and the early termination condition.
pub struct Monitor {
    pub losses: Vec<f64>,
    printer: StatsPrinter,
    early_terminate: EarlyTerminate,
    started: Instant,
}

impl Monitor {
    pub fn new() -> Monitor {
        Monitor {
            losses: vec![],
            printer: StatsPrinter::new(),
            early_terminate: Box::new(|_: &[f64]| false),
            started: Instant::now(),
        }
    }

    pub fn set_early_terminate(&mut self, early_terminate: EarlyTerminate) {
        self.early_terminate = early_terminate;
    }

    pub fn start(&mut self, n: &Network, verbosity: usize) {
        self.losses.clear();
        self.started = Instant::now();
        if verbosity > 0 {
            self.printer.init(n);
        }
    }

    /// Report at the cadence. Returns true when training should stop.
    pub fn report(
        &mut self,
        n: &mut Network,
        validation: &Examples,
        iteration: usize,
        verbosity: usize,
    ) -> Result<bool, NetworkError> {
        if verbosity == 0 || iteration % verbosity != 0 || validation.is_empty() {
            return Ok(false);
        }

        let loss = self
            .printer
            .print_progress(n, validation, self.started.elapsed(), iteration)?;
        self.losses.push(loss);

        if (self.early_terminate)(&self.losses) {
            log::info!("early termination condition met at iteration {}", iteration);
            return Ok(true);
        }

        Ok(false)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn loss_plot(&self) -> Plot {
        let mut plot = Plot::new();
        let x = (0..self.losses.len()).collect();
        plot.add_trace(Bar::new(x, self.losses.clone()));
        plot
    }
}

impl Default for Monitor {
    fn default() -> Monitor {
        Monitor::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plateau_needs_enough_history() {
        assert!(!plateaued(&[1., 1.], 2, 0.1));
        assert!(!plateaued(&[1., 1., 1.], 0, 0.1));
    }

    #[test]
    fn plateau_detects_stalled_improvement() {
        assert!(!plateaued(&[4., 3., 2., 1.], 3, 0.5));
        assert!(plateaued(&[4., 3., 2.99, 2.98], 2, 0.5));
    }

    #[test]
    fn silent_monitor_records_nothing() {
        let mut c = crate::nn::Config::new(1, vec![1]);
        c.set_bias(true);
        let mut n = Network::new(c).unwrap();

        let mut e = Examples::new();
        e.insert(vec![0.], vec![0.]);

        let mut m = Monitor::new();
        m.start(&n, 0);
        assert!(!m.report(&mut n, &e, 10, 0).unwrap());
        assert!(m.losses.is_empty());
    }

    #[test]
    fn reports_on_cadence_and_stops_early() {
        let mut n = Network::new(crate::nn::Config::new(1, vec![1])).unwrap();
        let mut e = Examples::new();
        e.insert(vec![1.], vec![1.]);

        let mut m = Monitor::new();
        m.set_early_terminate(Box::new(|l: &[f64]| l.len() >= 2));
        m.start(&n, 5);

        assert!(!m.report(&mut n, &e, 3, 5).unwrap());
        assert!(!m.report(&mut n, &e, 5, 5).unwrap());
        assert!(m.report(&mut n, &e, 10, 5).unwrap());
        assert_eq!(m.losses.len(), 2);
    }
}
