use plotly::Plot;
use rand::{rngs::StdRng, SeedableRng};

use crate::data::Examples;
use crate::error::NetworkError;
use crate::nn::{Network, WeightIndex};

use super::{plateaued, Gradients, Hyper, Monitor, Solver, Trainer};

/// Sequential trainer: weights are updated after every single example.
pub struct OnlineTrainer<S: Solver> {
    solver: S,
    hyper: Hyper,
    monitor: Monitor,
}

impl<S: Solver> OnlineTrainer<S> {
    pub fn new(solver: S) -> OnlineTrainer<S> {
        OnlineTrainer {
            solver,
            hyper: Hyper::new(),
            monitor: Monitor::new(),
        }
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

    /// Stop once reported losses plateau, per `patience` and `min_delta`.
    pub fn until(&mut self) -> &mut Self {
        let (patience, min_delta) = (self.hyper.patience, self.hyper.min_delta);
        self.monitor
            .set_early_terminate(Box::new(move |losses: &[f64]| plateaued(losses, patience, min_delta)));
        self
    }

    pub fn until_some(&mut self, early_terminate: impl Fn(&[f64]) -> bool + Send + 'static) -> &mut Self {
        self.monitor.set_early_terminate(Box::new(early_terminate));
        self
    }

    /// Validation losses recorded at each report of the last run.
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

impl<S: Solver> Trainer for OnlineTrainer<S> {
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
        let mut train = examples.clone();
        let mut rng = match self.hyper.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let index = WeightIndex::new(n);
        let mut gradients = Gradients::new(n);
        self.solver.init(index.len());
        self.monitor.start(n, self.hyper.verbosity);

        log::info!(
            "training {} weights on {} examples for {} iterations",
            index.len(),
            train.len(),
            iterations
        );

        for it in 1..=iterations {
            train.shuffle(&mut rng);

            for e in train.iter() {
                n.forward(&e.input, true)?;
                gradients.backward(n, &e.response)?;
                gradients.apply(n, &mut self.solver, &index, it);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activations;
    use crate::data::Example;
    use crate::f::round;
    use crate::nn::{Config, Mode, WeightInitializer};
    use crate::optimizers::fixtures::two_class;
    use crate::optimizers::{calculate_loss, Sgd};
    use approx::assert_relative_eq;

    fn seeded(c: Config, seed: u64) -> Network {
        Network::with_rng(c, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn uniform(std_dev: f64) -> WeightInitializer {
        WeightInitializer::Uniform { std_dev, mean: 0. }
    }

    #[test]
    fn learns_a_step() {
        let mut data = Examples::new();
        data.insert(vec![0.], vec![0.])
            .insert(vec![0.], vec![0.])
            .insert(vec![0.], vec![0.])
            .insert(vec![5.], vec![1.])
            .insert(vec![5.], vec![1.]);

        let mut c = Config::new(1, vec![5, 1]);
        c.set_activation(Activations::Sigmoid).set_weight(uniform(0.5)).set_bias(true);
        let mut n = seeded(c, 0);

        let mut trainer = OnlineTrainer::new(Sgd::new(0.5, 0.1, 0., false));
        trainer.set_seed(0).train(&mut n, &data, &Examples::new(), 1000).unwrap();

        assert_relative_eq!(1. + n.predict(&[0.]).unwrap()[0], 1., max_relative = 0.1);
        assert_relative_eq!(n.predict(&[5.]).unwrap()[0], 1., max_relative = 0.1);
    }

    #[test]
    fn separates_two_classes() {
        let data = two_class();
        let mut c = Config::new(2, vec![2, 2, 1]);
        c.set_activation(Activations::Sigmoid).set_weight(uniform(0.5)).set_bias(true);
        let mut n = seeded(c, 1);

        let mut trainer = OnlineTrainer::new(Sgd::new(0.5, 0.1, 0., false));
        trainer.set_seed(1).train(&mut n, &data, &Examples::new(), 5000).unwrap();

        for e in data.iter() {
            assert_relative_eq!(
                n.predict(&e.input).unwrap()[0] + 1.,
                e.response[0] + 1.,
                max_relative = 0.1
            );
        }
    }

    #[test]
    fn records_validation_losses() {
        let data = two_class();
        let mut c = Config::new(2, vec![1, 1]);
        c.set_activation(Activations::Tanh).set_weight(uniform(0.5)).set_bias(true);
        let mut n = seeded(c, 2);

        let mut trainer = OnlineTrainer::new(Sgd::new(0.5, 0.1, 0., false));
        trainer
            .set_seed(2)
            .set_verbosity(100)
            .train(&mut n, &data, &data, 1000)
            .unwrap();

        assert_eq!(trainer.losses().len(), 10);
        assert_eq!(trainer.losses()[9], calculate_loss(&mut n, &data).unwrap());
        assert_relative_eq!(trainer.losses()[9] + 1., 1., max_relative = 0.02);
        for e in data.iter() {
            assert_relative_eq!(
                n.predict(&e.input).unwrap()[0] + 1.,
                e.response[0] + 1.,
                max_relative = 0.1
            );
        }
    }

    #[test]
    fn multi_class_outputs_are_distributions() {
        let data = two_class()
            .iter()
            .map(|e| {
                let class = e.response[0];
                Example::new(e.input.clone(), vec![1. - class, class])
            })
            .collect::<Examples>();

        let mut c = Config::new(2, vec![4, 2]);
        c.set_activation(Activations::Tanh)
            .set_mode(Mode::MultiClass)
            .set_weight(uniform(0.5))
            .set_bias(true);
        let mut n = seeded(c, 3);

        let mut trainer = OnlineTrainer::new(Sgd::new(0.1, 0.1, 0., false));
        trainer.set_seed(3).train(&mut n, &data, &data, 1000).unwrap();

        for e in data.iter() {
            let est = n.predict(&e.input).unwrap();
            assert_relative_eq!(est.iter().sum::<f64>(), 1., epsilon = 1e-9);
            let class = e.response[1] as usize;
            assert_relative_eq!(est[class] + 1., 2., max_relative = 0.1);
        }
    }

    #[test]
    fn learns_or() {
        let mut perms = Examples::new();
        perms
            .insert(vec![0., 0.], vec![0.])
            .insert(vec![1., 0.], vec![1.])
            .insert(vec![0., 1.], vec![1.])
            .insert(vec![1., 1.], vec![1.]);

        let mut c = Config::new(2, vec![2, 1]);
        c.set_activation(Activations::Tanh)
            .set_mode(Mode::Binary)
            .set_weight(uniform(0.5))
            .set_bias(true);
        let mut n = seeded(c, 4);

        let mut trainer = OnlineTrainer::new(Sgd::new(0.5, 0., 0., false));
        trainer.set_seed(4).train(&mut n, &perms, &perms, 200).unwrap();

        for e in perms.iter() {
            assert_eq!(round(n.predict(&e.input).unwrap()[0]), e.response[0]);
        }
    }

    #[test]
    fn learns_xor() {
        let mut perms = Examples::new();
        perms
            .insert(vec![0., 0.], vec![0.])
            .insert(vec![1., 0.], vec![1.])
            .insert(vec![0., 1.], vec![1.])
            .insert(vec![1., 1.], vec![0.]);

        let mut c = Config::new(2, vec![5, 1]);
        c.set_activation(Activations::Sigmoid)
            .set_mode(Mode::Binary)
            .set_weight(WeightInitializer::Normal { std_dev: 1., mean: 0. })
            .set_bias(true);
        let mut n = seeded(c, 5);

        let mut trainer = OnlineTrainer::new(Sgd::new(1.0, 0.1, 1e-6, false));
        trainer.set_seed(5).train(&mut n, &perms, &perms, 500).unwrap();

        for e in perms.iter() {
            assert_relative_eq!(
                n.predict(&e.input).unwrap()[0] + 1.,
                e.response[0] + 1.,
                max_relative = 0.2
            );
        }
    }

    #[test]
    fn learns_xor_with_three_hidden_neurons() {
        let mut perms = Examples::new();
        perms
            .insert(vec![0., 0.], vec![0.])
            .insert(vec![1., 0.], vec![1.])
            .insert(vec![0., 1.], vec![1.])
            .insert(vec![1., 1.], vec![0.]);

        let mut c = Config::new(2, vec![3, 1]);
        c.set_activation(Activations::Sigmoid)
            .set_mode(Mode::Binary)
            .set_weight(uniform(0.25))
            .set_bias(true);
        let mut n = seeded(c, 0);

        let mut trainer = OnlineTrainer::new(Sgd::new(1.0, 0.1, 1e-6, false));
        trainer.set_seed(0).train(&mut n, &perms, &perms, 500).unwrap();

        for e in perms.iter() {
            assert_relative_eq!(
                n.predict(&e.input).unwrap()[0] + 1.,
                e.response[0] + 1.,
                max_relative = 0.2
            );
        }
    }

    #[test]
    fn bounded_regression() {
        let funcs: [fn(f64) -> f64; 3] = [f64::sin, |x| x.powi(2), f64::sqrt];

        for f in funcs {
            let data = (0..100)
                .map(|i| {
                    let x = i as f64 / 100.;
                    Example::new(vec![x], vec![f(x)])
                })
                .collect::<Examples>();

            let mut c = Config::new(1, vec![4, 4, 1]);
            c.set_activation(Activations::Tanh)
                .set_mode(Mode::Regression)
                .set_weight(uniform(0.5))
                .set_bias(true);
            let mut n = seeded(c, 6);

            let mut trainer = OnlineTrainer::new(Sgd::new(0.25, 0.5, 0., false));
            trainer.set_seed(6).train(&mut n, &data, &Examples::new(), 5000).unwrap();

            for x in [0.0, 0.1, 0.25, 0.5, 0.75, 0.9] {
                assert_relative_eq!(
                    n.predict(&[x]).unwrap()[0] + 1.,
                    f(x) + 1.,
                    max_relative = 0.1
                );
            }
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let data = two_class();
        let mut c = Config::new(2, vec![3, 1]);
        c.set_bias(true);

        let mut a = seeded(c.clone(), 7);
        let mut b = seeded(c, 7);
        OnlineTrainer::new(Sgd::new(0.5, 0.1, 0., false))
            .set_seed(9)
            .train(&mut a, &data, &Examples::new(), 20)
            .unwrap();
        OnlineTrainer::new(Sgd::new(0.5, 0.1, 0., false))
            .set_seed(9)
            .train(&mut b, &data, &Examples::new(), 20)
            .unwrap();

        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn early_termination_stops_reporting() {
        let data = two_class();
        let mut n = seeded(Config::new(2, vec![2, 1]), 8);

        let mut trainer = OnlineTrainer::new(Sgd::new(0.5, 0., 0., false));
        trainer
            .set_seed(8)
            .set_verbosity(1)
            .until_some(|losses| losses.len() == 3)
            .train(&mut n, &data, &data, 50)
            .unwrap();

        assert_eq!(trainer.losses().len(), 3);
    }

    #[test]
    fn wrong_example_width_is_an_error() {
        let mut data = Examples::new();
        data.insert(vec![1., 2., 3.], vec![1.]);
        let mut n = Network::new(Config::new(2, vec![1])).unwrap();

        let result =
            OnlineTrainer::new(Sgd::new(0.1, 0., 0., false)).train(&mut n, &data, &Examples::new(), 1);
        assert!(matches!(result, Err(NetworkError::Dimension { .. })));
    }
}
