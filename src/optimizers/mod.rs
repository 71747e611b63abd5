mod backprop;
mod batch;
mod noise;
mod online;
mod optimizer;
mod printer;
mod solver;

pub use backprop::Gradients;
pub use batch::BatchTrainer;
pub use noise::NoiseFilter;
pub use online::OnlineTrainer;
pub use optimizer::{plateaued, EarlyTerminate, Hyper, Monitor, Trainer};
pub use printer::{calculate_loss, classification_accuracy, StatsPrinter};
pub use solver::{fparam, iparam, Adam, Momentum, Moments, Rule, Sgd, Solver, SolverRegion, Stateful};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::data::{Example, Examples};

    /// Two linearly separable point clouds, split on the first coordinate.
    pub fn two_class() -> Examples {
        vec![
            ([2.7810836, 2.550537003], 0.),
            ([1.465489372, 2.362125076], 0.),
            ([3.396561688, 4.400293529], 0.),
            ([1.38807019, 1.850220317], 0.),
            ([3.06407232, 3.005305973], 0.),
            ([7.627531214, 2.759262235], 1.),
            ([5.332441248, 2.088626775], 1.),
            ([6.922596716, 1.77106367], 1.),
            ([8.675418651, -0.242068655], 1.),
            ([7.673756466, 3.508563011], 1.),
        ]
        .into_iter()
        .map(|(x, y)| Example::new(x.to_vec(), vec![y]))
        .collect()
    }
}
