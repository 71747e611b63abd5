use std::time::Duration;

use crate::data::Example;
use crate::error::NetworkError;
use crate::f::{accuracy, argmax, round};
use crate::nn::{Mode, Network};

/// Mean loss of `n` over `examples`, using the network's configured loss.
pub fn calculate_loss(n: &mut Network, examples: &[Example]) -> Result<f64, NetworkError> {
    let mut estimates = Vec::with_capacity(examples.len());
    let mut ideals = Vec::with_capacity(examples.len());

    for e in examples {
        estimates.push(n.predict(&e.input)?);
        ideals.push(e.response.clone());
    }

    Ok(n.config.loss().wake().f(&estimates, &ideals))
}

/// Percentage of correct predictions for classification modes, `None` otherwise.
///
/// Multi-class compares the argmax of prediction and response; binary and
/// multi-label compare every rounded output.
pub fn classification_accuracy(
    n: &mut Network,
    examples: &[Example],
) -> Result<Option<f64>, NetworkError> {
    let mut predicted = vec![];
    let mut actual = vec![];

    match n.config.mode {
        Mode::MultiClass => {
            for e in examples {
                predicted.push(argmax(&n.predict(&e.input)?));
                actual.push(argmax(&e.response));
            }
        }
        Mode::Binary | Mode::MultiLabel => {
            for e in examples {
                let out = n.predict(&e.input)?;
                predicted.extend(out.iter().map(|v| round(*v) as usize));
                actual.extend(e.response.iter().map(|v| round(*v) as usize));
            }
        }
        _ => return Ok(None),
    }

    Ok(Some(accuracy(&predicted, &actual)))
}

/// Prints a progress table to stdout.
#[derive(Debug, Default)]
pub struct StatsPrinter {
    header: bool,
}

impl StatsPrinter {
    pub fn new() -> StatsPrinter {
        StatsPrinter::default()
    }

    pub fn init(&mut self, n: &Network) {
        let loss = format!("Loss ({})", n.config.loss().abbreviation());
        println!("{:<8} {:<12} {:<14} Accuracy", "Epochs", "Elapsed", loss);
        self.header = true;
    }

    /// Evaluate `n` on `validation` and print one row. Returns the loss.
    pub fn print_progress(
        &mut self,
        n: &mut Network,
        validation: &[Example],
        elapsed: Duration,
        iteration: usize,
    ) -> Result<f64, NetworkError> {
        if !self.header {
            self.init(n);
        }

        let loss = calculate_loss(n, validation)?;
        let accuracy = match classification_accuracy(n, validation)? {
            Some(a) => format!("{:.2}%", a),
            None => "-".to_string(),
        };

        println!(
            "{:<8} {:<12} {:<14.6} {}",
            iteration,
            format!("{:.2?}", elapsed),
            loss,
            accuracy
        );

        Ok(loss)
    }
}
