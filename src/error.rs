use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("invalid input dimension - expected: {expected} got: {actual}")]
    Dimension { expected: usize, actual: usize },
    #[error("invalid network configuration: {0}")]
    Config(String),
    #[error("weights do not fit the network topology: {0}")]
    Weights(String),
    #[error("could not start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
