pub mod activation;
pub mod averages;
pub mod distributed;
pub mod metrics;
pub mod shape;

pub use activation::*;
pub use averages::*;
pub use distributed::*;
pub use metrics::*;
pub use shape::*;
