mod dense;
mod neuron;
mod synapse;

pub use dense::Layer;
pub use neuron::Neuron;
pub use synapse::Synapse;
