use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::f::{logistic, relu, sigmoid, softplus};

/// An activation function and its first derivative.
///
/// `df` always receives the output `y = f(x)`. Functions whose derivative is
/// cheap in terms of `y` (sigmoid, tanh, ...) compute it directly; the rest
/// look up the input recorded by a training-mode `f` call for that output.
pub trait Differentiable: Send {
    fn f(&mut self, x: f64, training: bool) -> f64;
    fn df(&mut self, y: f64) -> f64;
}

impl Debug for dyn Differentiable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ActivationFn")
    }
}

/// User supplied activation, carried by a network's `Config`.
pub trait CustomActivation: Send + Sync {
    fn f(&self, x: f64) -> f64;
    /// Derivative given the output `y` and the input `x` that produced it.
    fn df(&self, y: f64, x: f64) -> f64;
}

impl Debug for dyn CustomActivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CustomActivationFn")
    }
}

/// Closure pair adapter for `CustomActivation`.
pub struct CustomFn<F, D>(pub F, pub D);

impl<F, D> CustomActivation for CustomFn<F, D>
where
    F: Fn(f64) -> f64 + Send + Sync,
    D: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn f(&self, x: f64) -> f64 {
        (self.0)(x)
    }

    fn df(&self, y: f64, x: f64) -> f64 {
        (self.1)(y, x)
    }
}

/// The output -> input pair of the last training forward pass.
/// A neuron has at most one pending pair, consumed by the derivative lookup.
#[derive(Default, Debug)]
struct Memo(Option<(u64, f64)>);

impl Memo {
    fn remember(&mut self, y: f64, x: f64, training: bool) {
        if training {
            self.0 = Some((y.to_bits(), x));
        }
    }

    // A miss yields 0, the input a fresh neuron would have seen.
    fn recall(&mut self, y: f64) -> f64 {
        match self.0.take() {
            Some((bits, x)) if bits == y.to_bits() => x,
            _ => 0.,
        }
    }
}

pub struct Sigmoid;

impl Differentiable for Sigmoid {
    fn f(&mut self, x: f64, _: bool) -> f64 {
        sigmoid(x)
    }

    fn df(&mut self, y: f64) -> f64 {
        y * (1. - y)
    }
}

pub struct Tanh;

impl Differentiable for Tanh {
    fn f(&mut self, x: f64, _: bool) -> f64 {
        x.tanh()
    }

    fn df(&mut self, y: f64) -> f64 {
        1. - y.powi(2)
    }
}

pub struct Relu;

impl Differentiable for Relu {
    fn f(&mut self, x: f64, _: bool) -> f64 {
        relu(x)
    }

    fn df(&mut self, y: f64) -> f64 {
        if y > 0. {
            return 1.;
        }
        0.
    }
}

pub struct Elu;

impl Differentiable for Elu {
    fn f(&mut self, x: f64, _: bool) -> f64 {
        if x < 0. {
            return x.exp_m1();
        }
        x
    }

    // e^x - 1 = y below zero, so the slope there is y + 1.
    fn df(&mut self, y: f64) -> f64 {
        if y > 0. {
            return 1.;
        }
        y + 1.
    }
}

#[derive(Default)]
pub struct Swish {
    mem: Memo,
}

impl Differentiable for Swish {
    fn f(&mut self, x: f64, training: bool) -> f64 {
        let y = x * logistic(x, 1.);
        self.mem.remember(y, x, training);
        y
    }

    fn df(&mut self, y: f64) -> f64 {
        let x = self.mem.recall(y);
        let sig_x = logistic(x, 1.);
        sig_x * (1. + x * (1. - sig_x))
    }
}

#[derive(Default)]
pub struct Mish {
    mem: Memo,
}

impl Differentiable for Mish {
    fn f(&mut self, x: f64, training: bool) -> f64 {
        let y = x * softplus(x).tanh();
        self.mem.remember(y, x, training);
        y
    }

    fn df(&mut self, y: f64) -> f64 {
        let x = self.mem.recall(y);
        let tanh_sp = softplus(x).tanh();
        tanh_sp + x * logistic(x, 1.) * (1. - tanh_sp * tanh_sp)
    }
}

/// Signed square-root curve: sqrt(1/4 + |x|) - 1/2, odd around 0.
pub struct DoubleRoot;

impl Differentiable for DoubleRoot {
    fn f(&mut self, x: f64, _: bool) -> f64 {
        if x >= 0. {
            return (0.25 + x).sqrt() - 0.5;
        }
        0.5 - (0.25 - x).sqrt()
    }

    fn df(&mut self, y: f64) -> f64 {
        1. / (1. + 2. * y.abs())
    }
}

/// Identity above zero, the negative branch of `DoubleRoot` below.
pub struct RootX;

impl Differentiable for RootX {
    fn f(&mut self, x: f64, _: bool) -> f64 {
        if x >= 0. {
            return x;
        }
        0.5 - (0.25 - x).sqrt()
    }

    fn df(&mut self, y: f64) -> f64 {
        if y >= 0. {
            return 1.;
        }
        1. / (1. - 2. * y)
    }
}

/// Identity above zero, x / (x - 1) below. Both branches share positive
/// outputs, so the derivative needs the recorded input.
#[derive(Default)]
pub struct MulDiv {
    mem: Memo,
}

impl Differentiable for MulDiv {
    fn f(&mut self, x: f64, training: bool) -> f64 {
        let y = if x >= 0. { x } else { 1. / (x - 1.) + 1. };
        self.mem.remember(y, x, training);
        y
    }

    fn df(&mut self, y: f64) -> f64 {
        let x = self.mem.recall(y);
        if x >= 0. {
            return 1.;
        }
        -1. / ((x - 1.) * (x - 1.))
    }
}

pub struct Custom {
    func: Option<Arc<dyn CustomActivation>>,
    mem: Memo,
}

impl Differentiable for Custom {
    fn f(&mut self, x: f64, training: bool) -> f64 {
        let y = match &self.func {
            Some(func) => func.f(x),
            None => x,
        };
        self.mem.remember(y, x, training);
        y
    }

    fn df(&mut self, y: f64) -> f64 {
        let x = self.mem.recall(y);
        match &self.func {
            Some(func) => func.df(y, x),
            None => 1.,
        }
    }
}

pub struct Linear;

impl Differentiable for Linear {
    fn f(&mut self, x: f64, _: bool) -> f64 {
        x
    }

    fn df(&mut self, _: f64) -> f64 {
        1.
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activations {
    Sigmoid,
    Tanh,
    Relu,
    Linear,
    /// Identity per neuron; the owning layer normalizes its outputs.
    Softmax,
    Elu,
    Swish,
    Mish,
    Custom,
    DoubleRoot,
    RootX,
    MulDiv,
}

impl Activations {
    /// Fresh per-neuron activation state. `custom` backs `Activations::Custom`.
    pub fn wake(&self, custom: Option<Arc<dyn CustomActivation>>) -> Box<dyn Differentiable> {
        match self {
            Activations::Sigmoid => Box::new(Sigmoid),
            Activations::Tanh => Box::new(Tanh),
            Activations::Relu => Box::new(Relu),
            Activations::Linear | Activations::Softmax => Box::new(Linear),
            Activations::Elu => Box::new(Elu),
            Activations::Swish => Box::new(Swish::default()),
            Activations::Mish => Box::new(Mish::default()),
            Activations::Custom => Box::new(Custom {
                func: custom,
                mem: Memo::default(),
            }),
            Activations::DoubleRoot => Box::new(DoubleRoot),
            Activations::RootX => Box::new(RootX),
            Activations::MulDiv => Box::new(MulDiv::default()),
        }
    }
}
