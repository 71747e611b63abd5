use neurite::optimizers::calculate_loss;
use neurite::{Activations, Adam, BatchTrainer, Config, Example, Examples, Mode, Network};
use neurite::{Trainer, WeightInitializer};
use rand::{prelude::*, thread_rng};

fn gen_training_data(rng: &mut impl Rng) -> Example {
    let mutator = |x: f64| x.exp() * x.powi(3);
    let num = rng.gen_range(0.0..1.0);

    Example::new(vec![num], vec![mutator(num)])
}

fn main() {
    let mut rng = thread_rng();
    let train = (0..2000)
        .map(|_| gen_training_data(&mut rng))
        .collect::<Examples>();
    let test = (0..50)
        .map(|_| gen_training_data(&mut rng))
        .collect::<Examples>();

    let mut config = Config::new(1, vec![8, 12, 1]);
    config
        .set_activation(Activations::Relu)
        .set_mode(Mode::Regression)
        .set_weight(WeightInitializer::Normal {
            std_dev: 0.5,
            mean: 0.,
        })
        .set_bias(true);

    let mut nn = Network::new(config).expect("valid config");

    let mut trainer = BatchTrainer::new(Adam::new(0.005, 0., 0., 0.));
    trainer
        .set_batch_size(32)
        .set_workers(4)
        .set_verbosity(10)
        .set_patience(5)
        .set_min_delta(1e-6)
        .until()
        .train(&mut nn, &train, &test, 300)
        .expect("training failed");

    println!(
        "Held-out MSE: {:.6}",
        calculate_loss(&mut nn, &test).expect("evaluation failed")
    );

    nn.dump()
        .map(|bytes| println!("Serialized network: {} bytes", bytes.len()))
        .expect("serialization failed");

    trainer.loss_graph();
}
