use neurite::f;
use neurite::{Activations, Config, Examples, Mode, Network, OnlineTrainer, Sgd, Trainer};
use neurite::WeightInitializer;

fn main() {
    let mut permutations = Examples::new();
    permutations
        .insert(vec![0., 0.], vec![0.])
        .insert(vec![1., 0.], vec![1.])
        .insert(vec![0., 1.], vec![1.])
        .insert(vec![1., 1.], vec![0.]);

    let mut config = Config::new(2, vec![5, 1]);
    config
        .set_activation(Activations::Sigmoid)
        .set_mode(Mode::Binary)
        .set_weight(WeightInitializer::Normal {
            std_dev: 1.,
            mean: 0.,
        })
        .set_bias(true);

    let mut nn = Network::new(config).expect("valid config");

    let mut trainer = OnlineTrainer::new(Sgd::new(1.0, 0.1, 1e-6, false));
    trainer
        .set_verbosity(100)
        .train(&mut nn, &permutations, &permutations, 1000)
        .expect("training failed");

    for e in permutations.iter() {
        let y = nn.predict(&e.input).expect("prediction failed");
        println!(
            "{:?} -> {:.4} ({})",
            e.input,
            y[0],
            f::round(y[0]) == e.response[0]
        );
    }
}
