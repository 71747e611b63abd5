use neurite::f;
use neurite::optimizers::classification_accuracy;
use neurite::{Activations, Adam, BatchTrainer, Config, Example, Examples, Mode, Network};
use neurite::{NoiseFilter, Trainer, WeightInitializer};
use rand::{prelude::*, thread_rng};

const CENTERS: [[f64; 2]; 3] = [[0., 0.], [4., 1.], [1., 5.]];

/// A point around one of three centers, plus a feature that is pure noise.
fn gen_training_data(rng: &mut impl Rng) -> Example {
    let class = rng.gen_range(0..CENTERS.len());
    let [cx, cy] = CENTERS[class];

    let mut input = vec![
        cx + rng.gen_range(-1.5..1.5),
        cy + rng.gen_range(-1.5..1.5),
        rng.gen_range(-5.0..5.0),
    ];
    f::standardize(&mut input);

    Example::new(input, f::onehot(class as u64, CENTERS.len() as u64))
}

fn main() {
    let mut rng = thread_rng();
    let data = (0..1200)
        .map(|_| gen_training_data(&mut rng))
        .collect::<Examples>();
    let (train, test) = data.split(0.8, &mut rng);

    let mut config = Config::new(3, vec![8, 3]);
    config
        .set_activation(Activations::Tanh)
        .set_mode(Mode::MultiClass)
        .set_weight(WeightInitializer::Normal {
            std_dev: 1.,
            mean: 0.,
        })
        .set_bias(true);

    let mut nn = Network::new(config).expect("valid config");

    let mut trainer = BatchTrainer::new(Adam::new(0.01, 0., 0., 0.));
    trainer
        .set_batch_size(64)
        .set_workers(4)
        .set_verbosity(25)
        .train(&mut nn, &train, &test, 250)
        .expect("training failed");

    let mut filter = NoiseFilter::new(0.1, 0.05);
    let loss = filter.run(&mut nn, &test, 200).expect("noise filter failed");

    println!("Loss after noise filtering: {:?}", loss);
    println!("Significance: {:.3?}", nn.significance);
    println!(
        "Accuracy: {:.2}%",
        classification_accuracy(&mut nn, &test)
            .expect("evaluation failed")
            .unwrap_or(0.)
    );
}
