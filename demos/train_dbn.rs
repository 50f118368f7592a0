//! Train a deep belief net on a toy bar-pattern dataset.
//!
//! Builds a 6-4-2 net, pretrains it greedily layer by layer, fine-tunes
//! jointly, and prints the top-layer activations for each pattern.
//!
//! Run with: cargo run --example train_dbn

use harmonium::{train, Activation, Net, NetResult, PatternList, Regime, TrainingConfig, TrainingLogger};

fn main() -> NetResult<()> {
    // Two "bars": left half on, or right half on.
    let patterns = PatternList::from_labeled_rows(
        vec!["left bar".to_string(), "right bar".to_string()],
        vec![
            vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        ],
    )?;

    let mut net = Net::deep_belief_net(&[6, 4, 2], true)?;
    net.reseed(42);

    let mut logger = TrainingLogger::new("train_dbn_log.csv")?;

    println!("Greedy layer-wise pretraining...");
    let pretrain = TrainingConfig {
        learning_rate: 0.05,
        epochs: 200,
        log_every: 50,
        regime: Regime::ByLayer,
    };
    train::run(&mut net, &patterns, &pretrain, Some(&mut logger))?;

    println!("Joint fine-tuning...");
    let finetune = TrainingConfig {
        learning_rate: 0.02,
        epochs: 200,
        log_every: 50,
        regime: Regime::Joint,
    };
    let final_error = train::run(&mut net, &patterns, &finetune, Some(&mut logger))?;
    println!("Final mean reconstruction error: {final_error:.6}");

    let activations = net.to_activations(&patterns, Activation::Deterministic)?;
    for row in 0..activations.len() {
        println!("{:>10}: {:?}", patterns.label(row), activations.row(row));
    }

    net.save("train_dbn_net.json")?;
    println!("Net saved to train_dbn_net.json");
    Ok(())
}
