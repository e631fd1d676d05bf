use online_nn::{LayerKind, Network, NetworkConfig, TrainingReport};
use tracing_subscriber::EnvFilter;

fn main() -> online_nn::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut network = Network::new(NetworkConfig::new(2, 5000, 1e-7, 10, 0.5))?;
    network.add_layer(LayerKind::prelu(), 4)?;
    network.add_output_layer(LayerKind::sigmoid())?;
    network.initialize_uniform(42, -0.5, 0.5);

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![1.0, 0.0, 1.0, 0.0];
    network.submit_all(inputs.iter().cloned().zip(expected_outputs))?;

    let mut report = TrainingReport::new();
    network.train(&mut report)?;

    for (epoch, loss) in report.losses.iter().enumerate().step_by(500) {
        println!("Epoch {epoch}: loss = {loss:.6}");
    }

    for input in &inputs {
        println!(
            "Input: {:?} -> Output: {:.4} (class {})",
            input,
            network.inference(input)?,
            network.lookup(input)?
        );
    }
    Ok(())
}
