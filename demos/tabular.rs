use online_nn::{Dataset, LayerKind, Network, NetworkConfig, TrainingReport};
use tracing_subscriber::EnvFilter;

/// Hourly readings: hour, site, irradiance, ambient temperature, output power.
const ROWS: [[&str; 5]; 12] = [
    ["6", "north", "120", "14.0", "0.9"],
    ["8", "north", "410", "16.5", "3.1"],
    ["10", "north", "720", "19.0", "5.6"],
    ["12", "north", "880", "22.5", "6.8"],
    ["14", "north", "760", "23.0", "5.9"],
    ["16", "north", "430", "21.0", "3.3"],
    ["6", "south", "150", "15.0", "1.2"],
    ["8", "south", "460", "17.5", "3.6"],
    ["10", "south", "790", "20.5", "6.3"],
    ["12", "south", "940", "24.0", "7.4"],
    ["14", "south", "800", "24.5", "6.4"],
    ["16", "south", "470", "22.0", "3.7"],
];

fn main() -> online_nn::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut dataset = Dataset::new(["hour", "site", "irradiance", "temperature", "power"], 4, 1.0)?;
    for row in &ROWS {
        dataset.add_row(row)?;
    }
    dataset.process_features();
    println!("features: {:?}", dataset.output_features());

    let config = NetworkConfig::new(dataset.num_features(), 2000, 1e-8, 4, 0.01);
    let mut network = Network::new(config)?;
    network.add_layer(LayerKind::prelu(), 8)?;
    network.add_output_layer(LayerKind::prelu())?;
    network.initialize_uniform(42, -0.5, 0.5);
    network.submit_all(dataset.examples()?)?;

    let mut report = TrainingReport::new();
    network.train(&mut report)?;
    println!("{report}");

    for (row, example) in ROWS.iter().zip(dataset.examples()?) {
        let predicted = dataset.unscale_label(network.inference(&example.features)?);
        println!("{} {} -> predicted {:.2} kW, actual {} kW", row[0], row[1], predicted, row[4]);
    }
    Ok(())
}
