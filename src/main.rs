//! Binary entrypoint: builds a seeded network from the environment and runs one backward pass.

use microdnn::{config, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cfg = config::from_env()?;
    let report = run(&cfg)?;
    println!("outputs: {:?}", report.outputs);
    println!("loss: {}", report.loss);
    println!("parameter grads: {:?}", report.parameter_grads);
    Ok(())
}
