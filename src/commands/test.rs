//! Test command implementation.
//!
//! Runs collection cycles without touching the .prom file and displays the
//! results.

use crate::collector;
use crate::config::Config;
use crate::exposition;

/// Tests metrics collection.
pub async fn command_test(
    iterations: usize,
    verbose: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🧪 SMART Textfile Collector - Test Mode");
    println!("=======================================");

    let mut last_rendered = String::new();

    for iteration in 1..=iterations {
        println!("\n🔄 Iteration {}/{}:", iteration, iterations);

        let outcome = collector::collect(config).await?;
        println!("   💽 Probed {} devices", outcome.devices_probed);

        for report in &outcome.reports {
            println!(
                "   ├─ {} ({}, {}): {} attributes",
                report.device,
                report.device.device_type,
                report.device.protocol,
                report.attributes.len()
            );
            if verbose {
                for (attr, value) in &report.attributes {
                    match attr.id {
                        Some(id) => println!("   │  ├─ [{}] {} = {}", id, attr.name, value),
                        None => println!("   │  ├─ {} = {}", attr.name, value),
                    }
                }
            }
        }

        println!(
            "   ⏱️  Cycle duration: {:.2}ms",
            outcome.duration.as_secs_f64() * 1000.0
        );
        println!("   📊 Samples collected: {}", outcome.sample_count());
        println!("   ❌ Failed probes: {}", outcome.devices_failed);

        last_rendered = exposition::render(&outcome, config)?;
    }

    if verbose {
        println!("\n📜 Rendered exposition output:");
        println!("{}", last_rendered);
    } else {
        println!(
            "\n📜 Rendered exposition output: {} bytes (pass --verbose to print it)",
            last_rendered.len()
        );
    }

    println!("\n✅ Test completed successfully");
    Ok(())
}
