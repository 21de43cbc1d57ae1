//! `hubnet validate`

use anyhow::{anyhow, Result};
use hubnet_io::diagnose_instance;
use std::path::Path;

pub fn handle(instance_path: &Path) -> Result<()> {
    let loaded = diagnose_instance(instance_path)?;
    let doc = &loaded.document;

    println!("Instance: {}", instance_path.display());
    println!(
        "  {} hubs, {} satellites, {} clients",
        doc.hubs.len(),
        doc.satellites.len(),
        doc.clients.len()
    );
    println!(
        "  {} client-satellite, {} satellite-hub, {} hub-hub pairs",
        doc.costs.client_satellite.len(),
        doc.costs.satellite_hub.len(),
        doc.costs.hub_hub.len()
    );
    for issue in &loaded.diagnostics.issues {
        println!("  {}", issue);
    }
    println!("Result: {}", loaded.diagnostics.summary());

    if loaded.is_valid() {
        Ok(())
    } else {
        Err(anyhow!(
            "instance '{}' is invalid ({})",
            instance_path.display(),
            loaded.diagnostics.summary()
        ))
    }
}
