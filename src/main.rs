mod config;
mod mqtt;
mod serial;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use p1mon::reader::P1Reader;
use std::fs::File;

fn main() -> Result<()> {
    env_logger::init();

    let config = config::Config::parse();
    info!("Starting p1mon");

    let reader = match &config.input {
        Some(path) => {
            info!("Replaying P1 trace from {}", path);
            let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
            P1Reader::start(file, config.reader_config())
        }
        None => P1Reader::start(serial::open_port(&config)?, config.reader_config()),
    }
    .context("Failed to start P1 reader")?;

    for telegram in reader.iter() {
        if config.print {
            println!("{}", mqtt::TelegramPayload::new(&telegram).to_json()?);
        } else if let Err(e) = mqtt::publish_telegram(&config, &telegram) {
            error!("Failed to publish: {}", e);
        }
    }

    let stats = reader.join().context("P1 reader failed")?;
    info!(
        "Done: {} telegram(s), {} discarded, {} checksum failure(s)",
        stats.telegrams, stats.discarded, stats.checksum_failures
    );
    Ok(())
}
