//! Live weight monitor
//!
//! Run with: cargo run --example monitor [SCALE_ADDR] [--debug]
//!
//! Examples:
//!   cargo run --example monitor                     # scale at 192.168.4.1
//!   cargo run --example monitor 192.168.1.77        # scale on the lan
//!   cargo run --example monitor 127.0.0.1 --debug   # against simulate_scale
//!
//! The SCALE_IP environment variable works too; the positional argument
//! wins when both are given. --debug turns on frame-level logging.

use std::net::IpAddr;

use scalelink::link::DEFAULT_SCALE_ADDR;
use scalelink::{ChannelSink, LinkConfig, ScaleLink, WeightEvent};

fn print_usage() {
    eprintln!("Usage: monitor [SCALE_ADDR] [--debug]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  SCALE_ADDR   IP address of the scale (default: 192.168.4.1,");
    eprintln!("               or the SCALE_IP environment variable)");
    eprintln!("  --debug      log every frame");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let debug = args.iter().any(|a| a == "--debug");
    let addr_arg = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .cloned()
        .or_else(|| std::env::var("SCALE_IP").ok());

    let scale_addr = match addr_arg {
        Some(text) => match text.parse::<IpAddr>() {
            Ok(addr) => addr,
            Err(_) => {
                eprintln!("Error: invalid scale address: '{}'", text);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => DEFAULT_SCALE_ADDR,
    };

    // Initialize logging
    let level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("scalelink={}", level).parse()?),
        )
        .init();

    let config = LinkConfig {
        scale_addr,
        trace_frames: debug,
        ..LinkConfig::default()
    };
    println!("Scale:   {}", config.scale_endpoint());
    println!("Listens: {}", config.bind_endpoint());
    println!();

    let sink = ChannelSink::default();
    let mut events = sink.subscribe();

    let link = ScaleLink::start(config, sink.clone()).await?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(WeightEvent::ReadingUpdated(reading)) => {
                    println!("{}", reading);
                }
                Ok(WeightEvent::ConnectivityChanged(true)) => {
                    println!("scale connected");
                }
                Ok(WeightEvent::ConnectivityChanged(false)) => {
                    println!("scale disconnected, retrying...");
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    eprintln!("display too slow, dropped {} events", missed);
                }
                Err(_) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("\nShutting down...");
                break;
            }
        }
    }

    let stats = link.stats();
    println!(
        "Session stats: frames={} readings={} decode_failures={} disconnects={}",
        stats.frames_received, stats.readings_decoded, stats.decode_failures, stats.disconnects,
    );

    link.shutdown().await;
    Ok(())
}
