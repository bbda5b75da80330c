//! Pretend scale for bench testing without hardware
//!
//! Run with: cargo run --example simulate_scale [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example simulate_scale                  # listens on 0.0.0.0:4444
//!   cargo run --example simulate_scale 127.0.0.1:4444
//!
//! Point the monitor at it:
//!   cargo run --example monitor 127.0.0.1
//!
//! The simulator waits for a start command, acks it, then streams a slowly
//! wandering weight to whoever asked until a stop command arrives.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time;

use scalelink::protocol::constants::DEFAULT_SEND_PORT;
use scalelink::protocol::{encode_data_frame, ControlCommand};

/// Cadence of the simulated weight stream.
const FRAME_PERIOD: Duration = Duration::from_millis(300);

fn print_usage() {
    eprintln!("Usage: simulate_scale [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to listen on (default: 0.0.0.0:4444)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr: SocketAddr = match args.get(1) {
        Some(text) => match text.parse() {
            Ok(addr) => addr,
            Err(_) => {
                eprintln!("Error: invalid bind address: '{}'", text);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => SocketAddr::from(([0, 0, 0, 0], DEFAULT_SEND_PORT)),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("simulate_scale=info".parse()?),
        )
        .init();

    let socket = UdpSocket::bind(bind_addr).await?;
    println!("Simulated scale listening on {}", socket.local_addr()?);

    let start_frame = ControlCommand::StartStream.encode();
    let stop_frame = ControlCommand::StopStream.encode();

    let mut target: Option<SocketAddr> = None;
    let mut buf = [0u8; 128];
    let mut ticker = time::interval(FRAME_PERIOD);
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            result = socket.recv_from(&mut buf) => {
                let (len, src) = result?;
                let frame = &buf[..len];

                if frame == start_frame.as_slice() {
                    println!("start command from {}", src);
                    socket.send_to(frame, src).await?;
                    target = Some(src);
                } else if frame == stop_frame.as_slice() {
                    println!("stop command from {}", src);
                    socket.send_to(frame, src).await?;
                    target = None;
                } else {
                    println!("ignoring {} unknown bytes from {}", len, src);
                }
            }
            _ = ticker.tick() => {
                if let Some(addr) = target {
                    tick += 1;
                    // A weight that drifts around 10 kg, like someone
                    // nudging the platform.
                    let gross = 10.0 + 2.0 * (tick as f64 * 0.05).sin();
                    let frame = encode_data_frame(gross, "kg", 0.250);
                    socket.send_to(&frame, addr).await?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nShutting down...");
                break;
            }
        }
    }

    Ok(())
}
