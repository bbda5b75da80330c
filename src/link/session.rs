//! The running link: socket ownership and the serialized session loop
//!
//! ```text
//!                    datagrams                commands
//!   UDP socket ----> [reader task] ----+    [ScaleLink handle]
//!        ^                             |           |
//!        |                             v           v
//!        |                      +---------------------+
//!        +---- control frames --|    session loop     |
//!                               | state/monitor/cache |
//!                               +---------------------+
//!                                          |
//!                                          v
//!                                    BroadcastSink
//! ```
//!
//! The reader task does nothing but pull datagrams off the socket; the
//! session loop is the single owner of all mutable link state, so frame
//! handling, health checks, retries, and shutdown can never race.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time;

use crate::broadcast::{BroadcastSink, WeightEvent};
use crate::error::{LinkError, Result};
use crate::link::cache::{ReadingCache, Snapshot};
use crate::link::config::LinkConfig;
use crate::link::monitor::{HealthMonitor, HealthVerdict};
use crate::link::state::SessionState;
use crate::protocol::{self, hexdump, ControlCommand};
use crate::stats::{LinkStats, StatsSnapshot};

/// Time given to the stop command to reach the scale during shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

/// Receive buffer size (scale frames are well under a hundred bytes)
const RECV_BUFFER_LEN: usize = 2048;

/// Queue depth between the socket reader and the session loop
const INBOUND_QUEUE: usize = 128;

/// One datagram as taken off the socket
#[derive(Debug)]
struct Datagram {
    payload: Bytes,
    src: SocketAddr,
}

enum Command {
    Shutdown(oneshot::Sender<()>),
}

/// Handle to a running scale link
///
/// [`ScaleLink::start`] binds the socket, commands the scale to stream,
/// and spawns the session tasks. The handle then serves cached state
/// without ever blocking on the loop. Dropping the handle tears the link
/// down the same way [`ScaleLink::shutdown`] does, minus the ability to
/// await completion.
pub struct ScaleLink {
    command_tx: mpsc::Sender<Command>,
    driver: JoinHandle<()>,
    cache: ReadingCache,
    stats: Arc<LinkStats>,
    local_addr: SocketAddr,
}

impl ScaleLink {
    /// Bring the link up and ask the scale to start streaming
    ///
    /// Only a bind failure is an error. Everything after the bind is
    /// best-effort: a start command that cannot be sent takes the same
    /// retry path as a lost scale, and the scale not answering at all is
    /// the health monitor's business.
    pub async fn start(config: LinkConfig, sink: impl BroadcastSink) -> Result<ScaleLink> {
        let bind_addr = config.bind_endpoint();
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|source| LinkError::Bind { addr: bind_addr, source })?;
        let local_addr = socket
            .local_addr()
            .map_err(|source| LinkError::Bind { addr: bind_addr, source })?;
        let socket = Arc::new(socket);

        let scale_endpoint = config.scale_endpoint();
        let stats = Arc::new(LinkStats::new());
        let cache = ReadingCache::new();
        let mut state = SessionState::new(Instant::now());

        tracing::info!(local = %local_addr, scale = %scale_endpoint, "Starting scale link");

        let frame = ControlCommand::StartStream.encode();
        match socket.send_to(&frame, scale_endpoint).await {
            Ok(_) => stats.record_control_send(),
            Err(e) => {
                stats.record_send_failure();
                tracing::warn!(scale = %scale_endpoint, error = %e, "Start command failed, will retry");
                state.schedule_reconnect(Instant::now() + config.reconnect_delay);
            }
        }

        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE);
        let (command_tx, command_rx) = mpsc::channel(4);

        let reader = tokio::spawn(read_loop(Arc::clone(&socket), inbound_tx));

        let driver = Driver {
            socket,
            scale_endpoint,
            reader,
            state,
            monitor: HealthMonitor::new(config.stale_after, config.reconnect_delay),
            health_interval: config.health_interval,
            trace_frames: config.trace_frames,
            cache: cache.clone(),
            stats: Arc::clone(&stats),
            sink: Box::new(sink),
        };
        let driver = tokio::spawn(driver.run(inbound_rx, command_rx));

        Ok(Self {
            command_tx,
            driver,
            cache,
            stats,
            local_addr,
        })
    }

    /// Last reading and connectivity, straight from the cache
    pub fn snapshot(&self) -> Snapshot {
        self.cache.snapshot()
    }

    /// Whether the scale currently counts as reachable
    pub fn is_connected(&self) -> bool {
        self.cache.snapshot().connected
    }

    /// Current counter values
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Address of the bound receive socket
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the stream and tear the session down
    ///
    /// The scale is told to stop, the stop command gets a short grace
    /// period to leave, then both tasks end. Returns once the session loop
    /// has finished.
    pub async fn shutdown(self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.command_tx.send(Command::Shutdown(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
        let _ = self.driver.await;
    }
}

/// Pull datagrams off the socket and queue them for the session loop
///
/// A full queue makes `send` wait, which parks the reader and lets the
/// kernel shed excess datagrams instead of the process buffering them.
async fn read_loop(socket: Arc<UdpSocket>, inbound_tx: mpsc::Sender<Datagram>) {
    let mut buf = [0u8; RECV_BUFFER_LEN];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, src)) => {
                let datagram = Datagram {
                    payload: Bytes::copy_from_slice(&buf[..len]),
                    src,
                };
                if inbound_tx.send(datagram).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "UDP receive failed");
            }
        }
    }
}

/// Single owner of all mutable session state
struct Driver {
    socket: Arc<UdpSocket>,
    scale_endpoint: SocketAddr,
    reader: JoinHandle<()>,
    state: SessionState,
    monitor: HealthMonitor,
    health_interval: Duration,
    trace_frames: bool,
    cache: ReadingCache,
    stats: Arc<LinkStats>,
    sink: Box<dyn BroadcastSink>,
}

impl Driver {
    async fn run(
        mut self,
        mut inbound_rx: mpsc::Receiver<Datagram>,
        mut command_rx: mpsc::Receiver<Command>,
    ) {
        let mut health = time::interval_at(
            time::Instant::now() + self.health_interval,
            self.health_interval,
        );

        let ack = loop {
            tokio::select! {
                maybe = inbound_rx.recv() => match maybe {
                    Some(datagram) => self.on_datagram(datagram),
                    None => {
                        tracing::error!("Socket reader stopped, closing link");
                        break None;
                    }
                },
                _ = health.tick() => self.on_health_tick(),
                _ = time::sleep_until(time::Instant::from_std(
                    self.state.reconnect_at().unwrap_or_else(Instant::now),
                )), if self.state.reconnect_pending() => {
                    self.on_reconnect_due().await;
                }
                command = command_rx.recv() => {
                    // A dropped handle shuts down the same way an explicit
                    // shutdown does, just without anyone waiting on the ack.
                    break match command {
                        Some(Command::Shutdown(ack)) => Some(ack),
                        None => None,
                    };
                }
            }
        };

        self.stop_stream().await;
        self.reader.abort();
        if let Some(ack) = ack {
            let _ = ack.send(());
        }
        tracing::info!("Scale link closed");
    }

    fn on_datagram(&mut self, datagram: Datagram) {
        self.stats.record_frame_received(datagram.payload.len());
        if self.trace_frames {
            tracing::debug!(
                src = %datagram.src,
                len = datagram.payload.len(),
                "Frame\n{}",
                hexdump(&datagram.payload)
            );
        } else {
            tracing::trace!(src = %datagram.src, len = datagram.payload.len(), "Frame received");
        }

        // Anything inbound proves the scale is alive, acks included.
        if self.state.on_response(Instant::now()) {
            tracing::info!(src = %datagram.src, "Scale connected");
            self.cache.set_connected(true);
            self.sink.publish(WeightEvent::ConnectivityChanged(true));
        }

        match protocol::decode(&datagram.payload) {
            Ok(Some(reading)) => {
                self.stats.record_reading_decoded();
                tracing::debug!(weight = %reading, "Reading decoded");
                self.cache.store(reading.clone());
                self.sink.publish(WeightEvent::ReadingUpdated(reading));
            }
            Ok(None) => {
                self.stats.record_frame_ignored();
                tracing::debug!(len = datagram.payload.len(), "Control response");
            }
            Err(e) => {
                self.stats.record_decode_failure();
                tracing::debug!(
                    error = %e,
                    len = datagram.payload.len(),
                    "Dropping undecodable frame"
                );
            }
        }
    }

    fn on_health_tick(&mut self) {
        match self.monitor.check(&mut self.state, Instant::now()) {
            HealthVerdict::Healthy => {
                tracing::trace!("Scale link healthy");
            }
            HealthVerdict::WentStale => {
                self.stats.record_disconnect();
                tracing::warn!(
                    stale_after = ?self.monitor.stale_after(),
                    "No data from scale, marking disconnected"
                );
                self.cache.set_connected(false);
                self.sink.publish(WeightEvent::ConnectivityChanged(false));
            }
            HealthVerdict::StillDown => {
                tracing::debug!("Scale still unreachable");
            }
        }
    }

    async fn on_reconnect_due(&mut self) {
        self.state.clear_reconnect();
        self.stats.record_reconnect_attempt();
        tracing::info!(scale = %self.scale_endpoint, "Retrying start command");
        self.send_control(ControlCommand::StartStream).await;
    }

    /// Best-effort control send
    ///
    /// Failures are counted and logged; the health cycle takes care of
    /// retrying.
    async fn send_control(&self, command: ControlCommand) {
        let frame = command.encode();
        match self.socket.send_to(&frame, self.scale_endpoint).await {
            Ok(_) => self.stats.record_control_send(),
            Err(e) => {
                self.stats.record_send_failure();
                tracing::warn!(command = %command, error = %e, "Control send failed");
            }
        }
    }

    async fn stop_stream(&mut self) {
        tracing::info!(scale = %self.scale_endpoint, "Stopping scale stream");
        self.send_control(ControlCommand::StopStream).await;
        // Give the stop command a moment to reach the scale before the
        // socket goes away, so the scale does not keep streaming at a
        // closed port.
        time::sleep(SHUTDOWN_GRACE).await;
    }
}
