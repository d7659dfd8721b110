//! Process-crossing fabric transport, feature-gated behind `zmq-transport`
//!
//! The original places a ZMQ-backed message bus alongside the in-process
//! one so a backend can be split across processes without touching
//! population or projection code (§4.3). This module wires the same
//! [`crate::endpoint::Endpoint`]/[`crate::bus::Bus`] API onto a ZMQ PUB/SUB
//! pair: `ZmqPublisher` serializes outgoing envelopes onto a PUB socket,
//! `ZmqSubscriber` reads them back off a SUB socket into a local [`Bus`] so
//! the rest of the fabric never has to know the transport changed.

use crate::bus::Bus;
use crate::error::{FabricError, Result};
use log::{debug, warn};
use snn_core::message::{decode_spike, encode_spike, SpikeMessage};
use zmq::{Context, Socket};

/// Publishes locally produced spike messages onto a ZMQ PUB socket
pub struct ZmqPublisher {
    socket: Socket,
}

impl ZmqPublisher {
    /// Bind a PUB socket at `endpoint` (e.g. `"tcp://*:5555"`)
    pub fn bind(context: &Context, endpoint: &str) -> Result<Self> {
        let socket = context
            .socket(zmq::PUB)
            .map_err(|_| FabricError::BusDisconnected)?;
        socket
            .bind(endpoint)
            .map_err(|_| FabricError::BusDisconnected)?;
        Ok(Self { socket })
    }

    /// Serialize and publish a spike message
    pub fn publish_spike(&self, message: &SpikeMessage) -> Result<()> {
        let bytes = encode_spike(message);
        self.socket
            .send(&bytes, 0)
            .map_err(|_| FabricError::BusDisconnected)?;
        debug!(
            "published spike message from {} at step {}",
            message.sender_uid, message.send_time
        );
        Ok(())
    }
}

/// Reads spike messages off a ZMQ SUB socket and injects them into a local
/// [`Bus`] as if they had originated in-process
pub struct ZmqSubscriber {
    socket: Socket,
    bus: Bus,
}

impl ZmqSubscriber {
    /// Connect a SUB socket to `endpoint`, subscribing to every topic
    pub fn connect(context: &Context, endpoint: &str, bus: Bus) -> Result<Self> {
        let socket = context
            .socket(zmq::SUB)
            .map_err(|_| FabricError::BusDisconnected)?;
        socket
            .connect(endpoint)
            .map_err(|_| FabricError::BusDisconnected)?;
        socket
            .set_subscribe(b"")
            .map_err(|_| FabricError::BusDisconnected)?;
        Ok(Self { socket, bus })
    }

    /// Drain every message currently available without blocking, injecting
    /// decodable spike messages into the local bus
    pub fn poll_into_bus(&self) -> Result<usize> {
        let mut received = 0;
        loop {
            match self.socket.recv_bytes(zmq::DONTWAIT) {
                Ok(bytes) => {
                    if let Some(message) = decode_spike(&bytes) {
                        self.bus.send_message(message);
                        received += 1;
                    } else {
                        warn!("dropped undecodable frame of {} bytes", bytes.len());
                    }
                }
                Err(zmq::Error::EAGAIN) => break,
                Err(_) => return Err(FabricError::BusDisconnected),
            }
        }
        Ok(received)
    }
}
