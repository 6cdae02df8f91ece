//! A single pooled datagram buffer

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Sentinel address stamped on buffers allocated by a server-mode pool
pub const UNSPECIFIED_REMOTE: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));

/// One datagram's worth of pooled storage
///
/// Holds the payload region, an equally sized scratch region used by the
/// zero-run compaction codec, the meaningful payload length, and the remote
/// endpoint the datagram came from or is headed to. Both regions are allocated
/// once, when the owning segment is created, and live until the segment is
/// reclaimed.
#[derive(Debug)]
pub struct PacketBuffer {
    /// Payload bytes; only `data[..data_length]` is meaningful
    data: Box<[u8]>,
    /// Working space for the zero-run codec; contents undefined between leases
    zero_data: Box<[u8]>,
    /// Length of meaningful data in `data`
    data_length: usize,
    /// Remote endpoint for this datagram
    remote: SocketAddr,
}

impl PacketBuffer {
    /// Allocate a buffer stamped with the given remote endpoint
    pub(crate) fn new(capacity: usize, remote: SocketAddr) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            zero_data: vec![0u8; capacity].into_boxed_slice(),
            data_length: 0,
            remote,
        }
    }

    /// Capacity of the payload region (the scratch region is the same size)
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Length of meaningful payload data
    pub fn data_length(&self) -> usize {
        self.data_length
    }

    /// Set the meaningful payload length
    ///
    /// Fails when `length` exceeds the buffer capacity.
    pub fn set_data_length(&mut self, length: usize) -> crate::error::Result<()> {
        if length > self.data.len() {
            return Err(crate::error::GridlinkError::insufficient_space(
                length,
                self.data.len(),
            ));
        }
        self.data_length = length;
        Ok(())
    }

    pub(crate) fn reset_length(&mut self) {
        self.data_length = 0;
    }

    /// The meaningful payload, `data[..data_length]`
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.data_length]
    }

    /// Mutable view of the meaningful payload
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.data_length]
    }

    /// The full payload region, regardless of `data_length`
    ///
    /// The receive path writes the incoming datagram here first, then records
    /// the byte count with [`set_data_length`](Self::set_data_length).
    pub fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The full scratch region
    pub fn zero_data(&self) -> &[u8] {
        &self.zero_data
    }

    /// Mutable view of the full scratch region
    pub fn zero_data_mut(&mut self) -> &mut [u8] {
        &mut self.zero_data
    }

    /// Remote endpoint for this datagram
    ///
    /// Client-mode pools stamp every buffer with the pool's fixed endpoint at
    /// allocation time. Server-mode pools stamp the unspecified sentinel;
    /// checkout and return never touch this field, so a reused buffer carries
    /// the address of its previous lease until the caller overwrites it. The
    /// network layer must set it after each receive and before each send.
    pub fn remote(&self) -> SocketAddr {
        self.remote
    }

    /// Set the remote endpoint
    pub fn set_remote(&mut self, remote: SocketAddr) {
        self.remote = remote;
    }
}
