use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket},
    time::Duration,
};

use snafu::{OptionExt, ResultExt};

use crate::{
    config::GelfUdpConfig,
    emit,
    error::{self, WriteError},
    internal_events::{UdpSendBufferSizeError, UdpSocketConnectionEstablished},
    net,
};

/// Opens the path the datagrams of one write are sent on.
pub trait Transport {
    type Destination: Destination;

    /// Called once per write, before the first datagram.
    fn open(&self) -> Result<Self::Destination, WriteError>;
}

/// Sends datagrams of a single write, each as exactly one packet.
pub trait Destination {
    fn send(&self, datagram: &[u8]) -> Result<usize, WriteError>;
}

/// Sends datagrams to a GELF collector over UDP.
///
/// The destination is resolved and a fresh socket connected for every [`UdpTransmitter::open`];
/// nothing is pooled between writes.
#[derive(Clone, Debug)]
pub struct UdpTransmitter {
    host: String,
    port: u16,
    send_buffer_size: Option<usize>,
    send_timeout: Option<Duration>,
}

impl UdpTransmitter {
    pub fn from_config(config: &GelfUdpConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            send_buffer_size: config.send_buffer_size,
            send_timeout: config.send_timeout,
        }
    }

    fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolves the destination to its first socket address.
    pub fn resolve(&self) -> Result<SocketAddr, WriteError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|_| error::FailedToResolve {
                address: self.address(),
            })?
            .next()
            .with_context(|| error::NoAddresses {
                address: self.address(),
            })
    }

    /// Binds a local socket of the same address family as `addr` and connects it.
    pub fn connect(&self, addr: SocketAddr) -> Result<UdpDestination, WriteError> {
        let bind_address = find_bind_address(&addr);
        let socket = UdpSocket::bind(bind_address).context(error::FailedToBind)?;

        if let Some(size) = self.send_buffer_size {
            if let Err(error) = net::set_send_buffer_size(&socket, size) {
                emit!(UdpSendBufferSizeError { error, size });
            }
        }

        socket
            .set_write_timeout(self.send_timeout)
            .context(error::FailedToConfigure)?;
        socket.connect(addr).context(error::FailedToConnect)?;

        emit!(UdpSocketConnectionEstablished { peer_addr: addr });

        Ok(UdpDestination { socket, addr })
    }

    /// Resolves and connects in one step.
    pub fn open(&self) -> Result<UdpDestination, WriteError> {
        let addr = self.resolve()?;
        self.connect(addr)
    }
}

impl Transport for UdpTransmitter {
    type Destination = UdpDestination;

    fn open(&self) -> Result<UdpDestination, WriteError> {
        UdpTransmitter::open(self)
    }
}

/// A connected UDP socket for the datagrams of a single write.
#[derive(Debug)]
pub struct UdpDestination {
    socket: UdpSocket,
    addr: SocketAddr,
}

impl UdpDestination {
    pub const fn peer_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Destination for UdpDestination {
    /// Writes `datagram` as exactly one UDP packet. A short write is an error.
    fn send(&self, datagram: &[u8]) -> Result<usize, WriteError> {
        let sent = self.socket.send(datagram).context(error::FailedToSend)?;
        if sent != datagram.len() {
            return error::SendIncomplete {
                data_size: datagram.len(),
                sent,
            }
            .fail();
        }
        Ok(sent)
    }
}

pub(crate) const fn find_bind_address(remote_addr: &SocketAddr) -> SocketAddr {
    match remote_addr {
        SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    }
}
