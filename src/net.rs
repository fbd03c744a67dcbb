use socket2::SockRef;

/// Sets the send buffer size for a socket.
///
/// This is the equivalent of setting the `SO_SNDBUF` socket setting directly.
///
/// # Errors
///
/// If there is an error setting the send buffer size on the given socket, an error variant
/// will be returned explaining the underlying I/O error.
pub fn set_send_buffer_size<'s, S>(socket: &'s S, size: usize) -> std::io::Result<()>
where
    SockRef<'s>: From<&'s S>,
{
    SockRef::from(socket).set_send_buffer_size(size)
}

#[cfg(test)]
mod tests {
    use std::net::UdpSocket;

    use socket2::SockRef;

    use super::set_send_buffer_size;

    #[test]
    fn sets_send_buffer_size() {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        set_send_buffer_size(&socket, 65536).unwrap();
        // Kernels round the value (Linux doubles it), so only check the lower bound.
        assert!(SockRef::from(&socket).send_buffer_size().unwrap() >= 65536);
    }
}
