#![allow(dead_code)]
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

/// How the mock answers each query it receives.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// NOERROR with one A record per address.
    Answer(Vec<Ipv4Addr>),
    /// RCODE 3 with no records.
    NxDomain,
    /// A valid answer carrying a different ID.
    WrongId,
    /// Never replies.
    Silent,
}

/// Loopback UDP DNS server running on its own thread until dropped.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MockDnsServer {
    pub fn start(behavior: Behavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0)))?;
        socket.set_read_timeout(Some(Duration::from_millis(20)))?;
        let addr = socket.local_addr()?;

        let queries = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let queries = Arc::clone(&queries);
            let shutdown = Arc::clone(&shutdown);
            std::thread::spawn(move || {
                let mut buf = vec![0u8; 512];
                while !shutdown.load(Ordering::Relaxed) {
                    let Ok((len, peer)) = socket.recv_from(&mut buf) else {
                        continue;
                    };
                    queries.fetch_add(1, Ordering::Relaxed);
                    if let Some(response) = Self::build_mock_response(&buf[..len], &behavior) {
                        let _ = socket.send_to(&response, peer);
                    }
                }
            })
        };

        Ok(Self {
            addr,
            queries,
            shutdown,
            handle: Some(handle),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries_received(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    fn build_mock_response(query: &[u8], behavior: &Behavior) -> Option<Vec<u8>> {
        if query.len() < 12 {
            return None;
        }

        let (rcode, addrs): (u8, &[Ipv4Addr]) = match behavior {
            Behavior::Answer(addrs) => (0, addrs.as_slice()),
            Behavior::NxDomain => (3, &[][..]),
            Behavior::WrongId => (0, &[][..]),
            Behavior::Silent => return None,
        };

        let mut response = Vec::with_capacity(512);

        let mut id = [query[0], query[1]];
        if matches!(behavior, Behavior::WrongId) {
            id[0] ^= 0x80;
        }
        response.extend_from_slice(&id);

        response.push(0x81);
        response.push(0x80 | rcode);

        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&(addrs.len() as u16).to_be_bytes());
        response.extend_from_slice(&[0x00, 0x00]);
        response.extend_from_slice(&[0x00, 0x00]);

        response.extend_from_slice(&query[12..]);

        for addr in addrs {
            response.extend_from_slice(&[
                0xc0, 0x0c, // pointer to question name
                0x00, 0x01, // A
                0x00, 0x01, // IN
                0x00, 0x00, 0x00, 0x3c, // TTL 60
                0x00, 0x04,
            ]);
            response.extend_from_slice(&addr.octets());
        }

        Some(response)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
