//! Loopback GetNext responder for testing.
//!
//! Answers each GetNext with the first entry after the requested OID, or
//! `endOfMibView` past the last one. Binds an ephemeral localhost port and
//! stops on drop.

use bytes::Bytes;
use snmp_walker::message::CommunityMessage;
use snmp_walker::pdu::{Pdu, PduType};
use snmp_walker::{Oid, Value, VarBind};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct TestAgent {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

impl TestAgent {
    /// Serve `data`, answering only community "public".
    pub async fn with_data(data: BTreeMap<Oid, Value>) -> Self {
        Self::start(data, b"public", None).await
    }

    /// Serve `data` but stop answering after `limit` replies.
    pub async fn answering(data: BTreeMap<Oid, Value>, limit: usize) -> Self {
        Self::start(data, b"public", Some(limit)).await
    }

    async fn start(
        data: BTreeMap<Oid, Value>,
        community: &'static [u8],
        limit: Option<usize>,
    ) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test agent");
        let addr = socket.local_addr().unwrap();
        let cancel = CancellationToken::new();
        let requests = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn(serve(
            socket,
            data,
            community,
            limit,
            requests.clone(),
            cancel.clone(),
        ));

        Self {
            addr,
            requests,
            cancel,
            _task: task,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Number of datagrams received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for TestAgent {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn serve(
    socket: UdpSocket,
    data: BTreeMap<Oid, Value>,
    community: &'static [u8],
    limit: Option<usize>,
    requests: Arc<AtomicUsize>,
    cancel: CancellationToken,
) {
    let mut buf = vec![0u8; 1500];
    let mut answered = 0usize;

    loop {
        let (len, peer) = tokio::select! {
            _ = cancel.cancelled() => return,
            received = socket.recv_from(&mut buf) => match received {
                Ok(r) => r,
                Err(_) => return,
            },
        };
        requests.fetch_add(1, Ordering::SeqCst);

        let Ok(request) = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..len])) else {
            continue;
        };
        if &request.community[..] != community || request.pdu.pdu_type != PduType::GetNextRequest
        {
            continue;
        }
        if limit.is_some_and(|l| answered >= l) {
            continue;
        }

        let Some(requested) = request.pdu.varbinds.first() else {
            continue;
        };
        let varbind = data
            .range((Bound::Excluded(&requested.oid), Bound::Unbounded))
            .next()
            .map(|(oid, value)| VarBind::new(oid.clone(), value.clone()))
            .unwrap_or_else(|| VarBind::new(requested.oid.clone(), Value::EndOfMibView));

        let reply = CommunityMessage::new(
            request.version,
            request.community.clone(),
            Pdu::response(request.pdu.request_id, vec![varbind]),
        );
        if let Ok(bytes) = reply.encode() {
            let _ = socket.send_to(&bytes, peer).await;
            answered += 1;
        }
    }
}
