//! Interop with the `zmq` crate over TCP: both sides share one wire protocol
//! but own separate contexts.

use std::thread;
use std::time::Duration;

use zmq_nothrow::prelude::*;

fn context() -> Context {
    zmq_nothrow::dev_tracing::init_tracing();
    let mut ctx = Context::new();
    ctx.init(1).expect("context init");
    ctx
}

fn socket<'ctx>(ctx: &'ctx Context, kind: SocketType, options: SocketOptions) -> Socket<'ctx> {
    let mut socket = Socket::new();
    socket.init(ctx, kind).expect("socket init");
    socket
        .apply_options(&options.with_linger(Duration::ZERO))
        .expect("socket options");
    socket
}

fn endpoint() -> String {
    let port = portpicker::pick_unused_port().expect("no free port");
    format!("tcp://127.0.0.1:{port}")
}

#[test]
fn test_rep_answers_libzmq_req() {
    let ctx = context();
    let rep = socket(
        &ctx,
        SocketType::Rep,
        SocketOptions::new().with_recv_timeout(Duration::from_secs(5)),
    );
    let endpoint = endpoint();
    rep.bind(&endpoint).unwrap();

    let client = thread::spawn(move || {
        let zctx = zmq::Context::new();
        let req = zctx.socket(zmq::REQ).unwrap();
        req.set_linger(0).unwrap();
        req.set_rcvtimeo(5000).unwrap();
        req.connect(&endpoint).unwrap();

        req.send("Ping", 0).unwrap();
        req.recv_string(0).unwrap().unwrap()
    });

    let mut request = Message::new();
    request.init().unwrap();
    rep.recv(&mut request, MsgFlags::NONE).unwrap();
    assert_eq!(request.data(), b"Ping");

    request.rebuild_data(zmq_nothrow::Bytes::from_static(b"Pong")).unwrap();
    rep.send(&mut request, MsgFlags::NONE).unwrap();

    assert_eq!(client.join().unwrap(), "Pong");
}

#[test]
fn test_push_multipart_to_libzmq_pull() {
    let ctx = context();
    let endpoint = endpoint();
    let (ready_tx, ready_rx) = flume::bounded(1);

    let bind_at = endpoint.clone();
    let consumer = thread::spawn(move || {
        let zctx = zmq::Context::new();
        let pull = zctx.socket(zmq::PULL).unwrap();
        pull.set_linger(0).unwrap();
        pull.set_rcvtimeo(5000).unwrap();
        pull.bind(&bind_at).unwrap();
        ready_tx.send(()).unwrap();

        pull.recv_multipart(0).unwrap()
    });

    ready_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("consumer never bound");

    let push = socket(
        &ctx,
        SocketType::Push,
        SocketOptions::new().with_send_timeout(Duration::from_secs(5)),
    );
    push.connect(&endpoint).unwrap();
    push.send_multipart(
        [b"order".as_slice(), b"42".as_slice(), b"".as_slice()],
        MsgFlags::NONE,
    )
    .unwrap();

    let frames = consumer.join().unwrap();
    assert_eq!(frames, vec![b"order".to_vec(), b"42".to_vec(), Vec::new()]);
}

#[test]
fn test_router_addresses_libzmq_dealer() {
    let ctx = context();
    let router = socket(
        &ctx,
        SocketType::Router,
        SocketOptions::new()
            .with_recv_timeout(Duration::from_secs(5))
            .with_router_mandatory(true),
    );
    let endpoint = endpoint();
    router.bind(&endpoint).unwrap();

    let peer = thread::spawn(move || {
        let zctx = zmq::Context::new();
        let dealer = zctx.socket(zmq::DEALER).unwrap();
        dealer.set_linger(0).unwrap();
        dealer.set_rcvtimeo(5000).unwrap();
        dealer.set_identity(b"peer-7").unwrap();
        dealer.connect(&endpoint).unwrap();

        dealer.send("Hello", 0).unwrap();
        dealer.recv_string(0).unwrap().unwrap()
    });

    let frames = router.recv_multipart(MsgFlags::NONE).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(&frames[0][..], b"peer-7");
    assert_eq!(&frames[1][..], b"Hello");

    router
        .send_multipart([&frames[0][..], b"World".as_slice()], MsgFlags::NONE)
        .unwrap();

    assert_eq!(peer.join().unwrap(), "World");
}
