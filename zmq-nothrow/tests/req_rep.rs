use std::time::Duration;

use zmq_nothrow::prelude::*;
use zmq_nothrow_core::error::EFSM;

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

#[test]
fn test_inproc_round_trip_preserves_bytes() {
    let ctx = context();
    let rep = socket(&ctx, SocketType::Rep, SocketOptions::new());
    rep.bind("inproc://req-rep-bytes").unwrap();
    let req = socket(&ctx, SocketType::Req, SocketOptions::new());
    req.connect("inproc://req-rep-bytes").unwrap();

    let payload: Vec<u8> = (0..=255).collect();

    let mut request = Message::new();
    request.init_size(payload.len()).unwrap();
    request.data_mut().copy_from_slice(&payload);
    assert_eq!(req.send(&mut request, MsgFlags::NONE).unwrap(), payload.len());

    // libzmq owns the content now; the message is live and empty.
    assert!(request.is_initialized());
    assert_eq!(request.size(), 0);

    let mut received = Message::new();
    received.init().unwrap();
    assert_eq!(rep.recv(&mut received, MsgFlags::NONE).unwrap(), payload.len());
    assert_eq!(received.data(), &payload[..]);
    assert!(!received.more());

    // Echo it back through the same message.
    rep.send(&mut received, MsgFlags::NONE).unwrap();
    req.recv(&mut request, MsgFlags::NONE).unwrap();
    assert_eq!(request.data(), &payload[..]);
}

#[test]
fn test_zero_copy_message_crosses_inproc() {
    let ctx = context();
    let push = socket(&ctx, SocketType::Push, SocketOptions::new());
    push.bind("inproc://zero-copy").unwrap();
    let pull = socket(&ctx, SocketType::Pull, SocketOptions::new());
    pull.connect("inproc://zero-copy").unwrap();

    let mut msg = Message::new();
    msg.init_data(bytes::Bytes::from(vec![0x5Au8; 8192])).unwrap();
    push.send(&mut msg, MsgFlags::NONE).unwrap();

    let mut received = Message::new();
    received.init().unwrap();
    pull.recv(&mut received, MsgFlags::NONE).unwrap();
    assert_eq!(received.size(), 8192);
    assert!(received.data().iter().all(|&b| b == 0x5A));
}

#[test]
fn test_multipart_carries_routing_id() {
    let ctx = context();
    let router = socket(&ctx, SocketType::Router, SocketOptions::new());
    router.bind("inproc://multipart").unwrap();
    let dealer = socket(
        &ctx,
        SocketType::Dealer,
        SocketOptions::new().with_routing_id("dealer-1"),
    );
    dealer.connect("inproc://multipart").unwrap();

    dealer
        .send_multipart(
            [b"header".as_slice(), b"".as_slice(), b"body".as_slice()],
            MsgFlags::NONE,
        )
        .unwrap();

    let frames = router.recv_multipart(MsgFlags::NONE).unwrap();
    assert_eq!(frames.len(), 4);
    assert_eq!(&frames[0][..], b"dealer-1");
    assert_eq!(&frames[1][..], b"header");
    assert!(frames[2].is_empty());
    assert_eq!(&frames[3][..], b"body");

    router
        .send_multipart([&frames[0][..], b"reply".as_slice()], MsgFlags::NONE)
        .unwrap();
    let reply = dealer.recv_bytes(MsgFlags::NONE).unwrap();
    assert_eq!(&reply[..], b"reply");
    assert!(!dealer.has_more().unwrap());
}

#[test]
fn test_dontwait_on_idle_socket_is_again() {
    let ctx = context();
    let pull = socket(&ctx, SocketType::Pull, SocketOptions::new());
    pull.bind("inproc://idle").unwrap();

    let err = pull.recv_bytes(MsgFlags::DONTWAIT).unwrap_err();
    assert!(err.is_again());
    assert!(err.is_recoverable());
}

#[test]
fn test_req_out_of_order_send_is_efsm() {
    let ctx = context();
    let rep = socket(&ctx, SocketType::Rep, SocketOptions::new());
    rep.bind("inproc://efsm").unwrap();
    let req = socket(&ctx, SocketType::Req, SocketOptions::new());
    req.connect("inproc://efsm").unwrap();

    req.send_bytes(b"first", MsgFlags::NONE).unwrap();
    let err = req.send_bytes(b"second", MsgFlags::NONE).unwrap_err();
    assert_eq!(err.errno(), Some(EFSM));
}

#[test]
fn test_tcp_wildcard_bind_reports_endpoint() {
    let ctx = context();
    let rep = socket(&ctx, SocketType::Rep, SocketOptions::new());
    rep.bind("tcp://127.0.0.1:*").unwrap();

    let endpoint = rep.last_endpoint().unwrap();
    assert!(endpoint.starts_with("tcp://127.0.0.1:"), "{endpoint}");
    assert!(!endpoint.ends_with('*'));

    let req = socket(&ctx, SocketType::Req, SocketOptions::new());
    req.connect(&endpoint).unwrap();
    req.send_bytes(b"over tcp", MsgFlags::NONE).unwrap();
    assert_eq!(&rep.recv_bytes(MsgFlags::NONE).unwrap()[..], b"over tcp");

    rep.unbind(&endpoint).unwrap();
    req.disconnect(&endpoint).unwrap();
}
