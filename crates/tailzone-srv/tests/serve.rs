use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType};
use tailzone_client::StatusSource;
use tailzone_core::{PeerStatus, Status};
use tailzone_srv::handler::PeerDnsHandler;
use tailzone_srv::{server, Config, Engine};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

struct FixedSource(Status);

#[async_trait]
impl StatusSource for FixedSource {
    async fn status(&self) -> tailzone_core::Result<Status> {
        Ok(self.0.clone())
    }
}

fn status() -> Status {
    let mut status = Status {
        self_peer: Some(PeerStatus {
            dns_name: "gw.ts.net.".into(),
            addresses: vec!["100.64.0.1".into()],
            tags: None,
        }),
        ..Default::default()
    };
    status.peer.insert(
        "nodekey:01".into(),
        PeerStatus {
            dns_name: "foo.ts.net.".into(),
            addresses: vec!["100.1.2.3".into(), "fd7a::abcd".into()],
            tags: Some(vec!["tag:prod".into()]),
        },
    );
    status
}

async fn ask(server: SocketAddr, name: &str, qtype: RecordType, class: DNSClass) -> Message {
    let mut query = Query::query(Name::from_ascii(name).unwrap(), qtype);
    query.set_query_class(class);

    let mut request = Message::new();
    request
        .set_id(0x2a)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    request.add_query(query);

    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket
        .send_to(&request.to_vec().unwrap(), server)
        .await
        .unwrap();

    let mut buf = vec![0u8; 4096];
    let (len, _) = tokio::time::timeout(Duration::from_secs(5), socket.recv_from(&mut buf))
        .await
        .expect("no response within 5s")
        .unwrap();
    Message::from_vec(&buf[..len]).unwrap()
}

#[tokio::test]
async fn serves_peer_zones_over_udp() {
    let config = Config::new("corp.example.com.")
        .with_tag("prod", "example.com.")
        .with_refresh_interval(Duration::from_secs(60));
    let engine = Engine::new(config, FixedSource(status())).unwrap();
    let refresh = engine.start().await.unwrap();
    assert!(engine.ready());

    let (udp, tcp) = server::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = udp.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handler = PeerDnsHandler::new(engine.resolver());
    let serving = tokio::spawn(server::serve(handler, udp, tcp, async move {
        let _ = stop_rx.await;
    }));

    // Host answer: CNAME to the peer's own name plus its addresses.
    let response = ask(addr, "foo.example.com.", RecordType::A, DNSClass::IN).await;
    assert_eq!(response.id(), 0x2a);
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert!(response.authoritative());
    assert!(!response.recursion_available());
    let types: Vec<_> = response.answers().iter().map(|rr| rr.record_type()).collect();
    assert_eq!(types, vec![RecordType::CNAME, RecordType::A, RecordType::AAAA]);
    match response.answers()[0].data() {
        RData::CNAME(target) => assert_eq!(target.0.to_string(), "foo.ts.net."),
        other => panic!("unexpected rdata: {other:?}"),
    }

    // Missing host: NXDOMAIN with the zone SOA.
    let response = ask(addr, "nobody.corp.example.com.", RecordType::A, DNSClass::IN).await;
    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.authoritative());
    assert_eq!(response.name_servers().len(), 1);
    assert_eq!(response.name_servers()[0].record_type(), RecordType::SOA);
    assert_eq!(
        response.name_servers()[0].name().to_string(),
        "corp.example.com."
    );

    // Apex NS.
    let response = ask(addr, "example.com.", RecordType::NS, DNSClass::IN).await;
    assert_eq!(response.answers().len(), 1);
    match response.answers()[0].data() {
        RData::NS(ns) => assert_eq!(ns.0.to_string(), "ns.example.com."),
        other => panic!("unexpected rdata: {other:?}"),
    }

    // Not ours: falls through to the terminal handler.
    let response = ask(addr, "www.example.org.", RecordType::A, DNSClass::IN).await;
    assert_eq!(response.response_code(), ResponseCode::ServFail);
    let response = ask(addr, "foo.example.com.", RecordType::A, DNSClass::CH).await;
    assert_eq!(response.response_code(), ResponseCode::ServFail);

    stop_tx.send(()).unwrap();
    serving.await.unwrap().unwrap();

    refresh.stop().await;
    assert!(!engine.ready());
}
