//! Wire-level DNS queries against a specific server.
//!
//! Used where resolver recursion would hide what a server actually says:
//! referral additional sections (glue) and per-server NS opinions
//! (cross-referencing). One query, one UDP exchange, no retries.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use hickory_resolver::proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_resolver::proto::rr::{Name, Record, RecordType, record_data::RData};
use tokio::net::UdpSocket;
use tokio::time::timeout;

use super::{LookupError, LookupErrorKind, RawResponse, RecordKind, WireRecord};

/// EDNS payload size advertised on outgoing queries. Referral responses with
/// full glue routinely exceed the classic 512-byte limit.
const EDNS_MAX_PAYLOAD: u16 = 4096;

const DNS_PORT: u16 = 53;

fn record_type_for(kind: RecordKind) -> RecordType {
    match kind {
        RecordKind::Ns => RecordType::NS,
        RecordKind::A => RecordType::A,
        RecordKind::Aaaa => RecordType::AAAA,
    }
}

/// Strip the trailing root dot and lowercase, the engine-wide name form.
fn normalize_name(name: &Name) -> String {
    name.to_string().trim_end_matches('.').to_lowercase()
}

fn parse_query_name(name: &str) -> Result<Name, LookupError> {
    if name == "." || name.is_empty() {
        return Ok(Name::root());
    }
    let absolute = format!("{}.", name.trim_end_matches('.'));
    Name::from_ascii(&absolute)
        .map_err(|e| LookupError::other(format!("invalid query name {name}: {e}")))
}

fn build_query(name: &Name, kind: RecordKind) -> Message {
    let mut message = Message::new();
    message.set_id(rand::random::<u16>());
    message.set_message_type(MessageType::Query);
    message.set_op_code(OpCode::Query);
    message.set_recursion_desired(false);
    message.add_query(Query::query(name.clone(), record_type_for(kind)));

    let mut edns = Edns::new();
    edns.set_max_payload(EDNS_MAX_PAYLOAD);
    edns.set_version(0);
    message.set_edns(edns);

    message
}

/// Keep NS/A/AAAA records, normalized into [`WireRecord`] values.
fn collect_records(records: &[Record]) -> Vec<WireRecord> {
    let mut out = Vec::new();
    for record in records {
        let owner = normalize_name(record.name());
        match record.data() {
            RData::NS(ns) => {
                out.push(WireRecord::new(owner, RecordKind::Ns, normalize_name(&ns.0)));
            }
            RData::A(a) => {
                out.push(WireRecord::new(owner, RecordKind::A, a.0.to_string()));
            }
            RData::AAAA(aaaa) => {
                out.push(WireRecord::new(owner, RecordKind::Aaaa, aaaa.0.to_string()));
            }
            _ => {}
        }
    }
    out
}

/// Send one non-recursive query for `name` to `server` and decode the
/// response sections.
pub(crate) async fn query_server(
    name: &str,
    kind: RecordKind,
    server: IpAddr,
    query_timeout: Duration,
) -> Result<RawResponse, LookupError> {
    let query_name = parse_query_name(name)?;
    let message = build_query(&query_name, kind);
    let request_id = message.id();
    let bytes = message
        .to_vec()
        .map_err(|e| LookupError::other(format!("failed to encode query for {name}: {e}")))?;

    let bind_addr: SocketAddr = if server.is_ipv4() {
        "0.0.0.0:0"
    } else {
        "[::]:0"
    }
    .parse()
    .map_err(|e| LookupError::other(format!("failed to parse bind address: {e}")))?;

    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| LookupError::other(format!("failed to bind UDP socket: {e}")))?;
    socket
        .send_to(&bytes, SocketAddr::new(server, DNS_PORT))
        .await
        .map_err(|e| LookupError::other(format!("failed to send query to {server}: {e}")))?;

    let mut buf = vec![0u8; usize::from(EDNS_MAX_PAYLOAD)];
    let (len, _) = timeout(query_timeout, socket.recv_from(&mut buf))
        .await
        .map_err(|_| {
            LookupError::new(
                LookupErrorKind::Timeout,
                format!("query to {server} for {name} timed out"),
            )
        })?
        .map_err(|e| LookupError::other(format!("failed to receive from {server}: {e}")))?;

    let response = Message::from_vec(&buf[..len])
        .map_err(|e| LookupError::other(format!("failed to decode response from {server}: {e}")))?;
    if response.id() != request_id {
        return Err(LookupError::other(format!(
            "response ID mismatch from {server}"
        )));
    }

    Ok(RawResponse {
        answers: collect_records(response.answers()),
        authority: collect_records(response.name_servers()),
        additionals: collect_records(response.additionals()),
    })
}

// ==================== probe tests ====================
