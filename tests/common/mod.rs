#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{Ipv4Addr, TcpListener};
use std::thread::{self, JoinHandle};

const TABLE_DUMP_V2: u16 = 13;
const PEER_INDEX_TABLE: u16 = 1;
const RIB_IPV4_UNICAST: u16 = 2;

/// One RIB entry of the fixture: prefix, prefix length and AS path.
/// `None` leaves the AS_PATH attribute out entirely.
pub struct RibEntry {
    pub prefix: Ipv4Addr,
    pub len: u8,
    pub path: Option<Vec<u32>>,
}

fn mrt_record(subtype: u16, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&1_696_118_400u32.to_be_bytes());
    out.extend_from_slice(&TABLE_DUMP_V2.to_be_bytes());
    out.extend_from_slice(&subtype.to_be_bytes());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

fn peer_index_table() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[192, 0, 2, 254]);
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    // IPv4 peer, 4-byte AS number
    body.push(0x02);
    body.extend_from_slice(&[192, 0, 2, 1]);
    body.extend_from_slice(&[192, 0, 2, 1]);
    body.extend_from_slice(&64496u32.to_be_bytes());
    mrt_record(PEER_INDEX_TABLE, &body)
}

fn attributes(path: &Option<Vec<u32>>) -> Vec<u8> {
    let mut attrs = vec![0x40, 0x01, 0x01, 0x00];
    if let Some(asns) = path {
        attrs.extend_from_slice(&[0x40, 0x02, (2 + 4 * asns.len()) as u8]);
        attrs.extend_from_slice(&[0x02, asns.len() as u8]);
        for asn in asns {
            attrs.extend_from_slice(&asn.to_be_bytes());
        }
    }
    attrs.extend_from_slice(&[0x40, 0x03, 0x04, 192, 0, 2, 1]);
    attrs
}

fn rib_record(sequence: u32, entry: &RibEntry) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&sequence.to_be_bytes());
    body.push(entry.len);
    let octets = entry.prefix.octets();
    body.extend_from_slice(&octets[..(entry.len as usize + 7) / 8]);
    body.extend_from_slice(&1u16.to_be_bytes());

    let attrs = attributes(&entry.path);
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&1_696_118_000u32.to_be_bytes());
    body.extend_from_slice(&(attrs.len() as u16).to_be_bytes());
    body.extend_from_slice(&attrs);
    mrt_record(RIB_IPV4_UNICAST, &body)
}

/// A TABLE_DUMP_V2 RIB dump with one peer and one record per entry.
pub fn mrt_rib_dump(entries: &[RibEntry]) -> Vec<u8> {
    let mut out = peer_index_table();
    for (sequence, entry) in entries.iter().enumerate() {
        out.extend(rib_record(sequence as u32, entry));
    }
    out
}

pub fn sample_entries() -> Vec<RibEntry> {
    vec![
        RibEntry {
            prefix: Ipv4Addr::new(203, 0, 113, 0),
            len: 24,
            path: Some(vec![64496, 3356, 15169]),
        },
        RibEntry {
            prefix: Ipv4Addr::new(198, 51, 100, 0),
            len: 24,
            path: Some(vec![64496, 3356, 3356, 13335]),
        },
        RibEntry {
            prefix: Ipv4Addr::new(192, 0, 2, 0),
            len: 24,
            path: None,
        },
    ]
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// Gzip member holding `data` in stored (uncompressed) deflate blocks.
pub fn gzip_stored(data: &[u8]) -> Vec<u8> {
    let mut out = vec![0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xff];
    let mut chunks = data.chunks(u16::MAX as usize).peekable();
    if chunks.peek().is_none() {
        out.extend_from_slice(&[0x01, 0x00, 0x00, 0xff, 0xff]);
    }
    while let Some(chunk) = chunks.next() {
        out.push(if chunks.peek().is_none() { 0x01 } else { 0x00 });
        let len = chunk.len() as u16;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(chunk);
    }
    out.extend_from_slice(&crc32(data).to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out
}

/// Answers one connection per canned response, in order, then stops.
pub struct StubServer {
    pub url: String,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    pub fn serve(responses: Vec<(u16, Vec<u8>)>) -> Self {
        let raw = responses
            .into_iter()
            .map(|(status, body)| {
                let reason = if status == 200 { "OK" } else { "Not Found" };
                let mut response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    reason,
                    body.len()
                )
                .into_bytes();
                response.extend(body);
                response
            })
            .collect();
        Self::serve_raw(raw)
    }

    /// Writes each response verbatim, so it may lie about its length.
    pub fn serve_raw(responses: Vec<Vec<u8>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut paths = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                paths.push(
                    request_line
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or_default()
                        .to_string(),
                );
                loop {
                    let mut header = String::new();
                    if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                        break;
                    }
                }

                stream.write_all(&response).unwrap();
                stream.flush().unwrap();
            }
            paths
        });

        StubServer { url, handle }
    }

    /// Request paths seen, once every response was served.
    pub fn finish(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}
