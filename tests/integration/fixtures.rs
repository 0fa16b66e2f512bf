//! Shared configuration and dispatch helpers.

use p2pgate::{
    Gateway, GatewayConfig, QueryDispatcher, QueryRequest, QueryResponse, QueryStatus, Request,
};

pub const PSK: &str = "00112233445566778899aabbccddeeff";

pub fn basic_config() -> GatewayConfig {
    GatewayConfig::from_json(&format!(
        r#"{{ "id": "gw.demo.net", "presharedKey": "{PSK}" }}"#
    ))
    .unwrap()
}

pub fn admin_config() -> GatewayConfig {
    GatewayConfig::from_json(&format!(
        r#"{{
            "id": "lock1.demo.net",
            "presharedKey": "{PSK}",
            "localPort": 5570,
            "device": {{
                "name": "Lock-1",
                "productName": "SmartLock",
                "iconUrl": "img/lock.png",
                "iface": {{ "id": "lock-iface", "version": {{ "major": 1, "minor": 4 }} }},
                "permission": {{ "dbFile": "acl.db" }}
            }}
        }}"#
    ))
    .unwrap()
}

/// Run one query through `gw` with a response buffer of `capacity` bytes.
pub fn dispatch_with(
    gw: &mut Gateway,
    request: &Request,
    payload: &[u8],
    capacity: usize,
) -> (QueryStatus, Vec<u8>) {
    let mut buf = vec![0u8; capacity];
    let mut resp = QueryResponse::new(&mut buf);
    let status = gw.dispatch(request, &mut QueryRequest::new(payload), &mut resp);
    let body = resp.as_bytes().to_vec();
    (status, body)
}

pub fn dispatch(gw: &mut Gateway, request: &Request, payload: &[u8]) -> (QueryStatus, Vec<u8>) {
    dispatch_with(gw, request, payload, 512)
}

/// Encode `bytes` as a u16-length-prefixed list.
pub fn list(bytes: &[u8]) -> Vec<u8> {
    let mut out = (bytes.len() as u16).to_be_bytes().to_vec();
    out.extend_from_slice(bytes);
    out
}
