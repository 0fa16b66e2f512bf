//! Fuzz target: full dispatch in administrative mode.
//!
//! The first four bytes pick the query id (folded onto the built-in range
//! half the time), the fifth sets the caller's standing, the rest is the
//! payload. Dispatch must never panic and must stay inside the response
//! buffer.
//!
//! cargo fuzz run fuzz_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use p2pgate::adapters::acl_memory::MemoryAcl;
use p2pgate::rpc::auth::Permissions;
use p2pgate::{
    Fingerprint, Gateway, GatewayConfig, QueryDispatcher, QueryRequest, QueryResponse, Request,
};

const CONFIG: &str = r#"{
    "id": "fuzz.demo.net",
    "presharedKey": "00112233445566778899aabbccddeeff",
    "device": {
        "name": "Fuzz", "productName": "Fuzzer", "iconUrl": "",
        "iface": { "id": "fuzz", "version": { "major": 1, "minor": 0 } },
        "permission": { "dbFile": "fuzz.db" }
    }
}"#;

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }
    let raw_id = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let id = if raw_id & 1 == 0 { 10_000 + (raw_id >> 1) % 1_100 } else { raw_id };
    let flags = data[4];

    let Ok(config) = GatewayConfig::from_json(CONFIG) else {
        return;
    };
    let mut acl = MemoryAcl::new();
    let _ = acl.add_user(Fingerprint([1; 16]), "owner", Permissions::all());
    let Ok(mut gw) = Gateway::administered(&config, acl) else {
        return;
    };
    let _ = gw.register_fn(20_000, |_, q, r| {
        let bytes = q.read_u8_list()?;
        r.write_u8_list(bytes)
    });

    let mut request = Request::new(id).local(flags & 1 != 0);
    if flags & 2 != 0 {
        request = request.with_fingerprint(Fingerprint([(flags >> 2) & 1; 16]));
    }

    let mut buf = [0u8; 128];
    let mut resp = QueryResponse::new(&mut buf);
    let _ = gw.dispatch(&request, &mut QueryRequest::new(&data[5..]), &mut resp);
    assert!(resp.len() <= resp.capacity());
});
