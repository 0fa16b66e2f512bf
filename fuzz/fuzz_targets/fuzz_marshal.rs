//! Fuzz target: bounded copies out of an untrusted payload.
//!
//! Arbitrary bytes go through `copy_bounded` and `copy_bounded_string`. The
//! copies must never panic, never exceed the destination capacity, and
//! must leave the destination untouched whenever they fail.
//!
//! cargo fuzz run fuzz_marshal

#![no_main]

use heapless::{String, Vec};
use libfuzzer_sys::fuzz_target;
use p2pgate::QueryRequest;
use p2pgate::rpc::marshal::{copy_bounded, copy_bounded_string};

fuzz_target!(|data: &[u8]| {
    let mut bytes: Vec<u8, 32> = Vec::new();
    let _ = bytes.extend_from_slice(b"sentinel");
    let mut q = QueryRequest::new(data);
    match copy_bounded(&mut q, &mut bytes) {
        Ok(n) => assert_eq!(n, bytes.len()),
        Err(_) => assert_eq!(bytes.as_slice(), b"sentinel"),
    }

    let mut text: String<16> = String::new();
    let _ = text.push_str("sentinel");
    let mut q = QueryRequest::new(data);
    match copy_bounded_string(&mut q, &mut text) {
        Ok(n) => assert!(n < 16 && n == text.len()),
        Err(_) => assert_eq!(text.as_str(), "sentinel"),
    }
});
