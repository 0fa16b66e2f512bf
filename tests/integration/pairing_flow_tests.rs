//! Pairing and user management end to end: in-memory ACL, loopback
//! session, gateway in administrative mode.

use p2pgate::adapters::acl_memory::{AclStatus, MemoryAcl};
use p2pgate::adapters::loopback::{Exchange, LoopbackDriver};
use p2pgate::rpc::request::FINGERPRINT_LEN;
use p2pgate::{AccessAuthority, Device, Fingerprint, Gateway, QueryId, QueryStatus, Request};

use crate::fixtures::{admin_config, dispatch, dispatch_with, list};

const ALICE: u8 = 0xA1;
const BOB: u8 = 0xB0;

fn fp(who: u8) -> Fingerprint {
    Fingerprint([who; FINGERPRINT_LEN])
}

fn local(id: QueryId, who: u8) -> Request {
    Request::new(id)
        .with_client_id(if who == ALICE { "alice" } else { "bob" })
        .with_fingerprint(fp(who))
        .local(true)
}

fn device() -> Device<LoopbackDriver> {
    let gw = Gateway::administered(&admin_config(), MemoryAcl::new()).unwrap();
    Device::start(gw, LoopbackDriver::new()).unwrap()
}

fn run(device: &mut Device<LoopbackDriver>, request: Request, payload: &[u8]) -> Exchange {
    device.driver_mut().submit(request, payload);
    device.tick();
    let mut done = device.driver_mut().take_completed();
    assert_eq!(done.len(), 1);
    done.remove(0)
}

#[test]
fn first_paired_user_becomes_owner() {
    let mut dev = device();

    let before = run(&mut dev, local(10_000, ALICE), &[]);
    assert!(before.response.ends_with(&[1, 0, 0]), "pairing open, unpaired");

    let paired = run(&mut dev, local(11_010, ALICE), &list(b"alice phone"));
    assert_eq!(paired.status, QueryStatus::ResponseReady);
    assert_eq!(paired.response, [AclStatus::Ok as u8]);

    let after = run(&mut dev, local(10_000, ALICE), &[]);
    assert!(after.response.ends_with(&[0, 1, 1]), "paired owner");

    let settings = run(&mut dev, local(11_030, ALICE), &[]);
    assert_eq!(settings.status, QueryStatus::ResponseReady);
    let mut expected = vec![AclStatus::Ok as u8];
    expected.extend_from_slice(&0xE000_0000u32.to_be_bytes());
    expected.extend_from_slice(&0x8000_0000u32.to_be_bytes());
    assert_eq!(settings.response, expected);
}

#[test]
fn later_users_are_not_owners() {
    let mut dev = device();
    run(&mut dev, local(11_010, ALICE), &list(b"alice"));
    let bob = run(&mut dev, local(11_010, BOB), &list(b"bob"));
    assert_eq!(bob.status, QueryStatus::ResponseReady);

    let denied = run(&mut dev, local(11_030, BOB), &[]);
    assert_eq!(denied.status, QueryStatus::NoAccess);
    assert!(denied.response.is_empty());

    let rename = run(&mut dev, local(10_010, BOB), &list(b"hijacked"));
    assert_eq!(rename.status, QueryStatus::NoAccess);
    assert_eq!(dev.gateway().descriptor().unwrap().name(), "Lock-1");
}

#[test]
fn second_pairing_attempt_is_refused() {
    let mut dev = device();
    run(&mut dev, local(11_010, ALICE), &list(b"alice"));
    let again = run(&mut dev, local(11_010, ALICE), &list(b"alice again"));
    assert_eq!(again.status, QueryStatus::NoAccess);
}

#[test]
fn remote_clients_cannot_pair() {
    let mut dev = device();
    let remote = Request::new(11_010).with_fingerprint(fp(ALICE));
    let attempt = run(&mut dev, remote, &list(b"alice"));
    assert_eq!(attempt.status, QueryStatus::NoAccess);
}

#[test]
fn owner_removes_user() {
    let mut dev = device();
    run(&mut dev, local(11_010, ALICE), &list(b"alice"));
    run(&mut dev, local(11_010, BOB), &list(b"bob"));

    let me = run(&mut dev, local(11_020, BOB), &[]);
    assert_eq!(me.response[0], AclStatus::Ok as u8);

    let removed = run(&mut dev, local(11_070, ALICE), &list(&[BOB; FINGERPRINT_LEN]));
    assert_eq!(removed.status, QueryStatus::ResponseReady);
    assert_eq!(removed.response, [AclStatus::Ok as u8]);

    let gone = run(&mut dev, local(11_020, BOB), &[]);
    assert_eq!(gone.response, [AclStatus::NoSuchUser as u8]);
}

#[test]
fn user_listing_requires_admin_inside_authority() {
    let mut dev = device();
    run(&mut dev, local(11_010, ALICE), &list(b"alice"));
    run(&mut dev, local(11_010, BOB), &list(b"bob"));

    let mut page = 10u32.to_be_bytes().to_vec();
    page.extend_from_slice(&0u32.to_be_bytes());

    let denied = run(&mut dev, local(11_000, BOB), &page);
    assert_eq!(denied.status, QueryStatus::NoAccess);

    let listed = run(&mut dev, local(11_000, ALICE), &page);
    assert_eq!(listed.status, QueryStatus::ResponseReady);
    assert_eq!(&listed.response[..2], &[0, 2]);
    assert_eq!(&listed.response[listed.response.len() - 4..], &[0, 0, 0, 0]);
}

fn words(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Administered gateway with ALICE as owner and BOB as a plain user.
fn paired_gateway() -> Gateway {
    let mut gw = Gateway::administered(&admin_config(), MemoryAcl::new()).unwrap();
    for (who, name) in [(ALICE, &b"alice"[..]), (BOB, &b"bob"[..])] {
        let (status, _) = dispatch(&mut gw, &local(11_010, who), &list(name));
        assert_eq!(status, QueryStatus::ResponseReady);
    }
    gw
}

#[test]
fn owner_changes_system_settings() {
    let mut dev = device();
    run(&mut dev, local(11_010, ALICE), &list(b"alice"));

    let payload = words(&[0xC000_0000, 0xC000_0000]);
    let set = run(&mut dev, local(11_040, ALICE), &payload);
    assert_eq!(set.status, QueryStatus::ResponseReady);
    let mut expected = vec![AclStatus::Ok as u8];
    expected.extend_from_slice(&payload);
    assert_eq!(set.response, expected);

    let read_back = run(&mut dev, local(11_030, ALICE), &[]);
    assert_eq!(read_back.response, expected);

    let late = run(&mut dev, local(11_010, BOB), &list(b"bob"));
    assert_eq!(late.status, QueryStatus::NoAccess, "pairing switched off");
}

#[test]
fn owner_disabling_local_access_still_gets_settings_back() {
    let mut dev = device();
    run(&mut dev, local(11_010, ALICE), &list(b"alice"));

    let payload = words(&[0x6000_0000, 0x8000_0000]);
    let set = run(&mut dev, local(11_040, ALICE), &payload);
    assert_eq!(set.status, QueryStatus::ResponseReady);
    assert_eq!(set.response[0], AclStatus::Ok as u8);
    assert_eq!(&set.response[1..], payload.as_slice());

    let after = run(&mut dev, local(11_030, ALICE), &[]);
    assert_eq!(after.status, QueryStatus::NoAccess, "local access now off");
}

#[test]
fn owner_grants_permissions_to_user() {
    let mut dev = device();
    run(&mut dev, local(11_010, ALICE), &list(b"alice"));
    run(&mut dev, local(11_010, BOB), &list(b"bob"));

    let mut payload = list(&[BOB; FINGERPRINT_LEN]);
    payload.extend(words(&[0xE000_0000]));
    let granted = run(&mut dev, local(11_050, ALICE), &payload);
    assert_eq!(granted.status, QueryStatus::ResponseReady);

    let mut expected = vec![AclStatus::Ok as u8];
    expected.extend(list(&[BOB; FINGERPRINT_LEN]));
    expected.extend(list(b"bob"));
    expected.extend(words(&[0xE000_0000]));
    assert_eq!(granted.response, expected);

    let settings = run(&mut dev, local(11_030, BOB), &[]);
    assert_eq!(settings.status, QueryStatus::ResponseReady, "bob is an owner now");
}

#[test]
fn granting_to_unknown_fingerprint_reports_no_such_user() {
    let mut dev = device();
    run(&mut dev, local(11_010, ALICE), &list(b"alice"));

    let mut payload = list(&[0x55; FINGERPRINT_LEN]);
    payload.extend(words(&[0x8000_0000]));
    let reply = run(&mut dev, local(11_050, ALICE), &payload);
    assert_eq!(reply.status, QueryStatus::ResponseReady);
    assert_eq!(reply.response, [AclStatus::NoSuchUser as u8]);
}

#[test]
fn updates_that_cannot_be_answered_are_not_applied() {
    let mut gw = paired_gateway();

    let mut grant = list(&[BOB; FINGERPRINT_LEN]);
    grant.extend(words(&[0xE000_0000]));
    let (status, _) = dispatch_with(&mut gw, &local(11_050, ALICE), &grant, 8);
    assert_eq!(status, QueryStatus::ResponseTooLarge);
    assert!(!gw.authority().unwrap().is_user_owner(&local(0, BOB)));

    let mut rename = list(&[BOB; FINGERPRINT_LEN]);
    rename.extend(list(b"kitchen"));
    let (status, _) = dispatch_with(&mut gw, &local(11_060, ALICE), &rename, 8);
    assert_eq!(status, QueryStatus::ResponseTooLarge);
    let (_, me) = dispatch(&mut gw, &local(11_020, BOB), &[]);
    let mut expected = vec![AclStatus::Ok as u8];
    expected.extend(list(&[BOB; FINGERPRINT_LEN]));
    expected.extend(list(b"bob"));
    expected.extend(words(&[0x8000_0000]));
    assert_eq!(me, expected);

    let (status, _) = dispatch_with(&mut gw, &local(11_040, ALICE), &words(&[0, 0]), 8);
    assert_eq!(status, QueryStatus::ResponseTooLarge);
    let (_, settings) = dispatch(&mut gw, &local(11_030, ALICE), &[]);
    assert_eq!(&settings[1..], words(&[0xE000_0000, 0x8000_0000]).as_slice());

    let remove = list(&[BOB; FINGERPRINT_LEN]);
    let (status, _) = dispatch_with(&mut gw, &local(11_070, ALICE), &remove, 0);
    assert_eq!(status, QueryStatus::ResponseTooLarge);
    assert!(gw.authority().unwrap().is_user_paired(&local(0, BOB)));
}

#[test]
fn pairing_without_room_for_reply_adds_nobody() {
    let mut gw = Gateway::administered(&admin_config(), MemoryAcl::new()).unwrap();
    let (status, body) = dispatch_with(&mut gw, &local(11_010, ALICE), &list(b"alice"), 0);
    assert_eq!(status, QueryStatus::ResponseTooLarge);
    assert!(body.is_empty());

    let authority = gw.authority().unwrap();
    assert!(!authority.is_user_paired(&local(0, ALICE)));
    assert!(authority.is_pair_allowed(&local(0, ALICE)));
}
