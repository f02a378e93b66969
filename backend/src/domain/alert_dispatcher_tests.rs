//! Unit tests for the SOS alert dispatcher.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rstest::rstest;
use tokio::time::Instant;

use super::*;
use crate::domain::ports::{
    ContactStoreError, MockContactStore, MockMessageTransport, TransportError, UserContacts,
};
use crate::domain::{DispatchVerdict, EmergencyContact, UserProfile};

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
enum Script {
    Accept,
    AcceptAfter(Duration),
    Reject,
    Outage,
    TransportTimeout,
    Hang,
}

/// Transport double scripted per destination number.
#[derive(Default)]
struct ScriptedTransport {
    scripts: HashMap<String, Script>,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    abandoned: AtomicUsize,
    bodies: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn with(scripts: &[(&str, Script)]) -> Self {
        Self {
            scripts: scripts
                .iter()
                .map(|(phone, script)| ((*phone).to_owned(), script.clone()))
                .collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bodies(&self) -> Vec<String> {
        self.bodies.lock().expect("bodies lock").clone()
    }
}

struct InFlight<'a> {
    active: &'a AtomicUsize,
    abandoned: &'a AtomicUsize,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        if !self.finished {
            self.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl MessageTransport for ScriptedTransport {
    async fn send_text(
        &self,
        to: &PhoneNumber,
        body: &str,
    ) -> Result<MessageReceipt, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.bodies.lock().expect("bodies lock").push(body.to_owned());
        let active_now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active_now, Ordering::SeqCst);
        let in_flight = InFlight {
            active: &self.active,
            abandoned: &self.abandoned,
            finished: false,
        };

        let script = self
            .scripts
            .get(to.as_str())
            .cloned()
            .unwrap_or(Script::Accept);
        let result = match script {
            Script::Accept => Ok(MessageReceipt::new(format!("SM{call}"))),
            Script::AcceptAfter(delay) => {
                tokio::time::sleep(delay).await;
                Ok(MessageReceipt::new(format!("SM{call}")))
            }
            Script::Reject => Err(TransportError::rejected(
                400_u16,
                "The 'To' number is not a valid phone number.",
            )),
            Script::Outage => Err(TransportError::transport("connection reset by peer")),
            Script::TransportTimeout => Err(TransportError::timeout("operation timed out")),
            Script::Hang => std::future::pending().await,
        };
        in_flight.finish();
        result
    }
}

fn contact(name: &str, phone: &str) -> EmergencyContact {
    EmergencyContact {
        name: name.to_owned(),
        phone: phone.to_owned(),
        relationship: "Friend".to_owned(),
    }
}

fn profile() -> UserProfile {
    UserProfile {
        first_name: Some("Ada".to_owned()),
        last_name: Some("Lovelace".to_owned()),
        email: Some("ada@example.com".to_owned()),
    }
}

/// Store answering one snapshot read; the split lookups must stay unused.
fn store_with(contacts: Vec<EmergencyContact>) -> MockContactStore {
    let mut store = MockContactStore::new();
    store.expect_load_user().times(1).return_once(move |_| {
        Ok(UserContacts {
            profile: profile(),
            contacts,
        })
    });
    store.expect_find_user().times(0);
    store.expect_list_contacts().times(0);
    store
}

fn policy() -> DispatchPolicy {
    DispatchPolicy {
        send_timeout: SEND_TIMEOUT,
        max_in_flight: DEFAULT_MAX_IN_FLIGHT,
    }
}

fn dispatcher<T: MessageTransport>(
    store: MockContactStore,
    transport: Arc<T>,
) -> AlertDispatcher<MockContactStore, T> {
    AlertDispatcher::new(Arc::new(store), transport, policy())
}

fn user(id: &str) -> UserId {
    UserId::new(id).expect("user id")
}

#[tokio::test]
async fn reachable_contacts_all_receive_the_alert() {
    let transport = Arc::new(ScriptedTransport::default());
    let service = dispatcher(
        store_with(vec![
            contact("Grace", "+1555"),
            contact("No phone", ""),
            contact("Alan", "+1777"),
        ]),
        Arc::clone(&transport),
    );

    let outcome = service
        .dispatch(&user("u1"), None)
        .await
        .expect("dispatch succeeds");

    assert_eq!(outcome.attempted(), 2);
    assert_eq!(outcome.sent(), 2);
    assert_eq!(outcome.failed(), 0);
    assert!(outcome.success());
    assert_eq!(outcome.verdict(), DispatchVerdict::AllSucceeded);
    assert_eq!(transport.calls(), 2);
    let indices: Vec<usize> = outcome.results().iter().map(|r| r.contact.index).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[tokio::test]
async fn unknown_user_fails_without_sending() {
    let mut store = MockContactStore::new();
    store
        .expect_load_user()
        .times(1)
        .return_once(|id| Err(ContactStoreError::not_found(id.to_string())));
    let mut transport = MockMessageTransport::new();
    transport.expect_send_text().times(0);

    let service = AlertDispatcher::new(Arc::new(store), Arc::new(transport), policy());
    let err = service
        .dispatch(&user("u2"), None)
        .await
        .expect_err("unknown user");

    assert_eq!(
        err,
        DispatchError::UserNotFound {
            user_id: "u2".to_owned()
        }
    );
}

#[tokio::test]
async fn provider_failure_is_reported_not_raised() {
    let transport = Arc::new(ScriptedTransport::with(&[("+1888", Script::Reject)]));
    let service = dispatcher(store_with(vec![contact("Sam", "+1888")]), transport);

    let outcome = service
        .dispatch(&user("u3"), None)
        .await
        .expect("dispatch call itself succeeds");

    assert_eq!(
        (outcome.attempted(), outcome.sent(), outcome.failed()),
        (1, 0, 1)
    );
    assert!(!outcome.success());
    assert_eq!(outcome.verdict(), DispatchVerdict::AllFailed);
    assert!(matches!(
        outcome.results()[0].failure(),
        Some(DeliveryFailure::Provider(TransportError::Rejected { status: 400, .. }))
    ));
}

#[rstest]
#[case::no_contacts(Vec::new())]
#[case::only_empty_phones(vec![contact("A", ""), contact("B", "   ")])]
#[tokio::test]
async fn unreachable_users_get_no_reachable_contacts_outcome(
    #[case] contacts: Vec<EmergencyContact>,
) {
    let mut transport = MockMessageTransport::new();
    transport.expect_send_text().times(0);
    let service = dispatcher(store_with(contacts), Arc::new(transport));

    let outcome = service
        .dispatch(&user("u4"), Some("Kitchen"))
        .await
        .expect("reported, not raised");

    assert_eq!(outcome.verdict(), DispatchVerdict::NoReachableContacts);
    assert_eq!(outcome.attempted(), 0);
    assert!(!outcome.success());
}

#[rstest]
#[case::connection("connection refused")]
#[case::decode("decode failed")]
#[tokio::test]
async fn store_outage_fails_the_call(#[case] reason: &'static str) {
    let mut store = MockContactStore::new();
    store
        .expect_load_user()
        .times(1)
        .return_once(move |_| Err(ContactStoreError::unavailable(reason)));
    let mut transport = MockMessageTransport::new();
    transport.expect_send_text().times(0);

    let service = AlertDispatcher::new(Arc::new(store), Arc::new(transport), policy());
    let err = service
        .dispatch(&user("u5"), None)
        .await
        .expect_err("store outage");

    assert!(matches!(err, DispatchError::StoreUnavailable { .. }));
}

#[rstest]
#[case(4, 0)]
#[case(4, 1)]
#[case(4, 3)]
#[case(4, 4)]
#[case(1, 0)]
#[case(1, 1)]
#[tokio::test(start_paused = true)]
async fn counts_hold_for_any_completion_order(#[case] total: usize, #[case] succeeding: usize) {
    // Later contacts finish first so completion order is the reverse of store order.
    let phones: Vec<String> = (0..total).map(|i| format!("+1555000{i}")).collect();
    let scripts: Vec<(&str, Script)> = phones
        .iter()
        .enumerate()
        .map(|(i, phone)| {
            let delay = Duration::from_millis(((total - i) * 100) as u64);
            let script = if i < succeeding {
                Script::AcceptAfter(delay)
            } else if i % 2 == 0 {
                Script::Reject
            } else {
                Script::Outage
            };
            (phone.as_str(), script)
        })
        .collect();
    let contacts = phones.iter().map(|phone| contact("c", phone)).collect();
    let transport = Arc::new(ScriptedTransport::with(&scripts));
    let service = dispatcher(store_with(contacts), transport);

    let outcome = service
        .dispatch(&user("u6"), None)
        .await
        .expect("dispatch succeeds");

    assert_eq!(outcome.attempted(), total);
    assert_eq!(outcome.sent(), succeeding);
    assert_eq!(outcome.failed(), total - succeeding);
    assert_eq!(outcome.success(), succeeding > 0);
}

#[tokio::test(start_paused = true)]
async fn hanging_send_times_out_without_blocking_others() {
    let transport = Arc::new(ScriptedTransport::with(&[
        ("+1000", Script::Hang),
        ("+2000", Script::AcceptAfter(Duration::from_millis(50))),
    ]));
    let service = dispatcher(
        store_with(vec![contact("Hangs", "+1000"), contact("Answers", "+2000")]),
        Arc::clone(&transport),
    );

    let started = Instant::now();
    let outcome = service
        .dispatch(&user("u7"), None)
        .await
        .expect("dispatch succeeds");
    let elapsed = started.elapsed();

    assert!(elapsed >= SEND_TIMEOUT);
    assert!(elapsed < SEND_TIMEOUT + Duration::from_secs(1), "elapsed {elapsed:?}");
    assert_eq!((outcome.sent(), outcome.failed()), (1, 1));
    assert_eq!(outcome.timed_out(), 1);
    assert_eq!(
        outcome.results()[0].failure(),
        Some(&DeliveryFailure::Timeout)
    );
    assert_eq!(transport.abandoned.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn transport_reported_timeout_counts_as_timeout() {
    let transport = Arc::new(ScriptedTransport::with(&[("+1000", Script::TransportTimeout)]));
    let service = dispatcher(store_with(vec![contact("Slow", "+1000")]), transport);

    let outcome = service
        .dispatch(&user("u8"), None)
        .await
        .expect("dispatch succeeds");

    assert_eq!(outcome.timed_out(), 1);
}

#[tokio::test]
async fn every_contact_gets_the_same_composed_body() {
    let transport = Arc::new(ScriptedTransport::default());
    let service = dispatcher(
        store_with(vec![contact("A", "+1555"), contact("B", "+1555")]),
        Arc::clone(&transport),
    );

    let outcome = service
        .dispatch(&user("u9"), Some("Central Park, NYC"))
        .await
        .expect("dispatch succeeds");

    assert_eq!(outcome.attempted(), 2, "duplicate numbers are not deduplicated");
    let expected =
        "SOS Alert from Ada Lovelace\nLocation: Central Park, NYC\nPlease reach out immediately.";
    assert_eq!(transport.bodies(), vec![expected.to_owned(), expected.to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn concurrent_sends_are_bounded_by_policy() {
    let phones: Vec<String> = (0..6).map(|i| format!("+1999{i}")).collect();
    let scripts: Vec<(&str, Script)> = phones
        .iter()
        .map(|phone| (phone.as_str(), Script::AcceptAfter(Duration::from_millis(100))))
        .collect();
    let transport = Arc::new(ScriptedTransport::with(&scripts));
    let service = AlertDispatcher::new(
        Arc::new(store_with(phones.iter().map(|p| contact("c", p)).collect())),
        Arc::clone(&transport),
        DispatchPolicy {
            send_timeout: SEND_TIMEOUT,
            max_in_flight: 2,
        },
    );

    let outcome = service
        .dispatch(&user("u10"), None)
        .await
        .expect("dispatch succeeds");

    assert_eq!(outcome.sent(), 6);
    assert_eq!(transport.max_active.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn hanging_sends_beyond_the_bound_time_out_in_waves() {
    let phones: Vec<String> = (0..5).map(|i| format!("+1888{i}")).collect();
    let scripts: Vec<(&str, Script)> = phones
        .iter()
        .map(|phone| (phone.as_str(), Script::Hang))
        .collect();
    let transport = Arc::new(ScriptedTransport::with(&scripts));
    let service = AlertDispatcher::new(
        Arc::new(store_with(phones.iter().map(|p| contact("c", p)).collect())),
        Arc::clone(&transport),
        DispatchPolicy {
            send_timeout: SEND_TIMEOUT,
            max_in_flight: 2,
        },
    );

    let started = Instant::now();
    let outcome = service
        .dispatch(&user("u11"), None)
        .await
        .expect("dispatch succeeds");
    let elapsed = started.elapsed();

    // Five hanging sends admitted two at a time: three timeout waves.
    let waves = SEND_TIMEOUT * 3;
    assert!(elapsed >= waves, "elapsed {elapsed:?}");
    assert!(elapsed < waves + Duration::from_secs(1), "elapsed {elapsed:?}");
    assert_eq!(outcome.timed_out(), 5);
    assert_eq!(outcome.verdict(), DispatchVerdict::AllFailed);
    assert_eq!(transport.max_active.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_dispatch_abandons_pending_sends() {
    let transport = Arc::new(ScriptedTransport::with(&[
        ("+1000", Script::Hang),
        ("+2000", Script::Hang),
    ]));
    let service = dispatcher(
        store_with(vec![contact("A", "+1000"), contact("B", "+2000")]),
        Arc::clone(&transport),
    );

    let cancelled =
        tokio::time::timeout(Duration::from_secs(1), service.dispatch(&user("u11"), None)).await;

    assert!(cancelled.is_err(), "caller gave up first");
    assert_eq!(transport.calls(), 2);
    assert_eq!(transport.abandoned.load(Ordering::SeqCst), 2);
    assert_eq!(transport.active.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn direct_send_uses_default_message() {
    let transport = Arc::new(ScriptedTransport::default());
    let service = AlertDispatcher::new(
        Arc::new(MockContactStore::new()),
        Arc::clone(&transport),
        policy(),
    );

    let receipt = service
        .send_direct(&DirectSosRequest {
            phone: PhoneNumber::parse("+15550100").expect("phone"),
            message: None,
        })
        .await
        .expect("direct send succeeds");

    assert_eq!(receipt.provider_id, "SM1");
    assert_eq!(
        transport.bodies(),
        vec![crate::domain::ports::DEFAULT_DIRECT_SOS_MESSAGE.to_owned()]
    );
}

#[rstest]
#[case::hang(Script::Hang, true)]
#[case::provider(Script::Outage, false)]
#[tokio::test(start_paused = true)]
async fn direct_send_maps_failures(#[case] script: Script, #[case] expect_timeout: bool) {
    let transport = Arc::new(ScriptedTransport::with(&[("+1000", script)]));
    let service = AlertDispatcher::new(Arc::new(MockContactStore::new()), transport, policy());

    let err = service
        .send_direct(&DirectSosRequest {
            phone: PhoneNumber::parse("+1000").expect("phone"),
            message: Some("Help".to_owned()),
        })
        .await
        .expect_err("direct send fails");

    assert_eq!(matches!(err, DirectSendError::Timeout), expect_timeout);
}
