use std::sync::Arc;

use crudkit_core::settings::ServerSettings;
use crudkit_rest::{AxumPort, ServerError};
use crudkit_store::{MemoryIdRepository, SharedRepository};
use crudkit_testing::{CrudFixture, FixtureError};

use crate::helpers::{PeopleCase, Person, RekeyingCase, ReservedKeysCase, memory_fixture, person, person_key};

// ── start / stop ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_start_and_stop_server() {
    let mut fixture = memory_fixture();

    fixture.start_server().await.unwrap();
    assert!(fixture.server().is_running());

    fixture.stop_server().await.unwrap();
    assert!(!fixture.server().is_running());
}

#[tokio::test]
async fn should_fail_requests_after_stop() {
    let mut fixture = memory_fixture();
    fixture.start_server().await.unwrap();
    let client = fixture.client().unwrap().clone();

    fixture.stop_server().await.unwrap();

    let result = client.get("/healthz").await;
    assert!(result.is_err(), "expected connection error, got {result:?}");
}

#[tokio::test]
async fn should_reject_start_when_running() {
    let mut fixture = memory_fixture();
    fixture.start_server().await.unwrap();

    let result = fixture.start_server().await;

    assert!(
        matches!(result, Err(FixtureError::Server(ServerError::AlreadyRunning))),
        "expected AlreadyRunning, got {result:?}"
    );
    fixture.stop_server().await.unwrap();
}

#[tokio::test]
async fn should_reject_stop_before_start() {
    let mut fixture = memory_fixture();

    let result = fixture.stop_server().await;

    assert!(
        matches!(result, Err(FixtureError::Server(ServerError::NotRunning))),
        "expected NotRunning, got {result:?}"
    );
}

#[tokio::test]
async fn should_propagate_bind_failure() {
    let mut first = memory_fixture();
    first.start_server().await.unwrap();
    let port = first.server().runtime_port().unwrap();
    let mut second: CrudFixture<Person, String, AxumPort> = CrudFixture::new(
        Arc::new(MemoryIdRepository::new(person_key())),
        AxumPort::new(),
        ServerSettings::default().with_port(port),
    );

    let result = second.start_server().await;

    assert!(
        matches!(result, Err(FixtureError::Server(ServerError::Bind { .. }))),
        "expected Bind, got {result:?}"
    );
    assert!(second.client().is_err());
    first.stop_server().await.unwrap();
}

// ── client ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_not_build_client_before_start() {
    let fixture = memory_fixture();

    assert!(matches!(fixture.client(), Err(FixtureError::NotStarted)));
}

#[tokio::test]
async fn should_target_reported_address() {
    let mut fixture = memory_fixture();
    fixture.start_server().await.unwrap();

    let addr = fixture.server().local_addr().unwrap();
    let client = fixture.client().unwrap();

    assert_eq!(client.base_url(), format!("http://{addr}"));
    assert_eq!(
        fixture.server().runtime_port(),
        Some(addr.port()),
        "runtime port should match the bound address"
    );
    fixture.stop_server().await.unwrap();
}

#[tokio::test]
async fn should_drop_client_on_stop() {
    let mut fixture = memory_fixture();
    fixture.start_server().await.unwrap();
    fixture.stop_server().await.unwrap();

    assert!(matches!(fixture.client(), Err(FixtureError::NotStarted)));
}

// ── round trip ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn crud_operations_behave_properly() {
    let mut fixture = memory_fixture();
    fixture.start_server().await.unwrap();

    fixture
        .crud_operations_behave_properly(&PeopleCase)
        .await
        .unwrap();

    assert_eq!(fixture.repository().count().await.unwrap(), 0);
    fixture.stop_server().await.unwrap();
}

#[tokio::test]
async fn should_run_round_trip_for_keys_with_reserved_characters() {
    let mut fixture = memory_fixture();
    fixture.start_server().await.unwrap();

    fixture
        .crud_operations_behave_properly(&ReservedKeysCase)
        .await
        .unwrap();

    assert_eq!(fixture.repository().count().await.unwrap(), 0);
    fixture.stop_server().await.unwrap();
}

#[tokio::test]
async fn should_run_round_trip_with_unrelated_entities_present() {
    let repository: SharedRepository<Person, String> = Arc::new(MemoryIdRepository::with_entries(
        person_key(),
        [person("zuse", "Konrad Zuse", 85)],
    ));
    let mut fixture = CrudFixture::new(repository, AxumPort::new(), ServerSettings::default());
    fixture.start_server().await.unwrap();

    fixture
        .crud_operations_behave_properly(&PeopleCase)
        .await
        .unwrap();

    let remaining = fixture.repository().get(&"zuse".to_owned()).await.unwrap();
    assert_eq!(remaining, Some(person("zuse", "Konrad Zuse", 85)));
    fixture.stop_server().await.unwrap();
}

#[tokio::test]
async fn should_run_round_trip_again_after_restart() {
    let mut fixture = memory_fixture();
    fixture.start_server().await.unwrap();
    fixture.stop_server().await.unwrap();
    fixture.start_server().await.unwrap();

    fixture
        .crud_operations_behave_properly(&PeopleCase)
        .await
        .unwrap();

    fixture.stop_server().await.unwrap();
}

#[tokio::test]
async fn should_refuse_round_trip_before_start() {
    let fixture = memory_fixture();

    let result = fixture.crud_operations_behave_properly(&PeopleCase).await;

    assert!(matches!(result, Err(FixtureError::NotStarted)));
}

#[tokio::test]
#[should_panic(expected = "change_object altered the key")]
async fn should_panic_when_case_changes_the_key() {
    let mut fixture = memory_fixture();
    fixture.start_server().await.unwrap();

    let _ = fixture.crud_operations_behave_properly(&RekeyingCase).await;
}
