use crudkit_rest::AxumPort;
use crudkit_store::EntityType;
use crudkit_testing::CrudFixture;

use crate::helpers::{PeopleCase, Person, person_key};

// Needs a reachable MongoDB (`MONGODB_URL`, `MONGODB_DATABASE`).
#[tokio::test]
#[ignore]
async fn crud_operations_behave_properly_on_mongodb() {
    let mut fixture = CrudFixture::mongo(
        EntityType::<Person>::named("crudkit_fixture_people"),
        person_key(),
        AxumPort::new(),
    )
    .await
    .unwrap();
    fixture.repository().clear().await.unwrap();
    fixture.start_server().await.unwrap();

    fixture
        .crud_operations_behave_properly(&PeopleCase)
        .await
        .unwrap();

    assert_eq!(fixture.repository().count().await.unwrap(), 0);
    fixture.stop_server().await.unwrap();
}
