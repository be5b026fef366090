use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use crudkit_core::settings::ServerSettings;
use crudkit_people::person::{Person, person_key};
use crudkit_people::router::mount;
use crudkit_rest::{AxumPort, Client, Server};
use crudkit_store::{MemoryIdRepository, SharedRepository};
use crudkit_testing::{CrudCase, CrudFixture};

fn person(id: &str, name: &str) -> Person {
    Person {
        id: id.to_owned(),
        name: name.to_owned(),
        email: format!("{id}@example.com"),
    }
}

fn repository() -> SharedRepository<Person, String> {
    Arc::new(MemoryIdRepository::new(person_key()))
}

struct EmailChange;

impl CrudCase<Person> for EmailChange {
    fn create_objects(&self) -> Vec<Person> {
        vec![person("ada", "Ada"), person("linus", "Linus")]
    }

    fn change_object(&self, object: &Person) -> Person {
        Person {
            email: format!("{}@example.org", object.id),
            ..object.clone()
        }
    }
}

async fn running_server(repository: SharedRepository<Person, String>) -> (Server<AxumPort>, Client) {
    let mut server = Server::new(AxumPort::new(), ServerSettings::default());
    mount(&mut server, repository);
    let addr = server.run().await.unwrap();
    (server, Client::for_addr(addr))
}

#[tokio::test]
async fn should_serve_people_under_people_path() {
    let (mut server, client) = running_server(repository()).await;

    let created = client.post("/people", &person("ada", "Ada")).await.unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let response = client.get("/people/ada").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<serde_json::Value>().await.unwrap(),
        json!({ "id": "ada", "name": "Ada", "email": "ada@example.com" })
    );
    server.stop().await.unwrap();
}

#[tokio::test]
async fn should_not_serve_people_at_root() {
    let (mut server, client) = running_server(repository()).await;

    let response = client.get("/ada").await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn should_mount_people_on_embedded_server() {
    let repository = repository();
    repository.insert(&person("ada", "Ada")).await.unwrap();
    let (mut server, client) = running_server(repository).await;

    let response = client.get("/people/ada").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Person>().await.unwrap(), person("ada", "Ada"));
    server.stop().await.unwrap();
}

#[tokio::test]
async fn people_crud_operations_behave_properly() {
    let mut fixture = CrudFixture::new(repository(), AxumPort::new(), ServerSettings::default());
    fixture.start_server().await.unwrap();

    fixture
        .crud_operations_behave_properly(&EmailChange)
        .await
        .unwrap();

    fixture.stop_server().await.unwrap();
}
