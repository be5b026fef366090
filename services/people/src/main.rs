use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::info;

use crudkit_core::tracing::init_tracing;
use crudkit_rest::{AxumPort, Server};
use crudkit_store::{MongoIdRepository, SharedRepository};

use crudkit_people::config::PeopleConfig;
use crudkit_people::person::{Person, person_key, person_type};
use crudkit_people::router::mount;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = PeopleConfig::from_env();

    let repository: SharedRepository<Person, String> = Arc::new(
        MongoIdRepository::connect(&config.mongo, &person_type(), person_key())
            .await
            .context("failed to connect to mongodb")?,
    );

    let mut server = Server::new(AxumPort::new(), config.server);
    mount(&mut server, repository);
    let addr = server.run().await.context("failed to start server")?;
    info!(%addr, "people service listening");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    server.stop().await.context("failed to stop server")?;
    Ok(())
}
