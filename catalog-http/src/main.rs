use anyhow::Context;
use catalog::{
    memory::InMemoryBookRepository, mongodb::MongoBookRepository, repository::RepositoryBuilder,
};
use catalog_http::{
    settings::{Settings, StorageBackend},
    start_server, telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.storage.backend,
        "catalog-server bootstrap starting"
    );

    match settings.storage.backend {
        StorageBackend::Memory => {
            let repository = InMemoryBookRepository::builder()
                .build()
                .await
                .context("failed to build in-memory repository")?;

            start_server(repository, &settings.server).await
        }
        StorageBackend::Mongodb => {
            let repository = MongoBookRepository::builder(
                &settings.storage.mongo_url,
                &settings.storage.database,
            )
            .collection(&settings.storage.collection)
            .build()
            .await
            .context("failed to connect to MongoDB")?;

            start_server(repository, &settings.server).await
        }
    }
}
