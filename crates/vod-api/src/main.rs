use vod_core::Config;

// mimalloc as the global allocator: lower fragmentation for long-running
// upload workloads, notably on musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Document store, storage, services and routes
    let (_state, router) = vod_api::setup::initialize_app(config.clone()).await?;

    vod_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
