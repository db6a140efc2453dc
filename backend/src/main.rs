//! Course reserves service entry point.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    backend::start_server().await
}
