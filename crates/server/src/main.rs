use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    vquotes_server::run().await
}
