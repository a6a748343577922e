#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lens_mcp::main_entry().await
}
