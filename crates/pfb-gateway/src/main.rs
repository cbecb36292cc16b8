use clap::Parser;
use pfb_gateway::AppState;
use std::net::SocketAddr;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "pfb-gateway")]
#[command(about = "Local stand-in for a node gateway accepting PFB/PFD submissions")]
struct Args {
    /// Address to listen on, e.g. 127.0.0.1:26659
    #[arg(long, default_value = "127.0.0.1:26659")]
    listen: String,

    /// Height reported for the first accepted submission
    #[arg(long, default_value_t = 1)]
    start_height: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let addr: SocketAddr = args.listen.parse()?;
    let app = pfb_gateway::router(AppState::new(args.start_height));

    info!("pfb-gateway listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
