use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use pfb_core::{
    constants::{DEFAULT_PORT, NODE_ERROR_HINT},
    Field, Form, Gateway, HttpGateway, Msg, Network, Submission,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pfb-cli")]
#[command(about = "Submit PFB/PFD transactions to a node gateway")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a PFB/PFD transaction
    Submit {
        /// Network: mocha, blockspacerace or arabica
        #[arg(long, default_value_t = Network::Mocha)]
        network: Network,
        /// Node IP address
        #[arg(long)]
        domain: String,
        /// Gateway port, must be open to public
        #[arg(long, default_value_t = DEFAULT_PORT.to_string())]
        port: String,
        /// Namespace ID (hex)
        #[arg(long)]
        namespace_id: String,
        /// Data (hex)
        #[arg(long)]
        data: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .pretty()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Submit {
            network,
            domain,
            port,
            namespace_id,
            data,
        } => {
            let mut form = Form::new();
            form.update(Msg::SetNetwork(network));
            form.update(Msg::Edit(Field::Domain, domain));
            form.update(Msg::Edit(Field::Port, port));
            form.update(Msg::Edit(Field::NamespaceId, namespace_id));
            form.update(Msg::Edit(Field::Data, data));

            let Some(out) = form.update(Msg::Submit) else {
                let missing: Vec<_> = form.missing_fields().iter().map(|f| f.label()).collect();
                bail!("incomplete form, missing: {}", missing.join(", "));
            };

            println!("{}", form.heading());
            println!("POST {}", out.url);
            let result = HttpGateway::new()
                .submit(&out.url, &out.body)
                .await
                .map_err(|e| e.to_string());
            form.update(Msg::Settled(result));

            let submission = form.submission();
            if let Some(message) = submission.error() {
                bail!("{message}\n{NODE_ERROR_HINT}");
            }
            match submission.result() {
                Some((height, tx_hash)) => {
                    println!("Success!");
                    println!("Height: {height}");
                    println!("Hash  : {tx_hash}");
                }
                None if matches!(submission, Submission::Succeeded { .. }) => {
                    bail!("node answered without a transaction height or hash\n{NODE_ERROR_HINT}")
                }
                None => bail!("submission did not settle: {submission:?}"),
            }
        }
    }
    Ok(())
}
