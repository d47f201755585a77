// Credential checker: looks up a VMP code against the public validator
// endpoint and prints the vigency result.

use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vmp_training_core::client::ApiClient;
use vmp_training_core::credential;
use vmp_training_core::models::ValidationStatus;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "vmp_training_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let code = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: vmp-training-core <VMP-YYYY-NNNNN>"))?;
    if !credential::is_valid_number(&code) {
        anyhow::bail!("'{}' is not a valid credential code", code);
    }

    let base_url = env::var("VMP_API_URL").unwrap_or_else(|_| "http://localhost:8000".into());
    let client = ApiClient::new(base_url);

    let res = client.validate_credential(&code).await?;
    match res.status {
        ValidationStatus::Valid => {
            let c = res.credential.as_ref();
            tracing::info!(
                course = c.map(|c| c.course_name.as_str()).unwrap_or("?"),
                "credential {} is vigente",
                code
            );
            println!("VIGENTE");
        }
        ValidationStatus::Expired => {
            println!("VENCIDA");
        }
        ValidationStatus::NotFound => {
            println!("NO ENCONTRADA");
        }
    }
    Ok(())
}
