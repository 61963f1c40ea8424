use greeter_core::config::load_config;
use greeter_core::handler::handle;
use greeter_core::telemetry::init_tracing;
use greeter_core::OutgoingResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::Deserialize;
use std::env;
use tokio::io::AsyncReadExt;
use tracing::info;

/// The API Gateway proxy event. Only the body matters here; headers, path,
/// request context and the rest are dropped during deserialization.
#[derive(Debug, Default, Deserialize)]
struct ProxyRequest {
    #[serde(default)]
    body: Option<String>,
}

async fn lambda_handler(event: LambdaEvent<ProxyRequest>) -> Result<OutgoingResponse, Error> {
    let request = event.payload;
    Ok(handle(request.body.as_deref().unwrap_or_default()))
}

/// Local development: read one raw request body from stdin and print the
/// response envelope the function would return.
async fn run_local() -> Result<(), Error> {
    let mut raw_body = String::new();
    tokio::io::stdin().read_to_string(&mut raw_body).await?;

    println!("{}", render_response(&raw_body)?);
    Ok(())
}

fn render_response(raw_body: &str) -> Result<String, Error> {
    Ok(serde_json::to_string(&handle(raw_body))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config_path = env::var("GREETER_CONFIG_PATH").ok();
    let config = load_config(config_path.as_deref())
        .map_err(|e| format!("Failed to load configuration: {}", e))?;
    init_tracing(&config);

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("Running in AWS Lambda environment");
        lambda_runtime::run(service_fn(lambda_handler)).await
    } else {
        info!("Running in local development mode, reading request body from stdin");
        run_local().await
    }
}
