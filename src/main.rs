use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use jsonapi_simple::config::JsonApiConfig;
use jsonapi_simple::parser::decode_query;

#[derive(Parser, Debug)]
#[command(name = "jsonapi-simple")]
#[command(about = "Decode JSON:API filter, fieldset and paging query parameters")]
struct Args {
    /// Configuration file path (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Query string to decode, e.g. "filter[age][gte]=18&sort=-age"
    query: String,
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => JsonApiConfig::load_from_file(path)?,
        None => JsonApiConfig::default_config(),
    };
    tracing::debug!(?config, "configuration loaded");

    match decode_query(&config, &args.query) {
        Ok(decoded) => {
            println!("{}", to_json(&decoded, args.pretty)?);
            Ok(())
        }
        Err(err) => {
            let (_, document) = err.to_response();
            println!("{}", to_json(&document, args.pretty)?);
            process::exit(2);
        }
    }
}
