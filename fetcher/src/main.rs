use anyhow::{anyhow, Context, Result};
use clap::Parser;
use reqwest::{header, Client, StatusCode, Url};
use searchcore::corpus::{parse_records, save_records, SonnetRecord};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fetcher")]
#[command(about = "Download Shakespeare's sonnets from PoetryDB into a corpus file")]
struct Cli {
    /// PoetryDB endpoint returning an array of sonnet records
    #[arg(long, default_value = "https://poetrydb.org/author,title/Shakespeare;Sonnet")]
    url: String,
    /// Output corpus file
    #[arg(long, default_value = "./data/shakespeare_sonnets.json")]
    output: PathBuf,
    /// Request timeout seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    #[arg(long, default_value = "sonnets-fetcher/0.1")]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    let url = Url::parse(&args.url).with_context(|| format!("invalid url {}", args.url))?;

    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    let records = fetch(&client, url).await?;
    save_records(&args.output, &records)?;
    tracing::info!(count = records.len(), output = %args.output.display(), "fetched and stored sonnets");
    Ok(())
}

async fn fetch(client: &Client, url: Url) -> Result<Vec<SonnetRecord>> {
    tracing::info!(%url, "fetching sonnets");
    let resp = client.get(url).header(header::ACCEPT, "application/json").send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    decode(status, &body)
}

/// Turn a PoetryDB response into validated records.
fn decode(status: StatusCode, body: &str) -> Result<Vec<SonnetRecord>> {
    if !status.is_success() {
        return Err(anyhow!("failed to fetch sonnets, status code: {}", status.as_u16()));
    }
    let records = parse_records(body).context("decoding PoetryDB response")?;
    validate(&records)?;
    Ok(records)
}

/// Every title must carry a sonnet number, otherwise the corpus is unusable.
fn validate(records: &[SonnetRecord]) -> Result<()> {
    for rec in records {
        searchcore::corpus::parse_title(&rec.title)?;
    }
    Ok(())
}
