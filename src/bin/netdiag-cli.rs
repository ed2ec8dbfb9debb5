use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "netdiag-cli")]
#[command(about = "Command-line client for the netdiag API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000", env = "NETDIAG_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the service is up
    Ping,
    /// Fire a fixed number of GETs at a target URL
    Load {
        target: String,
        #[arg(short, long)]
        requests: Option<i64>,
        #[arg(short, long)]
        timeout: Option<f64>,
    },
    /// Search for the largest healthy concurrency level
    Capacity {
        target: String,
        /// Comma-separated levels, e.g. 10,25,50
        #[arg(short, long, value_delimiter = ',')]
        steps: Option<Vec<u32>>,
        #[arg(short, long)]
        timeout: Option<f64>,
    },
    /// Service/version scan with nmap
    Nmap { target: String },
    /// Ping a host and summarize loss and round-trip times
    PingStats {
        target: String,
        #[arg(short, long)]
        count: Option<i64>,
    },
    /// Trace the route to a host
    Traceroute {
        target: String,
        #[arg(short, long)]
        max_hops: Option<i64>,
    },
    /// Resolve a hostname
    Dns { hostname: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Ping => client.get(format!("{}/api/ping", base)),
        Commands::Load { target, requests, timeout } => {
            let mut body = body_with("url", &target);
            insert_opt(&mut body, "requests", requests.map(Value::from));
            insert_opt(&mut body, "timeout", timeout.map(Value::from));
            client.post(format!("{}/api/http-load-test", base)).json(&body)
        }
        Commands::Capacity { target, steps, timeout } => {
            let mut body = body_with("url", &target);
            insert_opt(&mut body, "steps", steps.map(|s| json!(s)));
            insert_opt(&mut body, "timeout", timeout.map(Value::from));
            client.post(format!("{}/api/capacity-test", base)).json(&body)
        }
        Commands::Nmap { target } => client
            .post(format!("{}/api/test-nmap", base))
            .json(&body_with("target", &target)),
        Commands::PingStats { target, count } => {
            let mut body = body_with("target", &target);
            insert_opt(&mut body, "count", count.map(Value::from));
            client.post(format!("{}/api/ping-stats", base)).json(&body)
        }
        Commands::Traceroute { target, max_hops } => {
            let mut body = body_with("target", &target);
            insert_opt(&mut body, "max_hops", max_hops.map(Value::from));
            client.post(format!("{}/api/traceroute", base)).json(&body)
        }
        Commands::Dns { hostname } => client
            .post(format!("{}/api/dns-lookup", base))
            .json(&body_with("hostname", &hostname)),
    };

    print_response(request.send().await?).await
}

fn body_with(key: &str, value: &str) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert(key.to_string(), Value::from(value));
    body
}

fn insert_opt(body: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        body.insert(key.to_string(), value);
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: API returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
    Ok(())
}
