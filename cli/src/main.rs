//! chaincall CLI — call view functions and probe RPC endpoints from the terminal.
//!
//! Usage:
//! ```bash
//! # Call a view function
//! chaincall call --address 0xdAC17F958D2ee523a2206206994597C13D831ec7 \
//!     --function symbol --abi '["function symbol() view returns (string)"]' \
//!     --url https://ethereum.publicnode.com
//!
//! # Check which endpoint a URL resolves to
//! chaincall probe --url https://ethereum-sepolia.publicnode.com
//!
//! # Run the TestToken read sequence
//! chaincall demo
//! ```

mod demo;

use std::env;
use std::process;

use serde_json::Value;

use chaincall_core::call::ContractCallRequest;
use chaincall_providers::{public, ProviderResolver};
use chaincall_server::{init_tracing, Gateway, GatewayConfig};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let result = match args[1].as_str() {
        "call" => cmd_call(&config, &args[2..]).await,
        "probe" => cmd_probe(&config, &args[2..]).await,
        "demo" => cmd_demo(&config, &args[2..]).await,
        "providers" => {
            cmd_providers();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("chaincall {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Same environment as the server, but quieter logs unless asked.
fn load_config() -> Result<GatewayConfig, String> {
    let mut config = GatewayConfig::from_env().map_err(|e| format!("{e:#}"))?;
    if env::var("CHAINCALL_LOG_LEVEL").is_err() {
        config.log.level = "warn".into();
    }
    init_tracing(&config.log);
    Ok(config)
}

fn print_usage() {
    println!("chaincall {}", env!("CARGO_PKG_VERSION"));
    println!("Read-only smart-contract calls over an arbitrary ABI\n");
    println!("USAGE:");
    println!("    chaincall <COMMAND>\n");
    println!("COMMANDS:");
    println!("    call       Call a view/pure function");
    println!("    probe      Resolve an RPC URL and report the bound endpoint");
    println!("    demo       Run the TestToken read sequence");
    println!("    providers  List built-in public endpoints");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("CALL FLAGS:");
    println!("    --address <ADDR>     Contract address  [required]");
    println!("    --function <NAME>    Function name or signature  [required]");
    println!("    --abi <JSON|@FILE>   ABI fragments, inline or from a file  [required]");
    println!("    --args <JSON>        Arguments as a JSON array  [default: []]");
    println!("    --url <URL>          RPC endpoint  [default: $CHAINCALL_DEFAULT_RPC]\n");
    println!("PROBE FLAGS:");
    println!("    --url <URL>          RPC endpoint  [default: $CHAINCALL_DEFAULT_RPC]\n");
    println!("DEMO FLAGS:");
    println!("    --address <ADDR>     TestToken address  [default: $CHAINCALL_DEMO_CONTRACT]");
    println!("    --url <URL>          RPC endpoint  [default: $CHAINCALL_DEFAULT_RPC]");
}

async fn cmd_call(config: &GatewayConfig, args: &[String]) -> Result<(), String> {
    let address = parse_flag(args, "--address").ok_or("--address is required")?;
    let function = parse_flag(args, "--function").ok_or("--function is required")?;
    let abi = parse_flag(args, "--abi").ok_or("--abi is required")?;
    let abi = read_abi(&abi)?;
    let call_args = match parse_flag(args, "--args") {
        Some(raw) => serde_json::from_str::<Vec<Value>>(&raw)
            .map_err(|e| format!("--args must be a JSON array: {e}"))?,
        None => vec![],
    };

    let mut request = ContractCallRequest::new(address, function, abi, call_args);
    request.rpc_url = parse_flag(args, "--url");

    let response = Gateway::from_config(config)
        .call(request)
        .await
        .map_err(|e| format!("[{}] {e}", e.code()))?;

    println!("{}", serde_json::to_string_pretty(&response.result).unwrap_or_default());
    Ok(())
}

async fn cmd_probe(config: &GatewayConfig, args: &[String]) -> Result<(), String> {
    let url = parse_flag(args, "--url").unwrap_or_else(|| config.default_rpc_url.clone());
    let resolver = ProviderResolver::http(config.resolver_config(), config.http_client_config());

    println!("Resolving {url}...");
    let start = std::time::Instant::now();
    let handle = resolver.resolve(&url).await.map_err(|e| e.to_string())?;

    println!("  Endpoint:  {}", handle.endpoint());
    match handle.chain_id() {
        Some(id) => println!("  Chain id:  {id}"),
        None => println!("  Chain id:  (not probed)"),
    }
    println!("  Fallback:  {}", if handle.is_fallback() { "yes" } else { "no" });
    println!("  Latency:   {}ms", start.elapsed().as_millis());
    Ok(())
}

async fn cmd_demo(config: &GatewayConfig, args: &[String]) -> Result<(), String> {
    let address = parse_flag(args, "--address").unwrap_or_else(|| config.demo_contract_address.clone());
    let url = parse_flag(args, "--url").unwrap_or_else(|| config.default_rpc_url.clone());
    let gateway = Gateway::from_config(config);

    println!("Contract: {address}");
    println!("RPC:      {url}\n");

    let calls = demo::test_token_calls();
    let total = calls.len();
    let mut passed = 0;

    for call in calls {
        let request = ContractCallRequest::new(
            address.clone(),
            call.function,
            Value::Array(vec![call.abi]),
            vec![],
        )
        .with_rpc_url(url.clone());

        match gateway.call(request).await {
            Ok(response) => {
                passed += 1;
                println!("  ok    {:<20} {}", call.function, response.result);
            }
            Err(e) => println!("  FAIL  {:<20} {e}  ({})", call.function, call.description),
        }
    }

    println!("\n{passed}/{total} calls succeeded");
    if passed == total {
        Ok(())
    } else {
        Err(format!("{} call(s) failed", total - passed))
    }
}

fn cmd_providers() {
    println!("Built-in public endpoints:\n");
    for endpoint in public::known_endpoints() {
        println!("  {:<20} chain {:<10} {}", endpoint.name, endpoint.chain_id, endpoint.url);
    }
}

/// `--abi` takes inline JSON, `@path` to a JSON file, or a single
/// human-readable signature.
fn read_abi(raw: &str) -> Result<Value, String> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?,
        None => raw.to_string(),
    };
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}
