mod config;

use anyhow::Result;
use clap::Parser;
use config::ConsoleConfig;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use dotenv::dotenv;
use ghost_core::{
    connect_session, setup_logger, ConnectedAccount, DashboardSnapshot, DashboardStore,
    EnvWallet, EthersRpc, IntentAutomaton, PriceOracleClient, TransactionAnalyzer, WalletBridge,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

const ACTIONS: [&str; 7] = [
    "Connect wallet",
    "Audit transaction (hash)",
    "Simulate pre-flight (address)",
    "Sign intent",
    "Cancel intent",
    "Show dashboard",
    "Quit",
];

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = setup_logger();
    dotenv().ok();

    let args = Args::parse();
    let settings = match ConsoleConfig::load(&args.config) {
        Ok(settings) => {
            info!("Loaded overrides from {}", args.config);
            settings
        }
        Err(_) => {
            info!("No config file at {}; using defaults", args.config);
            ConsoleConfig::default()
        }
    };

    let profile = settings.chain_profile();
    info!(
        "GhostTx console targeting {} (chain id {})",
        profile.name, profile.chain_id
    );

    let store = Arc::new(DashboardStore::new());
    let rpc = Arc::new(EthersRpc::new(&profile)?);
    let oracle = PriceOracleClient::new(settings.oracle_config(), store.logs())?;
    let analyzer =
        TransactionAnalyzer::new(rpc, oracle, store.clone(), settings.analyzer_config());

    let wallet = match EnvWallet::from_env(&profile) {
        Ok(wallet) => Some(Arc::new(wallet)),
        Err(err) => {
            warn!("Wallet disabled: {err}");
            None
        }
    };
    let automaton = wallet.clone().map(|wallet| {
        IntentAutomaton::new(
            wallet as Arc<dyn WalletBridge>,
            store.clone(),
            settings.intent_config(),
        )
    });

    let mut account: Option<ConnectedAccount> = None;
    let theme = ColorfulTheme::default();

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&ACTIONS)
            .default(0)
            .interact()?;

        match choice {
            // connect
            0 => match &wallet {
                None => error!(
                    "No wallet signer configured. Set {} and restart.",
                    ghost_core::SIGNER_KEY_ENV
                ),
                Some(wallet) => {
                    match connect_session(wallet.as_ref(), &profile, &store.logs()).await {
                        Ok(connected) => {
                            info!(
                                "Connected {} | {:.4} {}",
                                connected.checksummed, connected.balance_eth, profile.native_symbol
                            );
                            account = Some(connected);
                        }
                        Err(err) => error!("Connection failed: {err}"),
                    }
                }
            },
            // audit
            1 => {
                if store.is_busy() {
                    warn!("An analysis is already in flight.");
                    continue;
                }
                let hash: String = Input::with_theme(&theme)
                    .with_prompt("Transaction hash")
                    .interact_text()?;
                match analyzer.analyze_by_hash(&hash).await {
                    Ok(_) => render(store.snapshot()),
                    Err(err) => error!("{err}"),
                }
            }
            // simulate
            2 => {
                let Some(connected) = &account else {
                    error!("Please connect wallet first.");
                    continue;
                };
                if store.is_busy() {
                    warn!("An analysis is already in flight.");
                    continue;
                }
                let input: String = Input::with_theme(&theme)
                    .with_prompt("Target address (empty for the example target)")
                    .allow_empty(true)
                    .interact_text()?;
                let target = if input.trim().is_empty() {
                    let example = settings.analyzer_config().example_target;
                    let preview: String = example.chars().take(10).collect();
                    store.logs().push(format!(
                        "[AUTO-FILL] Loaded Stylus optimized target: {preview}..."
                    ));
                    example
                } else {
                    input
                };
                match analyzer.analyze_by_address(&target, connected.address).await {
                    Ok(_) => render(store.snapshot()),
                    Err(err) => error!("{err}"),
                }
            }
            // sign
            3 => {
                let Some(automaton) = &automaton else {
                    error!(
                        "No wallet signer configured. Set {} and restart.",
                        ghost_core::SIGNER_KEY_ENV
                    );
                    continue;
                };
                let raw: String = Input::with_theme(&theme)
                    .with_prompt("Target gas (gwei)")
                    .default("0.05".to_string())
                    .interact_text()?;
                let target: f64 = match raw.trim().parse() {
                    Ok(value) => value,
                    Err(_) => {
                        error!("Not a number: {raw}");
                        continue;
                    }
                };
                if let Some(connected) = &account {
                    if connected.balance_eth == 0.0 {
                        warn!("Zero balance: the intent cannot be funded once triggered.");
                    }
                }
                match automaton.sign(target).await {
                    Ok(()) => info!("Intent armed. Relayer monitoring at {target} Gwei."),
                    Err(err) => error!("{err}"),
                }
            }
            // cancel
            4 => {
                if let Some(automaton) = &automaton {
                    automaton.cancel();
                    info!("Intent state: {}", automaton.state());
                }
            }
            5 => render(store.snapshot()),
            _ => break,
        }
    }

    Ok(())
}

fn render(view: DashboardSnapshot) {
    println!("\n=== GhostTx Dashboard ===");
    println!(
        "Intent: {} | {}",
        view.intent,
        if view.busy { "analyzing..." } else { "ready" }
    );
    if let Some(result) = &view.result {
        println!("Source: {}", result.source_id);
        for row in &result.rows {
            let gas = row
                .gas_used
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<18} {:<18} gas {:<12} {}",
                row.label, row.status_text, gas, row.outcome
            );
        }
    }
    if let Some(breakdown) = &view.breakdown {
        println!(
            "Gas breakdown: execution {} | calldata {} | storage {}",
            breakdown.execution, breakdown.calldata, breakdown.storage
        );
    }
    if let Some(memory) = &view.memory {
        let slots: Vec<String> = memory
            .iter()
            .map(|slot| format!("{} {}%", slot.offset, slot.usage_percent))
            .collect();
        println!("Memory heap: {}", slots.join(" | "));
    }
    if let Some(multiplier) = view.multiplier {
        println!("Efficiency multiplier: {multiplier:.2}x");
    }
    println!("--- Trace ---");
    for line in &view.logs {
        println!("{line}");
    }
    println!();
}
