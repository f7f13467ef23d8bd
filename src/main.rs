use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Map};
use tracing::{info, warn};
use uuid::Uuid;

use payop_gateway::app::logging::init_tracing;
use payop_gateway::gateway::ReqwestTransport;
use payop_gateway::models::{ApiOutcome, Card, Invoice};
use payop_gateway::utils::money::ensure_valid_amount;
use payop_gateway::utils::sign;
use payop_gateway::{Config, PayopClient, PayopGateway, PayopService};

#[derive(Parser)]
#[command(name = "payop", version, about = "Command line client for the Payop payment API")]
struct Cli {
    /// TOML configuration file. PAYOP_* environment variables are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the request signature for an order
    Sign {
        transaction_id: String,
        amount: Decimal,
        currency: String,
    },
    #[command(flatten)]
    Api(ApiCommand),
}

/// Subcommands that talk to the remote API.
#[derive(Subcommand)]
enum ApiCommand {
    /// Payment methods available to the application (cards only unless --all)
    Methods {
        #[arg(long)]
        all: bool,
    },
    /// Checkout page link for an invoice
    Link {
        invoice_id: String,
        #[arg(long, default_value = "en")]
        locale: String,
    },
    /// Fetch a remote invoice
    Invoice { identifier: String },
    /// Create a remote invoice from an application invoice record (JSON file)
    CreateInvoice {
        invoice: PathBuf,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        payment_method: Option<String>,
        #[arg(long)]
        international: bool,
        #[arg(long, requires = "fail_url")]
        result_url: Option<String>,
        #[arg(long, requires = "result_url")]
        fail_url: Option<String>,
    },
    /// Send a purchase request through the gateway
    Purchase {
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        currency: String,
        #[arg(long)]
        transaction_id: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        return_url: String,
        #[arg(long)]
        cancel_url: String,
        #[arg(long)]
        product_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        payment_method: Option<String>,
    },
    /// Start a checkout transaction for an invoice
    Checkout {
        invoice_id: String,
        #[arg(long)]
        check_status_url: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        card_token: Option<String>,
    },
    /// Tokenize a card (JSON file with pan, expirationDate, cvv, holderName)
    CardToken { invoice_id: String, card: PathBuf },
    /// Check a checkout transaction status
    Status { txid: String },
    /// Fetch a transaction
    Transaction { txid: String },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_outcome<T: Serialize>(outcome: &ApiOutcome<T>) -> anyhow::Result<()> {
    if outcome.is_error() {
        warn!("Remote call failed");
    }
    print_json(outcome)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Sign {
            transaction_id,
            amount,
            currency,
        } => sign_order(&config, &transaction_id, amount, &currency),
        Command::Api(command) => run(command, &config).await,
    }
}

fn sign_order(config: &Config, transaction_id: &str, amount: Decimal, currency: &str) -> anyhow::Result<()> {
    if config.secret_key.is_empty() {
        bail!("secret_key is not configured");
    }
    let amount = ensure_valid_amount(amount)?;
    println!("{}", sign(transaction_id, amount, currency, &config.secret_key));
    Ok(())
}

async fn run(command: ApiCommand, config: &Config) -> anyhow::Result<()> {
    config.validate()?;
    info!("Using Payop API at {} (test mode: {})", config.base_url, config.test_mode);

    let transport = Arc::new(ReqwestTransport::new(Duration::from_millis(config.timeout_ms))?);
    let client = Arc::new(PayopClient::with_transport(config, transport.clone()));
    let service = PayopService::new(client.clone(), config);

    match command {
        ApiCommand::Methods { all } => {
            if all {
                print_json(&client.list_payment_methods().await.unwrap_or_default())?;
            } else {
                print_json(&service.get_card_payment_methods().await)?;
            }
        }
        ApiCommand::Link { invoice_id, locale } => {
            println!("{}", service.get_payment_link(&invoice_id, &locale));
        }
        ApiCommand::Invoice { identifier } => match service.find_by_identifier(&identifier).await {
            Some(invoice) => {
                info!("Invoice {} status: {:?}", identifier, invoice.status());
                print_json(&invoice)?;
            }
            None => bail!("invoice {} could not be fetched", identifier),
        },
        ApiCommand::CreateInvoice {
            invoice,
            price,
            payment_method,
            international,
            result_url,
            fail_url,
        } => {
            let record: Invoice = read_json(&invoice)?;
            let price = price.unwrap_or(record.amount);

            let created = match (result_url, fail_url) {
                (Some(result_url), Some(fail_url)) => {
                    service
                        .create_new_invoice(&record, price, &result_url, &fail_url, payment_method.as_deref())
                        .await
                }
                _ => {
                    service
                        .create_invoice(&record, price, payment_method.as_deref(), international)
                        .await
                }
            };

            match created {
                Some(invoice_id) => print_json(&json!({
                    "invoiceId": invoice_id,
                    "paymentLink": service.get_payment_link(&invoice_id, &config.language),
                }))?,
                None => bail!("could not create invoice for order {}", record.transaction_id),
            }
        }
        ApiCommand::Purchase {
            amount,
            currency,
            transaction_id,
            description,
            return_url,
            cancel_url,
            product_name,
            email,
            payment_method,
        } => {
            let gateway = PayopGateway::new(config, transport);
            let transaction_id = transaction_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            let description = description.unwrap_or_else(|| format!("Payment for order #{}", transaction_id));

            let mut request = gateway
                .purchase()
                .amount(amount)
                .currency(&currency)
                .transaction_id(transaction_id.as_str())
                .description(description)
                .return_url(return_url)
                .cancel_url(cancel_url)
                .product_name(product_name.unwrap_or_else(|| config.item_name.clone()));
            if let Some(email) = email {
                let mut payer = Map::new();
                payer.insert("email".to_string(), json!(email));
                request = request.email(email).payer(payer);
            }
            if let Some(payment_method) = payment_method {
                request = request.payment_method(payment_method);
            }

            info!("Sending {} purchase {}", gateway.name(), transaction_id);
            let response = request.send().await?;
            print_json(&json!({
                "transactionId": transaction_id,
                "successful": response.is_successful(),
                "processing": response.is_processing(),
                "pending": response.is_pending(),
                "completed": response.is_completed(),
                "code": response.code(),
                "data": response.data(),
            }))?;
        }
        ApiCommand::Checkout {
            invoice_id,
            check_status_url,
            email,
            card_token,
        } => {
            let mut customer = Map::new();
            customer.insert("email".to_string(), json!(email));
            let outcome = client
                .create_transaction(&invoice_id, &check_status_url, &customer, card_token.as_deref())
                .await;
            print_outcome(&outcome)?;
        }
        ApiCommand::CardToken { invoice_id, card } => {
            let card: Card = read_json(&card)?;
            print_outcome(&client.create_card_token(&invoice_id, &card).await)?;
        }
        ApiCommand::Status { txid } => {
            print_outcome(&client.check_transaction_status(&txid).await)?;
        }
        ApiCommand::Transaction { txid } => {
            let outcome = client.get_transaction(&txid).await;
            if let Some(transaction) = outcome.data() {
                info!("Transaction {} status: {:?}", txid, transaction.status());
            }
            print_outcome(&outcome)?;
        }
    }

    Ok(())
}
