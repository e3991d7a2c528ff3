use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client_core::{
    HttpProductService, LookupOutcome, OrderError, OrderFormController, UserAction,
};
use shared::domain::OrderId;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, normalize_server_url, CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(about = "Order entry against the /product backend")]
struct Cli {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the products of a category.
    Products {
        #[arg(long)]
        category: String,
    },
    /// Look up a product's unit price and the line total.
    Price {
        #[arg(long)]
        product: String,
        #[arg(long, default_value = "1")]
        amount: String,
    },
    /// Fill the order form and submit it.
    Place {
        #[arg(long)]
        customer: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        product: String,
        #[arg(long, default_value = "1")]
        amount: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete an existing order.
    Delete {
        #[arg(long)]
        order_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config);
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let server_url = normalize_server_url(&settings.server_url)?;
    let service = match settings.request_timeout() {
        Some(timeout) => HttpProductService::with_timeout(&server_url, timeout)?,
        None => HttpProductService::new(&server_url)?,
    };
    info!(endpoint = %service.endpoint(), "using order backend");

    let controller = OrderFormController::new(Arc::new(service));
    let mut events = controller.subscribe_events();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => println!("{}", render::describe_event(&event)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "event printer lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = run(&controller, cli.command).await;

    drop(controller);
    if let Err(error) = printer.await {
        tracing::warn!(%error, "event printer task failed");
    }
    result
}

async fn run(controller: &OrderFormController, command: Command) -> Result<()> {
    match command {
        Command::Products { category } => {
            controller.open_form().await;
            let outcome = controller.on_category_changed(&category).await;
            if outcome == LookupOutcome::Failed {
                println!("product list for '{category}' is unavailable");
            }
            for line in render::product_lines(&controller.product_options().await) {
                println!("{line}");
            }
        }
        Command::Price { product, amount } => {
            controller.open_form().await;
            controller.set_amount_input(&amount).await;
            let outcome = controller.on_product_changed(&product).await;
            if outcome == LookupOutcome::Failed {
                println!("price for '{product}' is unavailable");
            }
            println!("{}", render::pricing_line(&controller.form().await));
        }
        Command::Place {
            customer,
            category,
            product,
            amount,
            status,
            note,
            date,
        } => {
            controller.open_form().await;
            if let Some(date) = date {
                controller.set_date(date).await;
            }
            controller.set_customer_name(customer).await;
            if controller.on_category_changed(&category).await == LookupOutcome::Failed {
                println!("product list for '{category}' is unavailable");
            }
            if controller.on_product_changed(&product).await == LookupOutcome::Failed {
                println!("price for '{product}' is unavailable");
            }
            controller.set_amount_input(&amount).await;
            if let Some(status) = status {
                controller.set_status(status).await;
            }
            if let Some(note) = note {
                controller.set_note(note).await;
            }
            println!("{}", render::pricing_line(&controller.form().await));

            let outcome = controller
                .submit_order()
                .await
                .map_err(|err| alert(err, UserAction::SubmitOrder))?;
            println!("{}", render::submit_summary(&outcome));
        }
        Command::Delete { order_id } => {
            let outcome = controller
                .delete_order(&OrderId::new(order_id))
                .await
                .map_err(|err| alert(err, UserAction::DeleteOrder))?;
            println!("{}", render::delete_summary(&outcome));
        }
    }
    Ok(())
}

fn alert(err: OrderError, action: UserAction) -> anyhow::Error {
    anyhow!(err.alert_text(action))
}
