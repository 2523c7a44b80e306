//! Example client walking through every NOWPayments operation
//!
//! Reads `NOWPAYMENTS_API_KEY` (and optionally `NOWPAYMENTS_SANDBOX`,
//! `NOWPAYMENTS_DEBUG`) from the environment. Set `NOWPAYMENTS_DEBUG=1` to
//! print the URLs without touching the network.

use nowpayments::{
    ApiResponse, EstimateResponse, NowPaymentsClient, PaymentRequest, PaymentResponse,
    SandboxCase,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nowpayments=debug")),
        )
        .init();

    let client = NowPaymentsClient::from_env()?;
    println!("Using {}", client.environment().base_url());

    print_response("status", client.status().await?);
    print_response("currencies", client.currencies().await?);
    print_response("merchant coins", client.merchant_coins().await?);
    print_response("min amount", client.min_amount("btc", "usd").await?);

    let estimate = client.estimate(100, "usd", "btc").await?;
    if let Some(estimate) = estimate.clone().decode::<EstimateResponse>()? {
        println!(
            "100 {} is about {} {}",
            estimate.currency_from, estimate.estimated_amount, estimate.currency_to
        );
    }
    print_response("estimate", estimate);

    let mut request = PaymentRequest::new(100, "usd", "btc")
        .with_order_id("demo-1")
        .with_order_description("Demo order");
    if client.environment().is_sandbox() {
        request = request.with_case(SandboxCase::Success);
    }

    let created = client.create_payment(&request).await?;
    if let Some(payment) = created.clone().decode::<PaymentResponse>().ok().flatten() {
        println!("Created payment {} ({})", payment.id(), payment.payment_status);
        print_response("payment status", client.payment_status(payment.id()).await?);
    } else {
        print_response("create payment", created);
    }

    Ok(())
}

fn print_response(label: &str, response: ApiResponse) {
    match response {
        ApiResponse::Url(url) => println!("{label}: {url}"),
        ApiResponse::Json(body) => println!("{label}: {body}"),
        ApiResponse::NotOk(status) => println!("{label}: rejected with {status}"),
    }
}
