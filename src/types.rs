//! Request bodies and response models for the NOWPayments API

use rust_decimal::Decimal;
use serde::{ser, Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Outcome the sandbox should simulate for a new payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SandboxCase {
    Success,
    PartiallyPaid,
    Common,
}

/// Body of a create-payment call
///
/// The three required fields come from [`PaymentRequest::new`]; everything
/// else is optional and left out of the body when unset. Fields the API
/// adds later can go through [`PaymentRequest::with_extra`], which merges
/// them verbatim into the top level of the body; an extra key that names a
/// typed field replaces that field's value, so every key is sent once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(remote = "Self")]
pub struct PaymentRequest {
    /// Fiat equivalent of the price to be paid in crypto
    #[serde(with = "rust_decimal::serde::float")]
    pub price_amount: Decimal,
    /// Fiat currency `price_amount` is specified in
    pub price_currency: String,
    /// Crypto currency the customer pays with
    pub pay_currency: String,
    /// Amount the customer has to pay, in `pay_currency`
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pay_amount: Option<Decimal>,
    /// URL receiving payment status callbacks; must be http or https
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipn_callback_url: Option<String>,
    /// Store-side order id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Store-side order description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_description: Option<String>,
    /// Existing purchase to attach another payment to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_id: Option<u64>,
    /// Send the funds to this address instead of the account wallet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_address: Option<String>,
    /// Currency of `payout_address`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_currency: Option<String>,
    /// Extra id, memo or tag for `payout_address`; numeric for most coins,
    /// text for a few
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_extra_id: Option<Value>,
    /// Lock the exchange rate for the payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_rate: Option<bool>,
    /// Sandbox only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<SandboxCase>,
    /// Free-form fields merged into the body as-is
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl PaymentRequest {
    pub fn new(
        price_amount: impl Into<Decimal>,
        price_currency: impl Into<String>,
        pay_currency: impl Into<String>,
    ) -> Self {
        Self {
            price_amount: price_amount.into(),
            price_currency: price_currency.into(),
            pay_currency: pay_currency.into(),
            pay_amount: None,
            ipn_callback_url: None,
            order_id: None,
            order_description: None,
            purchase_id: None,
            payout_address: None,
            payout_currency: None,
            payout_extra_id: None,
            fixed_rate: None,
            case: None,
            extra: Map::new(),
        }
    }

    pub fn with_pay_amount(mut self, pay_amount: impl Into<Decimal>) -> Self {
        self.pay_amount = Some(pay_amount.into());
        self
    }

    pub fn with_ipn_callback_url(mut self, url: impl Into<String>) -> Self {
        self.ipn_callback_url = Some(url.into());
        self
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_order_description(mut self, description: impl Into<String>) -> Self {
        self.order_description = Some(description.into());
        self
    }

    pub fn with_purchase_id(mut self, purchase_id: u64) -> Self {
        self.purchase_id = Some(purchase_id);
        self
    }

    /// Pay out to an external address, in the given currency
    pub fn with_payout(mut self, address: impl Into<String>, currency: impl Into<String>) -> Self {
        self.payout_address = Some(address.into());
        self.payout_currency = Some(currency.into());
        self
    }

    pub fn with_payout_extra_id(mut self, extra_id: impl Into<Value>) -> Self {
        self.payout_extra_id = Some(extra_id.into());
        self
    }

    pub fn with_fixed_rate(mut self, fixed_rate: bool) -> Self {
        self.fixed_rate = Some(fixed_rate);
        self
    }

    pub fn with_case(mut self, case: SandboxCase) -> Self {
        self.case = Some(case);
        self
    }

    /// Add a field the typed API does not know about
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The JSON object sent to the API
    pub fn to_body(&self) -> crate::Result<Value> {
        let mut body = PaymentRequest::serialize(self, serde_json::value::Serializer)?;
        if let Value::Object(fields) = &mut body {
            for (key, value) in &self.extra {
                fields.insert(key.clone(), value.clone());
            }
        }
        Ok(body)
    }
}

impl Serialize for PaymentRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_body()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

/// `GET status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// `"OK"` when the API is healthy
    pub message: String,
}

impl StatusResponse {
    pub fn is_ok(&self) -> bool {
        self.message.eq_ignore_ascii_case("ok")
    }
}

/// `GET currencies`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrenciesResponse {
    pub currencies: Vec<String>,
}

/// `GET merchant/coins`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantCoinsResponse {
    #[serde(rename = "selectedCurrencies")]
    pub selected_currencies: Vec<String>,
}

/// `GET estimate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub currency_from: String,
    pub amount_from: Decimal,
    pub currency_to: String,
    pub estimated_amount: Decimal,
}

/// `GET min-amount`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinAmountResponse {
    pub currency_from: String,
    pub currency_to: String,
    pub min_amount: Decimal,
}

/// `POST payment` and `GET payment/{id}`
///
/// The API returns ids and amounts as strings on some endpoints and numbers
/// on others, so those stay as raw JSON values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment_id: Value,
    pub payment_status: String,
    #[serde(default)]
    pub pay_address: Option<String>,
    #[serde(default)]
    pub price_amount: Option<Value>,
    #[serde(default)]
    pub price_currency: Option<String>,
    #[serde(default)]
    pub pay_amount: Option<Value>,
    #[serde(default)]
    pub actually_paid: Option<Value>,
    #[serde(default)]
    pub pay_currency: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub order_description: Option<String>,
    #[serde(default)]
    pub purchase_id: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentResponse {
    /// Payment id as text, whichever JSON type the API used
    pub fn id(&self) -> String {
        match &self.payment_id {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the payment reached a state it will not leave
    pub fn is_final(&self) -> bool {
        matches!(
            self.payment_status.as_str(),
            "finished" | "failed" | "refunded" | "expired"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_minimal_payment_body() {
        let body = PaymentRequest::new(100, "usd", "btc").to_body().unwrap();
        assert_eq!(
            body,
            json!({
                "price_amount": 100.0,
                "price_currency": "usd",
                "pay_currency": "btc"
            })
        );
    }

    #[test]
    fn test_optional_fields_and_extra_are_merged() {
        let request = PaymentRequest::new(Decimal::from_str("19.99").unwrap(), "eur", "eth")
            .with_order_id("x1")
            .with_fixed_rate(true)
            .with_case(SandboxCase::PartiallyPaid)
            .with_payout("0xabc", "eth")
            .with_extra("is_fee_paid_by_user", true);

        let body = request.to_body().unwrap();
        assert_eq!(body["price_amount"], json!(19.99));
        assert_eq!(body["order_id"], "x1");
        assert_eq!(body["fixed_rate"], true);
        assert_eq!(body["case"], "partially_paid");
        assert_eq!(body["payout_address"], "0xabc");
        assert_eq!(body["payout_currency"], "eth");
        assert_eq!(body["is_fee_paid_by_user"], true);
        assert!(body.get("pay_amount").is_none());
        assert!(body.get("extra").is_none());
    }

    #[test]
    fn test_extra_overrides_typed_field_once() {
        let request = PaymentRequest::new(100, "usd", "btc")
            .with_order_id("a")
            .with_extra("order_id", "b")
            .with_extra("price_amount", 5);

        let wire = serde_json::to_string(&request).unwrap();
        assert_eq!(wire.matches("\"order_id\"").count(), 1, "wire body: {wire}");
        assert_eq!(wire.matches("\"price_amount\"").count(), 1, "wire body: {wire}");

        let sent: Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(sent, request.to_body().unwrap());
        assert_eq!(sent["order_id"], "b");
        assert_eq!(sent["price_amount"], 5);
    }

    #[test]
    fn test_payout_extra_id_keeps_json_type() {
        let numeric = PaymentRequest::new(10, "usd", "xrp")
            .with_payout("rAddress", "xrp")
            .with_payout_extra_id(123456)
            .to_body()
            .unwrap();
        assert_eq!(numeric["payout_extra_id"], json!(123456));

        let memo = PaymentRequest::new(10, "usd", "xlm")
            .with_payout_extra_id("memo-text")
            .to_body()
            .unwrap();
        assert_eq!(memo["payout_extra_id"], "memo-text");
    }

    #[test]
    fn test_payment_response_parsing() {
        let payment: PaymentResponse = serde_json::from_value(json!({
            "payment_id": 5745459419u64,
            "payment_status": "waiting",
            "pay_address": "3EZ2uTdVDAMFXTfc6uLDDKR6o8qKBZXVkj",
            "price_amount": 3999.5,
            "price_currency": "usd",
            "pay_amount": 0.17070286,
            "pay_currency": "btc",
            "order_id": "RGDBP-21314",
            "network": "btc"
        }))
        .unwrap();

        assert_eq!(payment.id(), "5745459419");
        assert!(!payment.is_final());
        assert_eq!(payment.order_id.as_deref(), Some("RGDBP-21314"));
        assert_eq!(payment.extra["network"], "btc");
    }

    #[test]
    fn test_estimate_response_parsing() {
        let estimate: EstimateResponse = serde_json::from_value(json!({
            "currency_from": "usd",
            "amount_from": 3999.5,
            "currency_to": "btc",
            "estimated_amount": 0.17061637
        }))
        .unwrap();

        assert_eq!(estimate.currency_to, "btc");
        let expected = Decimal::from_str("0.17061637").unwrap();
        assert!((estimate.estimated_amount - expected).abs() < Decimal::new(1, 12));
    }

    #[test]
    fn test_status_ok() {
        let status: StatusResponse = serde_json::from_value(json!({"message": "OK"})).unwrap();
        assert!(status.is_ok());
    }
}
