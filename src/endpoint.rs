//! Endpoint registry: the fixed set of API operations and their URL templates

use crate::{NowPaymentsError, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;
use std::str::FromStr;

/// Characters escaped inside a substituted argument (RFC 3986 unreserved are kept)
const ARGUMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const PLACEHOLDER: &str = "{}";

/// A positional template argument
pub type Arg<'a> = &'a (dyn fmt::Display + Sync);

/// HTTP method an endpoint is normally called with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// An API operation known to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// API health check
    Status,
    /// All cryptocurrencies available for payments
    Currencies,
    /// Coins enabled in the merchant's coin settings
    MerchantCoins,
    /// Approximate fiat to crypto conversion
    Estimate,
    /// Payment creation
    Payment,
    /// Payment lookup by id
    PaymentStatus,
    /// Minimum payment amount for a currency pair
    MinAmount,
}

impl Endpoint {
    /// Every registered endpoint
    pub const ALL: [Endpoint; 7] = [
        Endpoint::Status,
        Endpoint::Currencies,
        Endpoint::MerchantCoins,
        Endpoint::Estimate,
        Endpoint::Payment,
        Endpoint::PaymentStatus,
        Endpoint::MinAmount,
    ];

    /// Registry name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Status => "STATUS",
            Endpoint::Currencies => "CURRENCIES",
            Endpoint::MerchantCoins => "MERCHANT_COINS",
            Endpoint::Estimate => "ESTIMATE",
            Endpoint::Payment => "PAYMENT",
            Endpoint::PaymentStatus => "PAYMENT_STATUS",
            Endpoint::MinAmount => "MIN_AMOUNT",
        }
    }

    /// Path template relative to the versioned base URL; `{}` marks a
    /// positional argument.
    pub fn template(&self) -> &'static str {
        match self {
            Endpoint::Status => "status",
            Endpoint::Currencies => "currencies",
            Endpoint::MerchantCoins => "merchant/coins",
            Endpoint::Estimate => "estimate?amount={}&currency_from={}&currency_to={}",
            Endpoint::Payment => "payment",
            Endpoint::PaymentStatus => "payment/{}",
            Endpoint::MinAmount => "min-amount?currency_from={}&currency_to={}",
        }
    }

    /// HTTP method the API expects for this operation
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Payment => Method::Post,
            _ => Method::Get,
        }
    }

    /// Fail with `WrongMethod` unless this endpoint is called with `method`
    pub fn expect_method(&self, method: Method) -> Result<()> {
        if self.method() != method {
            return Err(NowPaymentsError::WrongMethod {
                endpoint: self.name(),
                method: method.as_str(),
            });
        }
        Ok(())
    }

    /// Number of positional arguments the template expects
    pub fn arity(&self) -> usize {
        self.template().matches(PLACEHOLDER).count()
    }

    /// Fill the template's placeholders left to right.
    ///
    /// Each argument is percent-encoded, so plain ids and currency codes
    /// come out verbatim while `&`, `/` and friends cannot escape their slot.
    pub fn render(&self, args: &[Arg<'_>]) -> Result<String> {
        let expected = self.arity();
        if args.len() != expected {
            return Err(NowPaymentsError::TemplateArguments {
                endpoint: self.name(),
                expected,
                got: args.len(),
            });
        }

        let template = self.template();
        let mut path = String::with_capacity(template.len() + 16 * expected);
        let mut pieces = template.split(PLACEHOLDER);
        if let Some(head) = pieces.next() {
            path.push_str(head);
        }
        for (piece, arg) in pieces.zip(args) {
            let value = arg.to_string();
            path.extend(utf8_percent_encode(&value, ARGUMENT));
            path.push_str(piece);
        }

        Ok(path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = NowPaymentsError;

    fn from_str(s: &str) -> Result<Self> {
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| NowPaymentsError::unknown_operation(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_round_trip() {
        for endpoint in Endpoint::ALL {
            assert_eq!(endpoint.name().parse::<Endpoint>().unwrap(), endpoint);
        }
        assert_eq!(
            "merchant_coins".parse::<Endpoint>().unwrap(),
            Endpoint::MerchantCoins
        );
    }

    #[test]
    fn test_unknown_operation() {
        let err = "REFUND".parse::<Endpoint>().unwrap_err();
        assert!(matches!(err, NowPaymentsError::UnknownOperation { ref name } if name == "REFUND"));
        assert!(err.is_programmer_error());
    }

    #[test]
    fn test_arity() {
        assert_eq!(Endpoint::Status.arity(), 0);
        assert_eq!(Endpoint::Payment.arity(), 0);
        assert_eq!(Endpoint::PaymentStatus.arity(), 1);
        assert_eq!(Endpoint::MinAmount.arity(), 2);
        assert_eq!(Endpoint::Estimate.arity(), 3);
    }

    #[test]
    fn test_only_payment_is_post() {
        for endpoint in Endpoint::ALL {
            let expected = if endpoint == Endpoint::Payment {
                Method::Post
            } else {
                Method::Get
            };
            assert_eq!(endpoint.method(), expected);
        }
    }

    #[test]
    fn test_expect_method() {
        assert!(Endpoint::Status.expect_method(Method::Get).is_ok());
        assert!(Endpoint::Payment.expect_method(Method::Post).is_ok());

        let err = Endpoint::Payment.expect_method(Method::Get).unwrap_err();
        assert!(matches!(
            err,
            NowPaymentsError::WrongMethod {
                endpoint: "PAYMENT",
                method: "GET"
            }
        ));
        assert!(err.is_programmer_error());
        assert!(Endpoint::PaymentStatus.expect_method(Method::Post).is_err());
    }

    #[test]
    fn test_render_in_order() {
        let path = Endpoint::Estimate.render(&[&100, &"usd", &"btc"]).unwrap();
        assert_eq!(path, "estimate?amount=100&currency_from=usd&currency_to=btc");

        let path = Endpoint::MinAmount.render(&[&"eth", &"trx"]).unwrap();
        assert_eq!(path, "min-amount?currency_from=eth&currency_to=trx");
    }

    #[test]
    fn test_render_without_placeholders() {
        assert_eq!(Endpoint::MerchantCoins.render(&[]).unwrap(), "merchant/coins");
    }

    #[test]
    fn test_render_escapes_arguments() {
        let path = Endpoint::PaymentStatus.render(&[&"12/34?x=1"]).unwrap();
        assert_eq!(path, "payment/12%2F34%3Fx%3D1");

        let path = Endpoint::Estimate.render(&[&"19.99", &"usd", &"usdt-trc20"]).unwrap();
        assert_eq!(
            path,
            "estimate?amount=19.99&currency_from=usd&currency_to=usdt-trc20"
        );
    }

    #[test]
    fn test_render_argument_mismatch() {
        let err = Endpoint::Estimate.render(&[&100, &"usd"]).unwrap_err();
        match err {
            NowPaymentsError::TemplateArguments {
                endpoint,
                expected,
                got,
            } => {
                assert_eq!(endpoint, "ESTIMATE");
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(Endpoint::Status.render(&[&1]).is_err());
    }
}
