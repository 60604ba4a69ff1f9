//! Helpers for monetary amounts: lenient deserialization of store values and
//! currency formatting for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use serde::{Deserialize, Deserializer, de};

/// The currency symbol used when displaying amounts.
pub const CURRENCY_SYMBOL: &str = "¥";

/// The text shown in place of an amount when amounts are hidden.
pub const HIDDEN_AMOUNT: &str = "****";

/// Deserialize an amount that may be encoded either as a JSON number or as a
/// numeric string.
///
/// Postgres `numeric` columns are returned as strings by some REST layers, so
/// both forms need to be accepted. `null` is read as zero.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
        Null,
    }

    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(number) => Ok(number),
        RawAmount::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|error| de::Error::custom(format!("invalid amount \"{text}\": {error}"))),
        RawAmount::Null => Ok(0.0),
    }
}

/// Deserialize a value where `null` should be treated as the type's default.
pub fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Format `amount` as a currency string with two decimal places and
/// thousands separators, e.g. "¥1,234.50" or "-¥12.00".
pub fn format_currency(amount: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency(CURRENCY_SYMBOL)
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency(&format!("-{CURRENCY_SYMBOL}"))
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatter = if amount < 0.0 {
        negative_fmt
    } else {
        positive_fmt
    };

    let formatted_string = match formatter {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        Some(_) if amount == 0.0 => format!("{CURRENCY_SYMBOL}0.00"),
        Some(formatter) => formatter.fmt_string(amount.abs()),
        None if amount < 0.0 => format!("-{CURRENCY_SYMBOL}{:.2}", amount.abs()),
        None => format!("{CURRENCY_SYMBOL}{amount:.2}"),
    };

    pad_decimals(formatted_string)
}

/// Format `amount`, or the placeholder [HIDDEN_AMOUNT] if amounts are hidden.
pub fn format_maybe_hidden(amount: f64, visible: bool) -> String {
    if visible {
        format_currency(amount)
    } else {
        HIDDEN_AMOUNT.to_owned()
    }
}

// numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3" and "12.00"
// as "12", so we add them back ourselves.
fn pad_decimals(formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        None => format!("{formatted_string}.00"),
        Some(dot) if formatted_string.len() - dot == 2 => format!("{formatted_string}0"),
        Some(_) => formatted_string,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::{deserialize_amount, format_currency, format_maybe_hidden, null_to_default};

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "deserialize_amount")]
        amount: f64,
        #[serde(default, deserialize_with = "null_to_default")]
        note: String,
    }

    #[test]
    fn reads_amount_from_number() {
        let row: Row = serde_json::from_str(r#"{"amount": 85.2, "note": "dinner"}"#).unwrap();

        assert_eq!(row.amount, 85.2);
        assert_eq!(row.note, "dinner");
    }

    #[test]
    fn reads_amount_from_numeric_string() {
        let row: Row = serde_json::from_str(r#"{"amount": "4200.00", "note": null}"#).unwrap();

        assert_eq!(row.amount, 4200.0);
        assert_eq!(row.note, "");
    }

    #[test]
    fn rejects_non_numeric_string() {
        let result = serde_json::from_str::<Row>(r#"{"amount": "lots"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn formats_currency_with_two_decimals() {
        assert_eq!(format_currency(0.0), "¥0.00");
        assert_eq!(format_currency(12.3), "¥12.30");
        assert_eq!(format_currency(-12.0), "-¥12.00");
    }

    #[test]
    fn hides_amount_when_not_visible() {
        assert_eq!(format_maybe_hidden(5200.0, false), "****");
    }
}
