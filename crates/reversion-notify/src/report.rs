//! Report formatting for the end-of-run notification.

use std::collections::BTreeMap;

use reversion_core::types::{FillActivity, Side};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Format a dollar amount as `$1,234.56`.
///
/// Grouping and decimal separators are fixed; host locale settings play
/// no part in the output.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();

    let units = abs.trunc().to_i128().unwrap_or(0);
    let cents = ((abs - abs.trunc()) * Decimal::from(100))
        .round()
        .to_i128()
        .unwrap_or(0);

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents
    )
}

/// Activity records carry no asset-class tag, so the digest groups by the
/// crypto pair naming convention.
fn is_crypto_symbol(symbol: &str) -> bool {
    symbol.contains("USD")
}

fn push_group(lines: &mut Vec<String>, label: &str, group: &BTreeMap<String, Decimal>) {
    let total: Decimal = group.values().sum();
    lines.push(format!("  _*{}: {}*_", label, format_usd(total)));

    let mut entries: Vec<(&String, &Decimal)> = group.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));
    for (symbol, amount) in entries {
        lines.push(format!("    {} | Amount: {}", symbol, format_usd(*amount)));
    }
}

/// Summarize fills into crypto/stock sales and purchases with totals.
pub fn fills_digest(fills: &[FillActivity]) -> String {
    if fills.is_empty() {
        return "No orders were filled over this period.".to_string();
    }

    let mut total_sales = Decimal::ZERO;
    let mut total_purchases = Decimal::ZERO;
    let mut crypto_sales: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut stock_sales: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut crypto_purchases: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut stock_purchases: BTreeMap<String, Decimal> = BTreeMap::new();

    for fill in fills {
        let amount = fill.amount();
        let crypto = is_crypto_symbol(&fill.symbol);

        let group = match (fill.side, crypto) {
            (Side::Sell, true) => {
                total_sales += amount;
                &mut crypto_sales
            }
            (Side::Sell, false) => {
                total_sales += amount;
                &mut stock_sales
            }
            (Side::Buy, true) => {
                total_purchases += amount;
                &mut crypto_purchases
            }
            (Side::Buy, false) => {
                total_purchases += amount;
                &mut stock_purchases
            }
        };
        *group.entry(fill.symbol.clone()).or_insert(Decimal::ZERO) += amount;
    }

    let mut lines = Vec::new();

    if !crypto_sales.is_empty() || !stock_sales.is_empty() {
        lines.push(format!("*`Total Sales: {}`*", format_usd(total_sales)));
        if !crypto_sales.is_empty() {
            push_group(&mut lines, "Crypto", &crypto_sales);
        }
        if !stock_sales.is_empty() {
            push_group(&mut lines, "Stocks", &stock_sales);
        }
        lines.push(String::new());
    }

    if !crypto_purchases.is_empty() || !stock_purchases.is_empty() {
        lines.push(format!(
            "*`Total Purchases: {}`*",
            format_usd(total_purchases)
        ));
        if !crypto_purchases.is_empty() {
            push_group(&mut lines, "Crypto", &crypto_purchases);
        }
        if !stock_purchases.is_empty() {
            push_group(&mut lines, "Stocks", &stock_purchases);
        }
    }

    lines.join("\n").trim_end().to_string()
}

/// Assemble the full notification message around the fills digest.
pub fn build_notification(local_hour: u32, digest: &str) -> String {
    let greeting = if local_hour < 12 {
        "💰☕️ *Good morning* ☕️💰"
    } else {
        "💰🌅 *Good afternoon* 🌅💰"
    };

    format!(
        "{}\n\nThe trading bot has made the following trades over the past 24hrs:\n\n{}\n\nHappy trading!\nThe reversion bot 🤖",
        greeting, digest
    )
}
