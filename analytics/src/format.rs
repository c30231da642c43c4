use shared_types::Currency;

/// `1234.5` → `1,234.50`
pub fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

/// Amount with the currency symbol, e.g. `$1,234.50` or `Br 1,234.50`
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let grouped = group_thousands(amount);
    let symbol = currency.symbol();
    match currency {
        Currency::Usd => match grouped.strip_prefix('-') {
            Some(positive) => format!("-{symbol}{positive}"),
            None => format!("{symbol}{grouped}"),
        },
        Currency::Birr => format!("{symbol} {grouped}"),
    }
}
