//! Currency conversion commands.

use anyhow::{Context as _, Result};
use suko_commerce::Currency;
use suko_store::CurrencyService;

use super::{CurrencyArgs, CurrencyCommand};
use crate::context::Context;

/// Run the currency command.
pub async fn run(args: CurrencyArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CurrencyCommand::Convert { amount, codes } => convert(amount, &codes, ctx),
        CurrencyCommand::List => list(ctx),
    }
}

fn convert(amount: f64, codes: &[String], ctx: &Context) -> Result<()> {
    let targets = parse_codes(codes)?;
    let service = CurrencyService::default();

    let rows: Vec<(Currency, f64, String)> = targets
        .into_iter()
        .map(|currency| {
            service.set_currency(currency);
            (currency, service.convert(amount, None), service.format(amount))
        })
        .collect();

    if ctx.output.is_json() {
        let value: serde_json::Map<String, serde_json::Value> = rows
            .iter()
            .map(|(currency, converted, _)| (currency.code().to_string(), (*converted).into()))
            .collect();
        ctx.output.json(&value);
        return Ok(());
    }

    ctx.output.header(&format!("\u{20ac}{:.2}", amount));
    for (currency, _, formatted) in &rows {
        ctx.output.kv(currency.code(), formatted);
    }
    Ok(())
}

fn list(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        let rows: Vec<serde_json::Value> = Currency::ALL
            .iter()
            .map(|c| serde_json::json!({"code": c.code(), "symbol": c.symbol(), "rate": c.rate()}))
            .collect();
        ctx.output.json(&rows);
        return Ok(());
    }

    let widths = [6, 6, 8];
    ctx.output.table_row(&["CODE", "SYMBOL", "RATE"], &widths);
    for currency in Currency::ALL {
        let rate = format!("{:.2}", currency.rate());
        ctx.output
            .table_row(&[currency.code(), currency.symbol(), &rate], &widths);
    }
    ctx.output.info("Rates are units per 1 EUR");
    Ok(())
}

/// Parse target codes; no codes means every supported currency.
fn parse_codes(codes: &[String]) -> Result<Vec<Currency>> {
    if codes.is_empty() {
        return Ok(Currency::ALL.to_vec());
    }
    codes
        .iter()
        .map(|code| {
            code.parse::<Currency>()
                .with_context(|| format!("Supported codes: {}", supported_codes()))
        })
        .collect()
}

fn supported_codes() -> String {
    Currency::ALL
        .iter()
        .map(|c| c.code())
        .collect::<Vec<_>>()
        .join(", ")
}
