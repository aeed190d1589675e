//! `leadgate price`: quote what an enrollment in a course would cost.

use leadgate_core::{PriceBreakdown, PricingCalculator};

use crate::cli::PriceArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(q: &PriceBreakdown) -> Vec<(&'static str, String)> {
    vec![
        ("Course Price", q.base_price.to_string()),
        ("Platform Fee", q.platform_fee.to_string()),
        ("Tax", q.tax_amount.to_string()),
        ("Total", q.total_amount.to_string()),
    ]
}

pub fn handle(args: &PriceArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let price = util::parse_decimal(&args.price, "price")?;
    if price.is_sign_negative() {
        return Err(CliError::Validation {
            field: "price".into(),
            reason: "must not be negative".into(),
        });
    }

    let settings = &ctx.config.guard;
    let fee = match args.fee.as_deref() {
        Some(raw) => util::parse_decimal(raw, "fee")?,
        None => settings.platform_fee,
    };
    let tax_rate = match args.tax_rate.as_deref() {
        Some(raw) => util::parse_decimal(raw, "tax-rate")?,
        None => settings.tax_rate,
    };
    leadgate_config::check_platform_fee(fee).map_err(|reason| CliError::Validation {
        field: "fee".into(),
        reason,
    })?;
    leadgate_config::check_tax_rate(tax_rate).map_err(|reason| CliError::Validation {
        field: "tax-rate".into(),
        reason,
    })?;

    let quote = PricingCalculator::new(fee, tax_rate).quote(price);
    tracing::debug!(%price, %fee, %tax_rate, total = %quote.total_amount, "price quoted");

    let rendered = output::render_single(ctx.output, &quote, detail, |q| {
        q.total_amount.to_string()
    })?;
    ctx.print(&rendered);
    Ok(())
}
