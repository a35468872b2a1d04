use std::fmt::Write;

use anyhow::Result;
use checkout_engine::{address::DistrictMatch, shipping::ShippingQuote, CheckoutPlan, SubmissionReport};
use prettytable::{
    format::{LinePosition, LineSeparator, TableFormat},
    row,
    Table,
};

fn markdown_format() -> TableFormat {
    prettytable::format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
        .padding(1, 1)
        .build()
}

fn markdown_style(table: &mut Table) {
    table.set_format(markdown_format());
}

pub fn format_resolution(address: &str, found: Option<&DistrictMatch>) -> String {
    match found {
        Some(m) => format!(
            "{address}\n  -> {} (matched '{}' as a {:?} at word {})",
            m.district, m.matched_key, m.source, m.position
        ),
        None => format!("{address}\n  -> no district found"),
    }
}

pub fn format_quote(quote: &ShippingQuote) -> Result<String> {
    let mut f = String::new();
    writeln!(f, "{} -> {}: {:.1} km", quote.from, quote.to, quote.distance_km)?;
    writeln!(f, "  Base fee:     {}", quote.breakdown.base_fee)?;
    writeln!(f, "  Distance fee: {} ({} per km)", quote.breakdown.distance_fee, quote.breakdown.rate_per_km)?;
    writeln!(f, "  Total:        {}", quote.fee)?;
    Ok(f)
}

pub fn format_plan(plan: &CheckoutPlan) -> Result<String> {
    let mut f = String::new();
    writeln!(f, "===============================================================================")?;
    match &plan.buyer_district {
        Some(d) => writeln!(f, "Delivering to {d}. {} vendors", plan.allocations.len())?,
        None => writeln!(f, "{} vendors", plan.allocations.len())?,
    }
    if let Some(v) = &plan.voucher {
        writeln!(f, "Voucher {}: {}", v.code, v.total_discount)?;
    }
    writeln!(f, "===============================================================================")?;
    if !plan.vendor_shipping.is_empty() {
        let mut table = Table::new();
        table.set_titles(row!["Vendor", "From", "To", "Km", "Quoted fee"]);
        for leg in &plan.vendor_shipping {
            let from = if leg.origin_resolved { leg.quote.from.to_string() } else { format!("{} (fallback)", leg.quote.from) };
            table.add_row(row![leg.vendor_id, from, leg.quote.to, format!("{:.1}", leg.quote.distance_km), r->leg.quote.fee]);
        }
        markdown_style(&mut table);
        writeln!(f, "{table}")?;
    }
    let mut table = Table::new();
    table.set_titles(row!["Vendor", "Items", "Subtotal", "Shipping", "Discount", "Total"]);
    for a in &plan.allocations {
        let flag = if a.is_overdiscounted() { " (!)" } else { "" };
        table.add_row(row![
            a.vendor_id,
            a.items.len(),
            r->a.subtotal,
            r->a.allocated_shipping_fee,
            r->format!("{}{flag}", a.allocated_voucher_discount),
            r->a.vendor_total
        ]);
    }
    table.add_row(row![
        "Total",
        "",
        r->plan.grand_subtotal,
        r->plan.total_shipping_fee,
        r->plan.total_voucher_discount,
        r->plan.grand_total
    ]);
    markdown_style(&mut table);
    writeln!(f, "{table}")?;
    Ok(f)
}

pub fn format_report(report: &SubmissionReport) -> Result<String> {
    let mut f = String::new();
    let mut table = Table::new();
    table.set_titles(row!["Vendor", "Outcome", "Order", "Total"]);
    for o in &report.confirmed {
        let order = o.order_id().map(|id| id.to_string()).unwrap_or_default();
        table.add_row(row![o.vendor_id(), "confirmed", order, r->o.request().total]);
    }
    for o in &report.rolled_back {
        let order = o.order_id().map(|id| id.to_string()).unwrap_or_default();
        table.add_row(row![o.vendor_id(), "cancelled", order, r->o.request().total]);
    }
    for failed in &report.failed {
        table.add_row(row![failed.vendor_id, format!("failed: {}", failed.reason), "", ""]);
    }
    for vendor in &report.not_attempted {
        table.add_row(row![vendor, "not attempted", "", ""]);
    }
    markdown_style(&mut table);
    writeln!(f, "{table}")?;
    if let Some(c) = &report.compensation {
        for cancelled in &c.cancelled {
            writeln!(f, "Cancelled {} for {}", cancelled.order_id, cancelled.vendor_id)?;
        }
        for failure in &c.failures {
            writeln!(f, "Could NOT cancel {} for {}: {}", failure.order_id, failure.vendor_id, failure.reason)?;
        }
    }
    if let Some(e) = &report.cleanup_error {
        writeln!(f, "The cart could not be cleared: {e}")?;
    }
    writeln!(f, "{}", report.user_message())?;
    Ok(f)
}
