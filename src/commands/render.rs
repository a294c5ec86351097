//! Text and JSON rendering of store data for the terminal

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::domain::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// `1234` -> `12.34`
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn product_row(product: &Product) -> String {
    format!(
        "{:<10} {:<24} {:<20} {:>9} {:>4}% {:>9}  {}",
        product.barcode,
        product.name,
        product.category,
        format_price(product.price),
        product.discount,
        format_price(product.final_price()),
        if product.available { "available" } else { "unavailable" },
    )
}

pub fn products<W: Write>(out: &mut W, format: OutputFormat, products: &[Product]) -> Result<()> {
    if format == OutputFormat::Json {
        let priced: Vec<_> = products.iter().map(Product::priced).collect();
        return write_json(out, &priced);
    }
    if products.is_empty() {
        writeln!(out, "No products found")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<10} {:<24} {:<20} {:>9} {:>5} {:>9}  STATUS",
        "BARCODE", "NAME", "CATEGORY", "PRICE", "DISC", "FINAL"
    )?;
    for product in products {
        writeln!(out, "{}", product_row(product))?;
    }
    writeln!(out, "{} product(s)", products.len())?;
    Ok(())
}

pub fn product<W: Write>(out: &mut W, format: OutputFormat, product: &Product) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, &product.priced());
    }
    writeln!(out, "Barcode:     {}", product.barcode)?;
    writeln!(out, "Name:        {}", product.name)?;
    writeln!(out, "Category:    {}", product.category)?;
    writeln!(out, "Price:       {}", format_price(product.price))?;
    writeln!(out, "Discount:    {}%", product.discount)?;
    writeln!(out, "Final price: {}", format_price(product.final_price()))?;
    writeln!(out, "Available:   {}", if product.available { "yes" } else { "no" })?;
    Ok(())
}

pub fn names<W: Write>(out: &mut W, format: OutputFormat, names: &[String]) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, names);
    }
    for (rank, name) in names.iter().enumerate() {
        writeln!(out, "{:>3}. {name}", rank + 1)?;
    }
    Ok(())
}

pub fn message<W: Write>(out: &mut W, format: OutputFormat, text: &str) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, &serde_json::json!({ "message": text }));
    }
    writeln!(out, "{text}")?;
    Ok(())
}
