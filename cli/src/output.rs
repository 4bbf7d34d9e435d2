//! Plain-text rendering of products.

use stock_core::display::{format_date, format_price};
use stock_core::Product;

const HEADERS: [&str; 5] = ["ID", "NAME", "PRICE", "QTY", "UPDATED"];

/// Aligned table, one product per line. Empty input renders a notice.
pub fn product_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "no products\n".to_string();
    }

    let rows: Vec<[String; 5]> = products
        .iter()
        .map(|p| {
            [
                p.id.to_string(),
                p.name.clone(),
                format_price(p.price),
                p.quantity.to_string(),
                format_date(p.updated_at),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(str::to_string), &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Field-per-line view of a single product.
pub fn product_detail(product: &Product) -> String {
    let mut fields = vec![("id", product.id.to_string()), ("name", product.name.clone())];
    if let Some(description) = &product.description {
        fields.push(("description", description.clone()));
    }
    fields.extend([
        ("price", format_price(product.price)),
        ("quantity", product.quantity.to_string()),
        ("created", format_date(product.created_at)),
        ("updated", format_date(product.updated_at)),
    ]);

    fields
        .into_iter()
        .map(|(label, value)| format!("{:<13}{value}\n", format!("{label}:")))
        .collect()
}
