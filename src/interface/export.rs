use std::io;
use std::path::Path;

use crate::error::Result;
use crate::models::OrderLine;
use crate::planner::WeeklyOrder;

const HEADER: [&str; 10] = [
    "supplier",
    "product",
    "net_g",
    "gross_g",
    "packs",
    "order_g",
    "surplus_g",
    "delivery_day",
    "note",
    "allergens",
];

fn record(supplier: &str, line: &OrderLine) -> [String; 10] {
    [
        supplier.to_string(),
        line.name.clone(),
        format!("{:.0}", line.net_g),
        format!("{:.0}", line.gross_g),
        line.packs.map(|p| p.to_string()).unwrap_or_default(),
        format!("{:.0}", line.order_qty_g),
        format!("{:.0}", line.surplus_g()),
        line.delivery_day.label().to_string(),
        line.note.map(|n| n.text().to_string()).unwrap_or_default(),
        line.allergens.join("; "),
    ]
}

/// Write the order as CSV, one row per line, grouped by supplier.
pub fn write_order<W: io::Write>(writer: W, order: &WeeklyOrder) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for (supplier, lines) in &order.by_supplier {
        for line in lines {
            wtr.write_record(record(supplier, line))?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write the order to a CSV file.
pub fn write_order_csv(path: &Path, order: &WeeklyOrder) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_order(file, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeliveryDay, OrderNote};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn line(
        name: &str,
        packs: Option<u32>,
        note: Option<OrderNote>,
        allergens: &[&str],
    ) -> OrderLine {
        OrderLine {
            ingredient_id: name.to_lowercase(),
            name: name.to_string(),
            supplier: "produce".to_string(),
            net_g: 900.0,
            gross_g: 1000.0,
            required_g: 1050.0,
            pack_size_g: packs.map(|_| 500.0),
            packs,
            order_qty_g: 1500.0,
            first_use: NaiveDate::from_ymd_opt(2026, 10, 22).unwrap(),
            delivery_day: DeliveryDay::Wednesday,
            note,
            allergens: allergens.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_csv_rows() {
        let mut by_supplier = BTreeMap::new();
        by_supplier.insert(
            "produce".to_string(),
            vec![
                line("Basil", None, Some(OrderNote::FreezeOnArrival), &[]),
                line("Celeriac", Some(3), None, &["celery", "sulphites"]),
            ],
        );
        let order = WeeklyOrder {
            by_supplier,
            warnings: Vec::new(),
        };

        let mut out = Vec::new();
        write_order(&mut out, &order).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(
            rows[0],
            "supplier,product,net_g,gross_g,packs,order_g,surplus_g,delivery_day,note,allergens"
        );
        assert_eq!(rows[1], "produce,Basil,900,1000,,1500,450,Wed,freeze on arrival,");
        assert_eq!(rows[2], "produce,Celeriac,900,1000,3,1500,450,Wed,,celery; sulphites");

        let file = tempfile::NamedTempFile::new().unwrap();
        write_order_csv(file.path(), &order).unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), text);
    }
}
