//! Purchase rounding and delivery scheduling of aggregated demand.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::PlannerConfig;
use crate::models::{
    DeliveryDay, IngredientDemand, IngredientMetaTable, OrderLine, OrderNote, WeekPlan,
};
use crate::models::plan::weekday_index;
use crate::planner::aggregation::{Aggregation, aggregate_week};
use crate::planner::constants::*;
use crate::state::Catalogue;

/// Whole packs needed for `gross_g` and the grams they contain.
pub fn pack_count(gross_g: f64, pack_size_g: f64) -> (u32, f64) {
    if gross_g <= 0.0 {
        return (0, 0.0);
    }
    let mut packs = (gross_g / pack_size_g).ceil() as u32;
    if packs as f64 * pack_size_g < gross_g {
        packs += 1;
    }
    (packs, packs as f64 * pack_size_g)
}

fn round_up_to(grams: f64, step: f64) -> f64 {
    let mut qty = (grams / step).ceil() * step;
    // The quotient can round down onto an exact multiple.
    if qty < grams {
        qty += step;
    }
    qty
}

/// Round a requirement up by magnitude: 10g below 100g, 500g below 1kg,
/// 1kg up to 10kg, 5kg above.
pub fn round_tiered_g(grams: f64) -> f64 {
    if grams <= 0.0 {
        return 0.0;
    }
    let step = ROUNDING_TIERS_G
        .iter()
        .find(|(limit, _)| grams < *limit)
        .map(|(_, step)| *step)
        .unwrap_or(ROUNDING_TOP_STEP_G);

    // The 1kg tier includes its upper bound.
    let step = if grams == ROUNDING_TIERS_G[2].0 {
        ROUNDING_TIERS_G[2].1
    } else {
        step
    };
    round_up_to(grams, step)
}

/// Order quantity in grams and, for pack-based ordering, the pack count.
pub fn round_order_qty(grams: f64, pack_size_g: Option<f64>) -> (Option<u32>, f64) {
    match pack_size_g.filter(|p| *p > 0.0) {
        Some(pack) => {
            let (packs, qty) = pack_count(grams, pack);
            (Some(packs), qty)
        }
        None => (None, round_tiered_g(grams)),
    }
}

/// Delivery day for a first use on weekday `index` (Monday = 0).
pub fn delivery_day(first_use_index: u32) -> DeliveryDay {
    match first_use_index {
        0..=2 => DeliveryDay::Monday,
        3..=4 => DeliveryDay::Wednesday,
        _ => DeliveryDay::Friday,
    }
}

/// Requirement multiplier and note for an ingredient's shelf life.
pub fn shelf_life_buffer(shelf_life_days: u32) -> (f64, Option<OrderNote>) {
    if shelf_life_days < SHORT_SHELF_LIFE_DAYS {
        (SHORT_SHELF_LIFE_BUFFER, Some(OrderNote::FreezeOnArrival))
    } else {
        (1.0, None)
    }
}

/// Turn one ingredient's demand into a rounded, scheduled order line.
pub fn schedule(demand: &IngredientDemand) -> OrderLine {
    let (buffer, note) = shelf_life_buffer(demand.shelf_life_days);
    let required_g = demand.gross_g * buffer;
    let (packs, order_qty_g) = round_order_qty(required_g, demand.pack_size_g);

    OrderLine {
        ingredient_id: demand.ingredient_id.clone(),
        name: demand.name.clone(),
        supplier: demand.supplier.clone(),
        net_g: demand.net_g,
        gross_g: demand.gross_g,
        required_g,
        pack_size_g: demand.pack_size_g,
        packs,
        order_qty_g,
        first_use: demand.first_use,
        delivery_day: delivery_day(weekday_index(demand.first_use)),
        note,
        allergens: demand.allergens.clone(),
    }
}

/// The week's order, grouped by supplier key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyOrder {
    /// Lines per supplier, sorted by ingredient name.
    pub by_supplier: BTreeMap<String, Vec<OrderLine>>,
    pub warnings: Vec<String>,
}

impl WeeklyOrder {
    pub fn lines(&self) -> impl Iterator<Item = &OrderLine> + '_ {
        self.by_supplier.values().flatten()
    }

    pub fn line(&self, ingredient_id: &str) -> Option<&OrderLine> {
        self.lines().find(|l| l.ingredient_id == ingredient_id)
    }

    pub fn len(&self) -> usize {
        self.by_supplier.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Round and schedule every aggregated demand and group it by supplier.
pub fn build_order(aggregation: Aggregation) -> WeeklyOrder {
    let mut by_supplier: BTreeMap<String, Vec<OrderLine>> = BTreeMap::new();

    for demand in &aggregation.demands {
        let supplier = if demand.supplier.trim().is_empty() {
            UNKNOWN_SUPPLIER.to_string()
        } else {
            demand.supplier.clone()
        };
        by_supplier
            .entry(supplier)
            .or_default()
            .push(schedule(demand));
    }

    for lines in by_supplier.values_mut() {
        lines.sort_by(|a, b| a.name.cmp(&b.name));
    }

    WeeklyOrder {
        by_supplier,
        warnings: aggregation.warnings,
    }
}

/// Full pipeline: aggregate the plan, then round, schedule and group.
pub fn generate_order(
    plan: &WeekPlan,
    catalogue: &Catalogue,
    meta: &IngredientMetaTable,
    config: &PlannerConfig,
) -> WeeklyOrder {
    let order = build_order(aggregate_week(plan, catalogue, meta, &config.weekly_hits));
    debug!(
        lines = order.len(),
        suppliers = order.by_supplier.len(),
        "weekly order built"
    );
    order
}
