use serde::{Deserialize, Serialize};

use shelflife_catalog::Product;
use shelflife_core::{BatchId, Entity, ImpactId};

/// Emission factor, kg CO2e avoided per kg of food rescued.
///
/// Single flat factor for now; category-specific factors are a future
/// calibration knob, which is why this is a named constant and not an inline
/// literal.
pub const CO2E_PER_KG: f64 = 1.9;

/// Assumed average item weight used by the summary's pounds figure.
pub const AVG_ITEM_WEIGHT_KG: f64 = 0.15;

/// Unit conversion.
pub const LBS_PER_KG: f64 = 2.20462;

/// Draft impact record, not yet assigned an identity by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewImpact {
    pub batch_id: BatchId,
    pub qty_picked_up: u32,
    pub co2e_saved_kg: f64,
    pub revenue_recovered: f64,
}

/// One appended fact per confirmed pickup. Never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub id: ImpactId,
    pub batch_id: BatchId,
    pub qty_picked_up: u32,
    pub co2e_saved_kg: f64,
    pub revenue_recovered: f64,
}

impl Impact {
    pub fn new(id: ImpactId, draft: NewImpact) -> Self {
        Self {
            id,
            batch_id: draft.batch_id,
            qty_picked_up: draft.qty_picked_up,
            co2e_saved_kg: draft.co2e_saved_kg,
            revenue_recovered: draft.revenue_recovered,
        }
    }
}

impl Entity for Impact {
    type Id = ImpactId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Figures computed for a single confirmed pickup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactFigures {
    pub weight_kg: f64,
    pub co2e_saved_kg: f64,
    pub revenue_recovered: f64,
}

/// Pure computation behind `confirm_pickup`'s impact append.
pub fn assess_pickup(product: &Product, discount_pct: u8, qty_reserved: u32) -> ImpactFigures {
    let weight_kg = product.weight_grams * f64::from(qty_reserved) / 1000.0;
    let co2e_saved_kg = weight_kg * CO2E_PER_KG;
    let revenue_recovered =
        f64::from(qty_reserved) * product.base_price * (1.0 - f64::from(discount_pct) / 100.0);

    ImpactFigures {
        weight_kg,
        co2e_saved_kg,
        revenue_recovered,
    }
}

/// Rolled-up totals across all impact records.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ImpactSummary {
    pub total_lbs_saved: f64,
    pub total_co2e_avoided_kg: f64,
    pub total_revenue_recovered: f64,
    pub total_items_rescued: u64,
}

impl ImpactSummary {
    /// Sum all records; an empty slice yields all zeros.
    ///
    /// The pounds figure deliberately uses the flat average-item-weight
    /// assumption rather than each record's actual weight.
    pub fn from_records(records: &[Impact]) -> Self {
        let total_items_rescued: u64 = records.iter().map(|r| u64::from(r.qty_picked_up)).sum();
        let total_co2e_avoided_kg: f64 = records.iter().map(|r| r.co2e_saved_kg).sum();
        let total_revenue_recovered: f64 = records.iter().map(|r| r.revenue_recovered).sum();

        Self {
            total_lbs_saved: total_items_rescued as f64 * AVG_ITEM_WEIGHT_KG * LBS_PER_KG,
            total_co2e_avoided_kg,
            total_revenue_recovered,
            total_items_rescued,
        }
    }
}
