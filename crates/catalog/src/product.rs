use serde::{Deserialize, Serialize};

use shelflife_core::{DomainError, DomainResult, Entity, ProductId};

/// Draft product, not yet assigned an identity by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub size: String,
    /// Retail price before markdown, in major currency units.
    pub base_price: f64,
    pub weight_grams: f64,
}

/// Catalog entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub size: String,
    pub base_price: f64,
    pub weight_grams: f64,
}

impl Product {
    /// Validate a draft and bind it to its store-assigned identity.
    pub fn new(id: ProductId, draft: NewProduct) -> DomainResult<Self> {
        if draft.sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if !draft.base_price.is_finite() || draft.base_price < 0.0 {
            return Err(DomainError::validation("base_price must be >= 0"));
        }
        if !draft.weight_grams.is_finite() || draft.weight_grams <= 0.0 {
            return Err(DomainError::validation("weight_grams must be positive"));
        }

        Ok(Self {
            id,
            sku: draft.sku,
            name: draft.name,
            category: draft.category,
            size: draft.size,
            base_price: draft.base_price,
            weight_grams: draft.weight_grams,
        })
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewProduct {
        NewProduct {
            sku: "MILK-1L".to_string(),
            name: "Whole Milk".to_string(),
            category: "dairy".to_string(),
            size: "1L".to_string(),
            base_price: 4.99,
            weight_grams: 1030.0,
        }
    }

    #[test]
    fn valid_draft_becomes_product() {
        let product = Product::new(ProductId::new(1), draft()).unwrap();
        assert_eq!(product.sku, "MILK-1L");
        assert_eq!(product.base_price, 4.99);
    }

    #[test]
    fn empty_sku_is_rejected() {
        let mut d = draft();
        d.sku = "  ".to_string();
        let err = Product::new(ProductId::new(1), d).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut d = draft();
        d.base_price = -0.01;
        let err = Product::new(ProductId::new(1), d).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn zero_weight_is_rejected() {
        let mut d = draft();
        d.weight_grams = 0.0;
        let err = Product::new(ProductId::new(1), d).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
