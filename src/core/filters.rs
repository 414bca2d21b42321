use crate::models::Product;

/// Minimum score a product needs to be returned by batch matching
pub const DEFAULT_MIN_SCORE: u8 = 30;

/// Only active listings take part in matching
#[inline]
pub fn is_eligible(product: &Product) -> bool {
    product.is_active()
}

#[inline]
pub fn meets_threshold(score: u8, min_score: u8) -> bool {
    score >= min_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductStatus;

    fn create_test_product(status: ProductStatus) -> Product {
        Product {
            id: "prod_1".to_string(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_only_active_is_eligible() {
        assert!(is_eligible(&create_test_product(ProductStatus::Active)));

        for status in [
            ProductStatus::Draft,
            ProductStatus::Pending,
            ProductStatus::Rejected,
            ProductStatus::Sold,
            ProductStatus::Other,
        ] {
            assert!(!is_eligible(&create_test_product(status)));
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(meets_threshold(30, DEFAULT_MIN_SCORE));
        assert!(!meets_threshold(29, DEFAULT_MIN_SCORE));
        assert!(meets_threshold(100, DEFAULT_MIN_SCORE));
    }
}
