use chrono::{NaiveDate, NaiveDateTime};

/// One order-item line of the joined transaction table.
///
/// Several rows share an `order_id` when an order holds more than one item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub approved_at: Option<NaiveDateTime>,
    pub payment_value: f64,
    pub product_category: Option<String>,
    pub product_id: String,
    pub review_score: Option<u8>,
}

impl OrderRecord {
    pub fn new(order_id: &str, product_id: &str, payment_value: f64) -> Self {
        OrderRecord {
            order_id: order_id.to_string(),
            approved_at: None,
            payment_value,
            product_category: None,
            product_id: product_id.to_string(),
            review_score: None,
        }
    }

    pub fn approved_at(mut self, at: NaiveDateTime) -> Self {
        self.approved_at = Some(at);
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.product_category = Some(category.to_string());
        self
    }

    pub fn review_score(mut self, score: u8) -> Self {
        self.review_score = Some(score);
        self
    }

    /// Calendar day of approval, if the order was approved.
    pub fn approval_date(&self) -> Option<NaiveDate> {
        self.approved_at.map(|at| at.date())
    }
}
