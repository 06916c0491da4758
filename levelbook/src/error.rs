use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookError {
    #[error("order id is empty")]
    EmptyId,

    #[error("order {id}: invalid price {price}")]
    InvalidPrice { id: String, price: f64 },

    #[error("order {id}: invalid amount {amount}")]
    InvalidAmount { id: String, amount: f64 },

    #[error("order {id}: pricer produced invalid level price {price}")]
    InvalidBucket { id: String, price: f64 },

    #[error("duplicate order id: {0}")]
    DuplicateOrder(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BookError>;
