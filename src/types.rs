use levelbook::OrderRecord;
use serde::Deserialize;

/// One line of the replay log.
///
/// ```text
/// {"op":"add","id":"1","side":"buy","price":0.1,"amount":100}
/// {"op":"remove","id":"1"}
/// {"op":"front","amount":200}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Event {
    Add(OrderRecord),
    Remove {
        id: String,
    },
    Front {
        #[serde(default)]
        amount: f64,
    },
}
