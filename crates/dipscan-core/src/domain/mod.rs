mod record;
mod symbol;

pub use record::{PriceRecord, UnderperformerRecord};
pub use symbol::{Symbol, MARKET_SUFFIX};
