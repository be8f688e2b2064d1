// src/affe/mod.rs

pub mod convert;
pub mod export;
pub mod model;

use chrono::{DateTime, Utc};

pub use convert::{convert, convert_all};
pub use export::{flat, marketplace};
pub use model::{Affe, Traits};

/// Every Affe built from one final table.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub affen: Vec<Affe>,
    pub taken_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(affen: Vec<Affe>) -> Self {
        Self { affen, taken_at: Utc::now() }
    }

    pub fn len(&self) -> usize { self.affen.len() }
    pub fn is_empty(&self) -> bool { self.affen.is_empty() }
}
