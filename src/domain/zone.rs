use serde::{Deserialize, Serialize};

/// Delivery zone served by a group of drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    Sur,
    SanTelmo,
}

impl Zone {
    pub fn name(&self) -> &'static str {
        match self {
            Zone::Sur => "Zona Sur",
            Zone::SanTelmo => "San Telmo",
        }
    }
}

/// Price tier a customer buys at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PriceList {
    /// Standard price.
    #[default]
    A,
    /// 10% below standard.
    B,
    /// 15% below standard.
    C,
}

impl PriceList {
    pub fn label(&self) -> &'static str {
        match self {
            PriceList::A => "Lista A (Estándar)",
            PriceList::B => "Lista B (-10%)",
            PriceList::C => "Lista C (-15%)",
        }
    }
}
