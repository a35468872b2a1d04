use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::normalizer::normalize;

//--------------------------------------       District       ---------------------------------------------------------
/// The administrative districts of Đà Nẵng. These are the only places shipping fees are computed between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum District {
    HaiChau,
    ThanhKhe,
    SonTra,
    NguHanhSon,
    LienChieu,
    CamLe,
    HoaVang,
}

pub const DISTRICT_COUNT: usize = 7;

impl District {
    pub const ALL: [District; DISTRICT_COUNT] = [
        District::HaiChau,
        District::ThanhKhe,
        District::SonTra,
        District::NguHanhSon,
        District::LienChieu,
        District::CamLe,
        District::HoaVang,
    ];

    /// Position of the district in [`District::ALL`]; used to index distance matrices.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The district's name as written locally.
    pub fn local_name(self) -> &'static str {
        match self {
            District::HaiChau => "Hải Châu",
            District::ThanhKhe => "Thanh Khê",
            District::SonTra => "Sơn Trà",
            District::NguHanhSon => "Ngũ Hành Sơn",
            District::LienChieu => "Liên Chiểu",
            District::CamLe => "Cẩm Lệ",
            District::HoaVang => "Hòa Vang",
        }
    }
}

impl Display for District {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.local_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown district: {0}")]
pub struct UnknownDistrict(pub String);

impl FromStr for District {
    type Err = UnknownDistrict;

    /// Accepts the local name in any accent/case form ("hai chau", "Hải Châu") or the identifier ("HaiChau").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s).chars().filter(|c| c.is_alphanumeric()).collect::<String>();
        District::ALL
            .into_iter()
            .find(|d| {
                let local = normalize(d.local_name()).chars().filter(|c| c.is_alphanumeric()).collect::<String>();
                local == wanted
            })
            .ok_or_else(|| UnknownDistrict(s.to_string()))
    }
}
