use serde::{Deserialize, Serialize};

use crate::{
    address::{District, DISTRICT_COUNT},
    shipping::ShippingError,
};

use District::*;

/// Approximate road distances (km) between Đà Nẵng districts, and within each district.
const DA_NANG_DISTANCES: &[(District, District, f64)] = &[
    (HaiChau, HaiChau, 3.0),
    (ThanhKhe, ThanhKhe, 3.0),
    (SonTra, SonTra, 4.0),
    (NguHanhSon, NguHanhSon, 4.0),
    (LienChieu, LienChieu, 5.0),
    (CamLe, CamLe, 4.0),
    (HoaVang, HoaVang, 8.0),
    (HaiChau, ThanhKhe, 3.5),
    (HaiChau, SonTra, 5.0),
    (HaiChau, NguHanhSon, 7.0),
    (HaiChau, LienChieu, 11.0),
    (HaiChau, CamLe, 6.0),
    (HaiChau, HoaVang, 15.0),
    (ThanhKhe, SonTra, 7.0),
    (ThanhKhe, NguHanhSon, 9.0),
    (ThanhKhe, LienChieu, 8.0),
    (ThanhKhe, CamLe, 6.0),
    (ThanhKhe, HoaVang, 14.0),
    (SonTra, NguHanhSon, 6.0),
    (SonTra, LienChieu, 14.0),
    (SonTra, CamLe, 10.0),
    (SonTra, HoaVang, 19.0),
    (NguHanhSon, LienChieu, 16.0),
    (NguHanhSon, CamLe, 8.0),
    (NguHanhSon, HoaVang, 15.0),
    (LienChieu, CamLe, 10.0),
    (LienChieu, HoaVang, 12.0),
    (CamLe, HoaVang, 9.0),
];

/// A complete `District × District → km` matrix.
///
/// Lookups are always `from → to`. The table does not have to be symmetric, and it is never mirrored on lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceTable {
    km: [[f64; DISTRICT_COUNT]; DISTRICT_COUNT],
}

impl DistanceTable {
    /// Builds a table from directed entries. Every ordered pair of districts (including each district with itself)
    /// must be present exactly once, with a finite, non-negative distance.
    pub fn from_rows<I>(rows: I) -> Result<Self, ShippingError>
    where I: IntoIterator<Item = (District, District, f64)> {
        let mut km = [[None; DISTRICT_COUNT]; DISTRICT_COUNT];
        for (from, to, distance) in rows {
            if !distance.is_finite() || distance < 0.0 {
                return Err(ShippingError::InvalidDistance { from, to, distance });
            }
            let cell = &mut km[from.index()][to.index()];
            if cell.is_some() {
                return Err(ShippingError::DuplicateDistance { from, to });
            }
            *cell = Some(distance);
        }
        let mut table = [[0.0; DISTRICT_COUNT]; DISTRICT_COUNT];
        for from in District::ALL {
            for to in District::ALL {
                table[from.index()][to.index()] =
                    km[from.index()][to.index()].ok_or(ShippingError::MissingDistance { from, to })?;
            }
        }
        Ok(Self { km: table })
    }

    /// Builds a table from undirected pairs, entering each pair in both directions.
    pub fn from_symmetric_pairs<I>(pairs: I) -> Result<Self, ShippingError>
    where I: IntoIterator<Item = (District, District, f64)> {
        let rows = pairs
            .into_iter()
            .flat_map(|(a, b, d)| if a == b { vec![(a, b, d)] } else { vec![(a, b, d), (b, a, d)] })
            .collect::<Vec<_>>();
        Self::from_rows(rows)
    }

    pub fn da_nang() -> Result<Self, ShippingError> {
        Self::from_symmetric_pairs(DA_NANG_DISTANCES.iter().copied())
    }

    pub fn distance(&self, from: District, to: District) -> f64 {
        self.km[from.index()][to.index()]
    }
}
