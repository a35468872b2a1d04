use log::*;
use mkt_common::{Money, MoneyError};
use serde::{Deserialize, Serialize};

use crate::{
    address::District,
    shipping::{DistanceTable, ShippingError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base_fee: Money,
    pub distance_fee: Money,
    pub rate_per_km: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingQuote {
    pub from: District,
    pub to: District,
    pub distance_km: f64,
    /// `base_fee + round(distance_km * rate_per_km)`
    pub fee: Money,
    pub breakdown: FeeBreakdown,
}

/// Quotes delivery fees from a [`DistanceTable`] and a linear tariff.
#[derive(Debug, Clone)]
pub struct ShippingFeeCalculator {
    table: DistanceTable,
    base_fee: Money,
    rate_per_km: Money,
}

impl ShippingFeeCalculator {
    pub fn new(table: DistanceTable, base_fee: Money, rate_per_km: Money) -> Result<Self, ShippingError> {
        if base_fee.is_negative() {
            return Err(ShippingError::InvalidRate(format!("base fee {base_fee} is negative")));
        }
        if rate_per_km.is_negative() {
            return Err(ShippingError::InvalidRate(format!("rate per km {rate_per_km} is negative")));
        }
        Ok(Self { table, base_fee, rate_per_km })
    }

    pub fn table(&self) -> &DistanceTable {
        &self.table
    }

    pub fn base_fee(&self) -> Money {
        self.base_fee
    }

    pub fn rate_per_km(&self) -> Money {
        self.rate_per_km
    }

    pub fn quote(&self, from: District, to: District) -> Result<ShippingQuote, ShippingError> {
        let distance_km = self.table.distance(from, to);
        let raw = (distance_km * self.rate_per_km.value() as f64).round();
        if !raw.is_finite() || raw >= i64::MAX as f64 {
            return Err(MoneyError::Overflow(format!("{distance_km} km at {} per km", self.rate_per_km)).into());
        }
        let distance_fee = Money::from(raw as i64);
        let fee = self.base_fee.checked_add(distance_fee)?;
        trace!("🚚️ {from} -> {to}: {distance_km} km, fee {fee}");
        Ok(ShippingQuote {
            from,
            to,
            distance_km,
            fee,
            breakdown: FeeBreakdown { base_fee: self.base_fee, distance_fee, rate_per_km: self.rate_per_km },
        })
    }

    /// Quotes between districts that came out of address resolution.
    ///
    /// An unresolved destination is an error. An unresolved origin is replaced by `fallback_origin`, and is an error
    /// when there is no fallback. A missing district never yields a zero fee.
    pub fn quote_resolved(
        &self,
        from: Option<District>,
        to: Option<District>,
        fallback_origin: Option<District>,
    ) -> Result<ShippingQuote, ShippingError> {
        let to = to.ok_or(ShippingError::UnresolvedDestination)?;
        let from = match (from, fallback_origin) {
            (Some(from), _) => from,
            (None, Some(fallback)) => {
                warn!("🚚️ Origin district is unknown. Using the fallback origin {fallback}");
                fallback
            },
            (None, None) => return Err(ShippingError::MissingFallbackOrigin),
        };
        self.quote(from, to)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use District::*;

    fn calculator() -> ShippingFeeCalculator {
        ShippingFeeCalculator::new(DistanceTable::da_nang().unwrap(), Money::from(15_000), Money::from(5_000)).unwrap()
    }

    #[test]
    fn fee_is_base_plus_distance() {
        let quote = calculator().quote(HaiChau, ThanhKhe).unwrap();
        assert_eq!(quote.distance_km, 3.5);
        assert_eq!(quote.breakdown.distance_fee, Money::from(17_500));
        assert_eq!(quote.fee, Money::from(32_500));
        let quote = calculator().quote(SonTra, SonTra).unwrap();
        assert_eq!(quote.fee, Money::from(35_000));
    }

    #[test]
    fn distance_fee_is_rounded() {
        let c = ShippingFeeCalculator::new(DistanceTable::da_nang().unwrap(), Money::from(0), Money::from(3)).unwrap();
        // 3.5 km * 3 = 10.5 -> 11
        assert_eq!(c.quote(HaiChau, ThanhKhe).unwrap().fee, Money::from(11));
    }

    #[test]
    fn unresolved_districts() {
        let c = calculator();
        assert_eq!(c.quote_resolved(Some(HaiChau), None, Some(CamLe)), Err(ShippingError::UnresolvedDestination));
        assert_eq!(c.quote_resolved(None, Some(HaiChau), None), Err(ShippingError::MissingFallbackOrigin));
        let quote = c.quote_resolved(None, Some(HaiChau), Some(CamLe)).unwrap();
        assert_eq!(quote.from, CamLe);
        assert_eq!(quote.fee, Money::from(45_000));
    }

    #[test]
    fn distance_fee_at_the_money_limit_is_an_overflow() {
        // 4 km * 2^61 is exactly 2^63, one past i64::MAX
        let rate = Money::from(1i64 << 61);
        let c = ShippingFeeCalculator::new(DistanceTable::da_nang().unwrap(), Money::from(0), rate).unwrap();
        assert_eq!(c.table().distance(SonTra, SonTra), 4.0);
        let err = c.quote(SonTra, SonTra).unwrap_err();
        assert!(matches!(err, ShippingError::Money(MoneyError::Overflow(_))), "{err:?}");
        // 3 km stays in range
        let quote = c.quote(HaiChau, HaiChau).unwrap();
        assert_eq!(quote.fee, Money::from(3 * (1i64 << 61)));
    }

    #[test]
    fn negative_rates_are_rejected() {
        let err = ShippingFeeCalculator::new(DistanceTable::da_nang().unwrap(), Money::from(-1), Money::from(5)).unwrap_err();
        assert!(matches!(err, ShippingError::InvalidRate(_)));
    }
}
