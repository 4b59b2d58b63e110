// ps-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Length as UomLength, MassDensity as UomMassDensity,
    Power as UomPower, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Density = UomMassDensity;
pub type Length = UomLength;
pub type Power = UomPower;
pub type VolumeRate = UomVolumeRate;

/// Catalog flow unit: cubic metres per hour.
#[inline]
pub fn m3ph(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_hour;
    VolumeRate::new::<cubic_meter_per_hour>(v)
}

/// Catalog head unit: metres of liquid column.
#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn to_kw(p: Power) -> f64 {
    use uom::si::power::kilowatt;
    p.get::<kilowatt>()
}

/// Shaft power needed to deliver `flow` against `head` at `efficiency_pct`.
///
/// `P = rho * g * Q * H / eta`, returned in kilowatts. Returns `None` for a
/// non-positive efficiency.
pub fn hydraulic_power_kw(
    flow_m3ph: f64,
    head_m: f64,
    density_kg_m3: f64,
    efficiency_pct: f64,
) -> Option<f64> {
    if efficiency_pct.is_nan() || efficiency_pct <= 0.0 {
        return None;
    }
    let hydraulic: Power =
        kg_per_m3(density_kg_m3) * constants::g0() * m3ph(flow_m3ph) * m(head_m);
    Some(to_kw(hydraulic) / (efficiency_pct / 100.0))
}

pub mod constants {
    use super::*;

    pub const G0_MPS2: f64 = 9.806_65;

    /// Density of water at 20 °C.
    pub const WATER_DENSITY_KG_M3: f64 = 998.2;

    #[inline]
    pub fn g0() -> Accel {
        use uom::si::acceleration::meter_per_second_squared;
        Accel::new::<meter_per_second_squared>(G0_MPS2)
    }
}
