/// Monetary amount in the smallest currency unit.
pub type Money = i64;

/// Round to the nearest unit, ties to even (banker's rounding). Quoted
/// prices must re-verify exactly, so every rounding step in the engine
/// goes through here.
pub fn round_half_even(value: f64) -> Money {
    let floor = value.floor();
    let frac = value - floor;
    if (frac - 0.5).abs() < 1e-9 {
        let lower = floor as i64;
        if lower % 2 == 0 {
            lower
        } else {
            lower + 1
        }
    } else {
        value.round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_ties_to_even() {
        assert_eq!(round_half_even(2.5), 2);
        assert_eq!(round_half_even(3.5), 4);
        assert_eq!(round_half_even(2.4), 2);
        assert_eq!(round_half_even(2.6), 3);
        assert_eq!(round_half_even(36400.0), 36400);
    }
}
