pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Round down to the nearest even integer.
pub(crate) fn floor_even(v: u32) -> u32 {
    v & !1
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
