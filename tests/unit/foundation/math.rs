use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 200), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 128), 128);
}

#[test]
fn floor_even_drops_odd_bit() {
    assert_eq!(floor_even(7), 6);
    assert_eq!(floor_even(8), 8);
    assert_eq!(floor_even(1), 0);
}
