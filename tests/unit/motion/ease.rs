use super::*;

#[test]
fn all_curves_pin_the_endpoints() {
    for ease in [Ease::Linear, Ease::InOutQuad, Ease::InOutCubic] {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
        assert_eq!(ease.apply(0.5), 0.5, "{ease:?} is symmetric");
    }
}

#[test]
fn input_is_clamped_to_unit_interval() {
    for ease in [Ease::Linear, Ease::InOutQuad, Ease::InOutCubic] {
        assert_eq!(ease.apply(-3.0), 0.0);
        assert_eq!(ease.apply(7.5), 1.0);
    }
}

#[test]
fn curves_are_monotonic() {
    for ease in [Ease::Linear, Ease::InOutQuad, Ease::InOutCubic] {
        let mut prev = 0.0;
        for step in 1..=100 {
            let v = ease.apply(f64::from(step) / 100.0);
            assert!(v >= prev, "{ease:?} dipped at step {step}");
            prev = v;
        }
    }
}

#[test]
fn in_out_shapes_start_slow() {
    assert!(Ease::InOutQuad.apply(0.1) < 0.1);
    assert!(Ease::InOutCubic.apply(0.1) < Ease::InOutQuad.apply(0.1));
    assert!(Ease::InOutQuad.apply(0.9) > 0.9);
}
