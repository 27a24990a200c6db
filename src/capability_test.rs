#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn standard_display_is_scale_one() {
    assert_eq!(DeviceCapabilities::from_pixel_ratio(1.0, false, true).scale_factor, 1);
}

#[test]
fn retina_display_is_scale_two() {
    let caps = DeviceCapabilities::from_pixel_ratio(2.0, true, true);
    assert_eq!(caps.scale_factor, 2);
    assert_eq!(caps.scale(), 2.0);
    assert!(caps.touch);
}

#[test]
fn fractional_ratios_round() {
    assert_eq!(DeviceCapabilities::from_pixel_ratio(1.25, false, true).scale_factor, 1);
    assert_eq!(DeviceCapabilities::from_pixel_ratio(2.75, false, true).scale_factor, 3);
}

#[test]
fn bogus_ratios_fall_back_to_one() {
    assert_eq!(DeviceCapabilities::from_pixel_ratio(0.5, false, true).scale_factor, 1);
    assert_eq!(DeviceCapabilities::from_pixel_ratio(f64::NAN, false, true).scale_factor, 1);
}

#[test]
fn override_replaces_scale_but_not_below_one() {
    let caps = DeviceCapabilities::default();
    assert_eq!(caps.with_scale_override(Some(3)).scale_factor, 3);
    assert_eq!(caps.with_scale_override(Some(0)).scale_factor, 1);
    assert_eq!(caps.with_scale_override(None), caps);
}
