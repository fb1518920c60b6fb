use super::*;
use crate::text::measure::{ApproxMetrics, TextStyle};
use crate::text::wrap::wrap;

fn tiers() -> FontTiers {
    FontTiers::new(vec![(40, 40.0), (120, 32.0), (300, 26.0)], 20.0)
}

#[test]
fn tiers_pick_by_length() {
    let t = tiers();
    assert_eq!(t.start_size(11), 40.0);
    assert_eq!(t.start_size(40), 40.0);
    assert_eq!(t.start_size(41), 32.0);
    assert_eq!(t.start_size(299), 26.0);
    assert_eq!(t.start_size(5000), 20.0);
    assert_eq!(t.largest(), 40.0);
}

#[test]
fn tiers_sort_their_input() {
    let t = FontTiers::new(vec![(300, 26.0), (40, 40.0)], 20.0);
    assert_eq!(t.start_size(10), 40.0);
}

#[test]
fn fits_immediately_when_short() {
    let fitted = fit_text(
        FitParams {
            start: 40.0,
            floor: 14.0,
            step: 2.0,
            available: 200.0,
        },
        |size| ((), line_height(size)),
    );
    assert_eq!(fitted.size, 40.0);
    assert!(!fitted.overflowed);
}

#[test]
fn shrinks_until_it_fits() {
    let text = "word ".repeat(200);
    let mut m = ApproxMetrics;
    let available = 400.0;
    let fitted = fit_text(
        FitParams {
            start: 40.0,
            floor: 10.0,
            step: 1.0,
            available,
        },
        |size| {
            let lines = wrap(&mut m, &text, TextStyle::regular(size), 600.0);
            let h = lines.len() as f32 * line_height(size);
            (lines, h)
        },
    );
    assert!(fitted.size < 40.0);
    assert!(fitted.height <= available);
    assert!(!fitted.overflowed);
}

#[test]
fn terminates_at_floor_and_reports_overflow() {
    let mut calls = 0;
    let fitted = fit_text(
        FitParams {
            start: 30.0,
            floor: 12.0,
            step: 4.0,
            available: 10.0,
        },
        |size| {
            calls += 1;
            ((), line_height(size) * 100.0)
        },
    );
    assert_eq!(fitted.size, 12.0);
    assert!(fitted.overflowed);
    assert!(calls <= 6);
}

#[test]
fn degenerate_step_still_converges() {
    let fitted = fit_text(
        FitParams {
            start: 20.0,
            floor: 10.0,
            step: 0.0,
            available: 0.0,
        },
        |size| ((), size),
    );
    assert_eq!(fitted.size, 10.0);
}

#[test]
fn max_lines_counts_whole_lines() {
    assert_eq!(max_lines(line_height(20.0) * 3.5, 20.0), 3);
    assert_eq!(max_lines(0.0, 20.0), 1);
}
