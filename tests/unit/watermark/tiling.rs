use super::*;

#[test]
fn wide_text_still_gets_five_rows() {
    let plan = TilePlan::new(100, 100, 10_000.0);
    assert_eq!(plan.repetitions, 1.0);
    assert!((plan.row_step - plan.diagonal / 5.0).abs() < 1e-9);
    assert_eq!(plan.rows, 5);
}

#[test]
fn narrow_text_repeats_by_density() {
    let plan = TilePlan::new(3000, 4000, 100.0);
    assert_eq!(plan.diagonal, 5000.0);
    let reps = (5000.0f64 / 70.0).ceil();
    assert_eq!(plan.repetitions, reps);
    assert!((plan.row_step - 5000.0 / reps).abs() < 1e-9);
    assert!((plan.column_step - plan.row_step * 2.5).abs() < 1e-9);
    assert_eq!(plan.rows, reps as usize);
}

#[test]
fn zero_text_width_keeps_steps_finite() {
    for tw in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-300] {
        let plan = TilePlan::new(640, 480, tw);
        assert!(plan.row_step.is_finite() && plan.row_step > 0.0, "tw={tw}");
        assert!(plan.column_step.is_finite() && plan.column_step > 0.0);
        assert_eq!(plan.repetitions, 800.0);
    }
}

#[test]
fn zero_area_plans_nothing() {
    let plan = TilePlan::new(0, 0, 50.0);
    assert_eq!(plan.tile_count(), 0);
    assert_eq!(plan.centers().count(), 0);
}

#[test]
fn centers_span_the_diagonal() {
    let plan = TilePlan::new(200, 100, 40.0);
    let half = plan.diagonal / 2.0;
    let centers: Vec<_> = plan.centers().collect();
    assert_eq!(centers.len(), plan.tile_count());
    assert!((centers[0].x + half).abs() < 1e-9);
    assert!((centers[0].y + half).abs() < 1e-9);
    for p in &centers {
        assert!(p.x >= -half - 1e-9 && p.x < half);
        assert!(p.y >= -half - 1e-9 && p.y < half);
    }
}

#[test]
fn frame_rotates_about_surface_center() {
    let plan = TilePlan::new(200, 100, 40.0);
    let frame = plan.frame();
    let origin = frame * kurbo::Point::ORIGIN;
    assert!((origin.x - 100.0).abs() < 1e-9);
    assert!((origin.y - 50.0).abs() < 1e-9);

    // +x in the frame points up and to the right on the surface.
    let p = frame * kurbo::Point::new(10.0, 0.0);
    assert!(p.x > 100.0);
    assert!(p.y < 50.0);
}
