use chart_stream::core::{AffineTransform, Point, Rect, Viewport};
use chart_stream::render::{
    Color, LinePrimitive, Painter, RecordingPainter, RenderFrame, TextPrimitive, TransformGuard,
};

#[test]
fn nested_guards_restore_in_reverse_order() {
    let mut painter = RecordingPainter::new(Viewport::new(100, 100));
    {
        let mut outer = TransformGuard::concatenated(&mut painter, AffineTransform::scale(2.0, 2.0));
        {
            let mut inner = TransformGuard::translated(&mut *outer, 1.0, 1.0);
            inner
                .stroke_line(Point::ORIGIN, Point::new(1.0, 0.0), 1.0, Color::BLACK)
                .expect("line");
        }
        assert_eq!(outer.transform(), AffineTransform::scale(2.0, 2.0));
    }
    assert!(painter.transform().is_identity());

    let line = painter.frame().lines[0];
    assert_eq!((line.x1, line.y1, line.x2, line.y2), (2.0, 2.0, 4.0, 2.0));
}

#[test]
fn invalid_geometry_is_rejected_before_recording() {
    let mut painter = RecordingPainter::new(Viewport::new(100, 100));
    let err = painter.fill_rects(&[Rect::new(f64::NAN, 0.0, 1.0, 1.0)], Color::RED);
    assert!(err.is_err());
    assert!(painter.frame().rects.is_empty());

    assert!(painter.draw_text("", Point::ORIGIN, 12.0, Color::BLACK).is_err());
}

#[test]
fn take_frame_resets_recording() {
    let mut painter = RecordingPainter::new(Viewport::new(100, 100));
    painter
        .stroke_rect(Rect::new(1.0, 1.0, 10.0, 10.0), 1.0, Color::BLACK)
        .expect("border");

    let frame = painter.take_frame();
    assert_eq!(frame.rects.len(), 1);
    assert!(painter.frame().is_empty());
    assert_eq!(painter.stats().rects_stroked, 0);
}

#[test]
fn frame_validation_and_json_export() {
    let mut frame = RenderFrame::new(Viewport::new(320, 200));
    frame
        .lines
        .push(LinePrimitive::new(0.0, 0.0, 10.0, 10.0, 1.0, Color::GRAY));
    frame
        .texts
        .push(TextPrimitive::new("12.50", 4.0, 8.0, 12.0, Color::BLACK));
    frame.validate().expect("valid frame");

    let json = frame.to_json_pretty().expect("json");
    assert!(json.contains("\"12.50\""));
    let parsed: RenderFrame = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed, frame);

    frame
        .lines
        .push(LinePrimitive::new(0.0, 0.0, 1.0, 1.0, 0.0, Color::GRAY));
    assert!(frame.validate().is_err());
}
