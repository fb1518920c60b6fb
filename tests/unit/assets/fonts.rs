use super::*;
use crate::render::surface::Surface;

const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

const SYSTEM_BOLD_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

fn system_font() -> Option<Vec<u8>> {
    std::fs::read(SYSTEM_FONT).ok()
}

/// Regular and bold system faces, when both are installed.
fn system_book() -> Option<FontBook> {
    let regular = system_font()?;
    let bold = std::fs::read(SYSTEM_BOLD_FONT).ok()?;
    let mut book = FontBook::metrics_only();
    book.register(FontRole::Regular, regular).ok()?;
    book.register(FontRole::Bold, bold).ok()?;
    Some(book)
}

#[test]
fn metrics_only_book_matches_approx_metrics() {
    let mut book = FontBook::metrics_only();
    let style = TextStyle::regular(20.0);
    assert_eq!(
        book.measure("hello world", style),
        ApproxMetrics.measure("hello world", style)
    );
    assert_eq!(book.measure("", style), 0.0);
    assert_eq!(book.readiness(), FontReadiness::MetricsOnly);
}

#[test]
fn align_anchors() {
    assert_eq!(Align::Left.start_x(100.0, 40.0), 100.0);
    assert_eq!(Align::Center.start_x(100.0, 40.0), 80.0);
    assert_eq!(Align::Right.start_x(100.0, 40.0), 60.0);
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let mut book = FontBook::metrics_only();
    assert!(book.register(FontRole::Regular, b"not a font".to_vec()).is_err());
    assert_eq!(book.readiness(), FontReadiness::MetricsOnly);
}

#[tokio::test]
async fn missing_font_files_leave_book_usable() {
    let cfg = FontConfig {
        regular: Some("/no/such/Regular.ttf".into()),
        bold: None,
        display: None,
    };
    let mut book = FontBook::load(&cfg).await;
    assert_eq!(book.readiness(), FontReadiness::MetricsOnly);
    assert_eq!(book.ensure_ready(&cfg).await, FontReadiness::MetricsOnly);
    assert!(book.measure("abc", TextStyle::bold(10.0)) > 0.0);
}

#[test]
fn drawing_without_faces_leaves_pixels_alone() {
    let mut book = FontBook::metrics_only();
    let mut surface = Surface::new(64, 32).unwrap();
    surface.clear(Rgba8::rgb(255, 255, 255));
    let before = surface.data().to_vec();
    let w = surface
        .draw(|p| {
            Ok(book.draw_line(
                p,
                "hi",
                TextStyle::regular(16.0),
                Point::new(4.0, 20.0),
                Align::Left,
                Rgba8::rgb(0, 0, 0),
            ))
        })
        .unwrap();
    assert!(w > 0.0);
    assert_eq!(surface.data(), before.as_slice());
}

#[test]
fn real_face_measures_and_draws_when_available() {
    let Some(bytes) = system_font() else {
        return;
    };
    let mut book = FontBook::metrics_only();
    book.register(FontRole::Regular, bytes).unwrap();
    assert_eq!(
        book.readiness(),
        FontReadiness::Partial {
            missing: vec![FontRole::Bold, FontRole::Display]
        }
    );

    let style = TextStyle::regular(24.0);
    let short = book.measure("ab", style);
    let long = book.measure("abab", style);
    assert!(short > 0.0 && long > short);
    // Bold falls back to the regular face.
    assert_eq!(book.measure("ab", TextStyle::bold(24.0)), short);

    let mut surface = Surface::new(120, 40).unwrap();
    surface.clear(Rgba8::rgb(255, 255, 255));
    surface
        .draw(|p| {
            book.draw_line(
                p,
                "Hey",
                style,
                Point::new(8.0, 30.0),
                Align::Left,
                Rgba8::rgb(0, 0, 0),
            );
            Ok(())
        })
        .unwrap();
    assert!(surface.data().chunks_exact(4).any(|px| px[0] < 128));
}

#[test]
fn real_face_counts_trailing_space() {
    let Some(mut book) = system_book() else {
        return;
    };
    let style = TextStyle::regular(40.0);
    let bare = book.measure("I", style);
    let spaced = book.measure("I ", style);
    let space = book.measure("I I", style) - 2.0 * bare;
    assert!(spaced > bare, "I={bare} 'I '={spaced}");
    assert!((spaced - bare - space).abs() < 0.5);
}

#[test]
fn bold_segments_start_after_previous_advance() {
    let Some(mut book) = system_book() else {
        return;
    };
    let base = TextStyle::regular(40.0);
    let lines = crate::text::wrap::wrap_bold(&mut book, "I **really** miss you", 2000.0, base);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line.len(), 3);
    assert_eq!(line[0].text, "I ");
    assert!(line[1].bold);

    let starts = book.segment_starts(line, base, 100.0, Align::Left);
    let mut expected = 100.0;
    for (seg, &x) in line.iter().zip(&starts) {
        assert!((x - expected).abs() < 1e-3, "{:?} at {x}, expected {expected}", seg.text);
        expected += f64::from(book.measure(&seg.text, base.for_segment(seg.bold)));
    }
    // The bold run sits one space past the ink of "I".
    let gap = starts[1] - 100.0 - f64::from(book.measure("I", base));
    assert!(gap > 5.0, "gap={gap}");

    // A mixed line is never narrower than the same words all in regular weight.
    let mixed = crate::text::wrap::styled_width(&mut book, line, base);
    let plain = book.measure("I really miss you", base);
    assert!(mixed >= plain - 0.5, "mixed={mixed} plain={plain}");
}

#[test]
fn centered_segments_share_one_anchor() {
    let Some(mut book) = system_book() else {
        return;
    };
    let base = TextStyle::regular(30.0);
    let line = vec![Segment::normal("with ".to_owned()), Segment::bold("love".to_owned())];
    let width = f64::from(crate::text::wrap::styled_width(&mut book, &line, base));
    let starts = book.segment_starts(&line, base, 540.0, Align::Center);
    assert!((starts[0] - (540.0 - width / 2.0)).abs() < 1e-3);
}
