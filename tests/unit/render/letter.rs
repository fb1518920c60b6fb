use super::*;

fn request(message: &str, sign_off: &str, sender: &str) -> LetterRequest {
    LetterRequest {
        background: LetterBackground::Color("#f4e9d8".into()),
        message: message.into(),
        track_name: "Harvest Moon".into(),
        artist_name: "Neil Young".into(),
        album_art_url: None,
        receiver_name: "Sam".into(),
        sign_off: sign_off.into(),
        sender_name: sender.into(),
        format: Format::Tiktok,
    }
}

#[test]
fn background_parse_tells_colors_from_urls() {
    assert_eq!(
        LetterBackground::parse(" #fff "),
        LetterBackground::Color("#fff".into())
    );
    assert_eq!(
        LetterBackground::parse("https://cdn.example/paper.jpg"),
        LetterBackground::ImageUrl("https://cdn.example/paper.jpg".into())
    );
}

#[test]
fn sign_off_block_height() {
    assert_eq!(sign_off_height(20.0, 0.85, false, false), 0.0);
    let full = sign_off_height(20.0, 0.85, true, true);
    let expected = line_height(20.0) * 2.0 + line_height(17.0);
    assert!((full - expected).abs() < 1e-4);
    assert!(sign_off_height(20.0, 0.85, true, false) < full);
}

#[test]
fn long_body_shrinks_below_its_tier_and_fits() {
    let mut fonts = FontBook::metrics_only();
    let layout = LetterLayout::default();
    let words = "every song on the radio sounds like you lately and I am not even mad ";
    let message: String = words.repeat(30).chars().take(1500).collect();
    let body = fit_body(
        &mut fonts,
        &request(&message, "With love,", "Jo"),
        &layout,
        true,
    );
    assert_eq!(body.start, layout.tiers.start_size(1500));
    assert!(body.size < body.start);
    assert!(!body.overflowed);
    assert!(body.bottom(layout.sender_scale) <= body.limit + 1e-3);
    assert!(body.limit < layout.footer_top);
}

#[test]
fn sign_off_consumes_budget_and_forces_shrink() {
    let mut fonts = FontBook::metrics_only();
    let layout = LetterLayout {
        footer_top: 500.0,
        ..LetterLayout::default()
    };
    let bare = fit_body(&mut fonts, &request("hello", "", ""), &layout, true);
    assert_eq!(bare.size, 44.0);

    let signed = fit_body(&mut fonts, &request("hello", "Love,", "Jo"), &layout, true);
    assert!(signed.size < 44.0);
    assert!(signed.bottom(layout.sender_scale) <= signed.limit + 1e-3);
}

#[test]
fn bold_spans_survive_fitting() {
    let mut fonts = FontBook::metrics_only();
    let layout = LetterLayout::default();
    let body = fit_body(&mut fonts, &request("**hello** world", "", ""), &layout, false);
    assert_eq!(body.top, layout.body_top_bare);
    assert_eq!(
        body.lines,
        vec![vec![
            crate::text::bold::Segment::bold("hello"),
            crate::text::bold::Segment::normal(" world"),
        ]]
    );
}

#[test]
fn impossible_budget_truncates_with_ellipsis() {
    let mut fonts = FontBook::metrics_only();
    let layout = LetterLayout {
        footer_top: 420.0,
        ..LetterLayout::default()
    };
    let message = "word ".repeat(2000);
    let body = fit_body(&mut fonts, &request(&message, "Love,", "Jo"), &layout, true);
    assert!(body.overflowed);
    assert_eq!(body.size, layout.floor);
    let last = body.lines.last().unwrap();
    assert!(last.last().unwrap().text.ends_with('…'));
    assert!(body.bottom(layout.sender_scale) <= body.limit + 1e-3);
}

#[test]
fn song_lines_read_sent_with_track_by_artist() {
    let mut fonts = FontBook::metrics_only();
    let layout = LetterLayout::default();
    let lines = song_lines(&mut fonts, &request("", "", ""), &layout, true);
    assert_eq!(lines, vec!["Sent with", "Harvest Moon", "by Neil Young"]);
}

/// DejaVu regular and bold, when installed.
fn system_fonts() -> Option<FontBook> {
    use crate::text::measure::FontRole;
    let dir = std::path::Path::new("/usr/share/fonts/truetype/dejavu");
    let regular = std::fs::read(dir.join("DejaVuSans.ttf")).ok()?;
    let bold = std::fs::read(dir.join("DejaVuSans-Bold.ttf")).ok()?;
    let mut book = FontBook::metrics_only();
    book.register(FontRole::Regular, regular).ok()?;
    book.register(FontRole::Bold, bold).ok()?;
    Some(book)
}

#[tokio::test]
async fn real_faces_keep_one_space_around_bold_spans() {
    use crate::text::measure::TextMeasure;
    let Some(mut fonts) = system_fonts() else {
        return;
    };
    let message = "I **really** miss you and **every** little thing about the way you laugh \
                   at your own jokes before you **finish** telling them";
    let out = render_letter(
        &request(message, "With love,", "Jo"),
        &mut fonts,
        &crate::assets::fetch::InMemoryFetcher::new(),
        &EngineConfig::default(),
    )
    .await
    .unwrap();
    let report = out.report;
    assert!(report.text_bottom <= report.text_limit + 1e-3);
    assert!(report.lines.iter().flatten().any(|s| s.bold));

    let layout = LetterLayout::default();
    let base = TextStyle::regular(report.message_size);
    let space = fonts.measure("x x", base) - 2.0 * fonts.measure("x", base);
    assert!(space > 0.0);

    for line in &report.lines {
        let text: String = line.iter().map(|s| s.text.as_str()).collect();
        assert!(!text.contains("  "), "{text:?}");
        assert!(fonts.measure(&text, base) <= layout.text_width() as f32 + 0.5, "{text:?}");

        let starts = fonts.segment_starts(line, base, layout.margin, Align::Left);
        for i in 1..line.len() {
            let prev = &line[i - 1];
            let prev_style = base.for_segment(prev.bold);
            let advance = f64::from(fonts.measure(&prev.text, prev_style));
            assert!((starts[i] - starts[i - 1] - advance).abs() < 1e-3);

            // Word boundary between weights: one space, on one side only.
            let trailing = prev.text.ends_with(' ');
            let leading = line[i].text.starts_with(' ');
            assert!(trailing ^ leading, "{:?} | {:?}", prev.text, line[i].text);
            if trailing {
                let ink = f64::from(fonts.measure(prev.text.trim_end(), prev_style));
                let gap = starts[i] - starts[i - 1] - ink;
                let space = f64::from(fonts.measure("x x", prev_style) - 2.0 * fonts.measure("x", prev_style));
                assert!((gap - space).abs() < 0.5, "gap={gap} space={space}");
            }
        }
    }
}

#[tokio::test]
async fn real_faces_fit_long_letter_above_footer() {
    let Some(mut fonts) = system_fonts() else {
        return;
    };
    let words = "you are the **reason** I still play this song on repeat every single night ";
    let message: String = words.repeat(25).chars().take(1500).collect();
    let out = render_letter(
        &request(&message, "With love,", "Jo"),
        &mut fonts,
        &crate::assets::fetch::InMemoryFetcher::new(),
        &EngineConfig::default(),
    )
    .await
    .unwrap();
    assert!(out.report.message_size < out.report.initial_size);
    assert!(out.report.text_bottom <= out.report.text_limit + 1e-3);
    assert!(out.report.text_limit < LetterLayout::default().footer_top);
}
