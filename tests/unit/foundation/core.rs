use super::*;

#[test]
fn format_canvas_sizes_are_fixed() {
    assert_eq!(
        Format::Ig.canvas(),
        Canvas {
            width: 1080,
            height: 1350
        }
    );
    assert_eq!(
        Format::Tiktok.canvas(),
        Canvas {
            width: 1080,
            height: 1920
        }
    );
}

#[test]
fn format_deserializes_from_lowercase() {
    let f: Format = serde_json::from_str("\"tiktok\"").unwrap();
    assert_eq!(f, Format::Tiktok);
    assert_eq!(f.as_str(), "tiktok");
}

#[test]
fn hex_parsing_accepts_short_long_and_alpha_forms() {
    assert_eq!(Rgba8::from_hex("#fff").unwrap(), Rgba8::rgb(255, 255, 255));
    assert_eq!(Rgba8::from_hex("#1a2B3c").unwrap(), Rgba8::rgb(0x1a, 0x2b, 0x3c));
    assert_eq!(
        Rgba8::from_hex("10203040").unwrap(),
        Rgba8::rgba(0x10, 0x20, 0x30, 0x40)
    );
}

#[test]
fn hex_parsing_rejects_garbage() {
    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#gggggg").is_err());
    assert!(Rgba8::from_hex("").is_err());
    assert!(!Rgba8::is_hex("https://example.com/bg.jpg"));
    assert!(Rgba8::is_hex("#faf3e0"));
}

#[test]
fn premul_rounds_like_integer_math() {
    let p = Rgba8::rgba(100, 50, 200, 128).premul();
    assert_eq!(
        p.to_array(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}
