use super::*;

#[test]
fn plain_text_is_one_normal_segment() {
    assert_eq!(parse_bold("just words"), vec![Segment::normal("just words")]);
}

#[test]
fn bold_span_is_split_out() {
    assert_eq!(
        parse_bold("**hello** world"),
        vec![Segment::bold("hello"), Segment::normal(" world")]
    );
}

#[test]
fn multiple_spans_alternate() {
    assert_eq!(
        parse_bold("a **b** c **d**"),
        vec![
            Segment::normal("a "),
            Segment::bold("b"),
            Segment::normal(" c "),
            Segment::bold("d"),
        ]
    );
}

#[test]
fn unmatched_trailing_delimiter_is_literal() {
    assert_eq!(
        parse_bold("**ok** and **dangling"),
        vec![
            Segment::bold("ok"),
            Segment::normal(" and **dangling"),
        ]
    );
    assert_eq!(parse_bold("tail**"), vec![Segment::normal("tail**")]);
}

#[test]
fn empty_spans_are_dropped_and_neighbors_merge() {
    assert_eq!(parse_bold("a****b"), vec![Segment::normal("ab")]);
    assert!(parse_bold("").is_empty());
    assert!(parse_bold("****").is_empty());
}

#[test]
fn round_trip_removes_only_matched_delimiters() {
    let cases = [
        ("**x** y **z**", "x y z"),
        ("no bold", "no bold"),
        ("**open only", "**open only"),
        ("***triple***", "*triple*"),
        ("a **b** **c", "a b **c"),
        ("ünï**cödé**", "ünïcödé"),
    ];
    for (input, expected) in cases {
        let joined: String = parse_bold(input).iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, expected, "input {input:?}");
    }
}
