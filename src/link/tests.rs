use super::*;
use proptest::prelude::*;

#[test]
fn encode_duration_uses_only_the_units_it_needs() {
    assert_eq!(encode_duration(0), "0s");
    assert_eq!(encode_duration(59), "59s");
    assert_eq!(encode_duration(60), "1m0s");
    assert_eq!(encode_duration(321), "5m21s");
    assert_eq!(encode_duration(3600), "1h0m0s");
    assert_eq!(encode_duration(3723), "1h2m3s");
}

#[test]
fn decode_duration_defaults_missing_units_to_zero() {
    assert_eq!(decode_duration("5h").unwrap(), 18000);
    assert_eq!(decode_duration("5m").unwrap(), 300);
    assert_eq!(decode_duration("5s").unwrap(), 5);
    assert_eq!(decode_duration("1h20s").unwrap(), 3620);
    assert_eq!(decode_duration("05m07s").unwrap(), 307);
}

#[test]
fn decode_duration_rejects_malformed_tokens() {
    for token in ["", "5", "1m5", "m", "5x", "1m2m", "1m 2s", "-5s", "99999999999999999999s"] {
        assert!(
            matches!(decode_duration(token), Err(Error::MalformedDuration(_))),
            "accepted {token:?}"
        );
    }
}

#[test]
fn encode_link_plain_and_escaped() {
    assert_eq!(
        encode_link("Boards of Canada", "Roygbiv", None, None),
        "Boards of Canada:Roygbiv"
    );
    assert_eq!(encode_link("A:B", "C", Some(80), None), "A\\:B:C::1m20s");
    assert_eq!(
        encode_link("Boards of Canada", "Roygbiv", Some(75), Some(140)),
        "Boards of Canada:Roygbiv::1m15s-2m20s"
    );
}

#[test]
fn encode_link_without_start_ranges_from_zero() {
    assert_eq!(encode_link("a", "b", None, Some(30)), "a:b::0s-30s");
}

#[test]
fn decode_link_escaped_artist_with_start() {
    let r = decode_link("A\\:B:C::1m20s").unwrap();
    assert_eq!(r, TrackReference::new("A:B", "C").with_range(Some(80), None));
}

#[test]
fn decode_link_full_range() {
    let r = decode_link("Boards of Canada:Roygbiv::1m15s-2m20s").unwrap();
    assert_eq!(r.artist, "Boards of Canada");
    assert_eq!(r.title, "Roygbiv");
    assert_eq!(r.start, Some(75));
    assert_eq!(r.end, Some(140));
}

#[test]
fn decode_link_allows_end_before_start() {
    let r = decode_link("a:b::2m-1m").unwrap();
    assert_eq!((r.start, r.end), (Some(120), Some(60)));
}

#[test]
fn decode_link_needs_two_fields() {
    for link in ["", "just an artist", "escaped\\:colon"] {
        assert!(
            matches!(decode_link(link), Err(Error::MalformedLink(_))),
            "accepted {link:?}"
        );
    }
}

#[test]
fn decode_link_rejects_unexpected_trailing_fields() {
    for link in ["a:b:c", "a:b:x:1m", "a:b::1m:extra", "a:b\\"] {
        assert!(
            matches!(decode_link(link), Err(Error::MalformedLink(_))),
            "accepted {link:?}"
        );
    }
}

#[test]
fn decode_link_surfaces_bad_durations() {
    assert!(matches!(
        decode_link("a:b::75"),
        Err(Error::MalformedDuration(_))
    ));
    assert!(matches!(
        decode_link("a:b::1m-2m-3m"),
        Err(Error::MalformedDuration(_))
    ));
    assert!(matches!(decode_link("a:b::"), Err(Error::MalformedDuration(_))));
}

#[test]
fn titles_with_digits_and_escape_sequences_survive() {
    let cases = [
        ("Artist", "Track 12"),
        ("AC\\DC", "T.N.T."),
        ("a\\:b", "::"),
        ("", ""),
        ("x-y", "1m20s"),
        ("trailing\\", ":leading"),
    ];
    for (artist, title) in cases {
        let link = encode_link(artist, title, Some(5), Some(3725));
        let r = decode_link(&link).unwrap();
        assert_eq!((r.artist.as_str(), r.title.as_str()), (artist, title), "{link}");
        assert_eq!((r.start, r.end), (Some(5), Some(3725)));
    }
}

proptest! {
    #[test]
    fn duration_round_trips(s in any::<u64>()) {
        prop_assert_eq!(decode_duration(&encode_duration(s)).unwrap(), s);
    }

    #[test]
    fn link_round_trips(
        artist in "[a-zA-Z0-9 :\\\\-]{0,16}",
        title in "\\PC{0,24}",
        range in proptest::option::of((0u64..100_000, 1u64..100_000)),
        start_only in proptest::option::of(0u64..100_000),
    ) {
        let (start, end) = match range {
            Some((s, len)) => (Some(s), Some(s + len)),
            None => (start_only, None),
        };
        let link = encode_link(&artist, &title, start, end);
        let r = decode_link(&link).unwrap();
        prop_assert_eq!(r, TrackReference::new(artist, title).with_range(start, end));
    }
}
