use super::mpd::parse_status;
use super::mpris::{choose_player, identity_from_metadata, select_player, text};
use super::*;
use std::collections::HashMap;
use zvariant::{ObjectPath, OwnedValue, Value};

fn owned(v: Value<'_>) -> OwnedValue {
    OwnedValue::try_from(v).unwrap()
}

#[test]
fn player_kind_parses_known_backends_only() {
    assert_eq!("mpris".parse::<PlayerKind>().unwrap(), PlayerKind::Mpris);
    assert_eq!(" MPD ".parse::<PlayerKind>().unwrap(), PlayerKind::Mpd);
    assert!(matches!(
        "vlc".parse::<PlayerKind>(),
        Err(Error::PlayerUnsupported(name)) if name == "vlc"
    ));
}

#[test]
fn identity_without_url_matches_any_uri() {
    let id = MediaIdentity {
        id: "a\nb".to_string(),
        url: None,
    };
    assert!(id.matches_uri("file:///x.mp3"));

    let id = MediaIdentity {
        id: "/t/1".to_string(),
        url: Some("file:///x.mp3".to_string()),
    };
    assert!(id.matches_uri("file:///x.mp3"));
    assert!(!id.matches_uri("file:///y.mp3"));
}

#[test]
fn select_player_skips_impostors_and_other_services() {
    let names = [
        "org.freedesktop.DBus",
        "org.mpris.MediaPlayer2.plasma-browser-integration",
        "org.mpris.MediaPlayer2.vlc",
        "org.mpris.MediaPlayer2.mpv",
        ":1.42",
    ];
    let exclude = vec!["plasma-browser-integration".to_string()];
    assert_eq!(
        select_player(names, "org.mpris.MediaPlayer2.", &exclude).as_deref(),
        Some("org.mpris.MediaPlayer2.mpv")
    );
    assert_eq!(
        select_player(["org.mpris.MediaPlayer2.plasma-browser-integration"], "org.mpris.MediaPlayer2.", &exclude),
        None
    );
}

#[test]
fn metadata_text_reads_strings_paths_and_lists() {
    assert_eq!(text(&owned(Value::from("Roygbiv"))).as_deref(), Some("Roygbiv"));
    assert_eq!(
        text(&owned(Value::from(vec!["Boards of Canada", "Other"]))).as_deref(),
        Some("Boards of Canada")
    );
    let path = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/7").unwrap();
    assert_eq!(
        text(&owned(Value::from(path))).as_deref(),
        Some("/org/mpris/MediaPlayer2/track/7")
    );
    assert_eq!(text(&owned(Value::from(42i64))), None);
}

#[test]
fn identity_prefers_track_id_and_falls_back_to_url() {
    let mut metadata = HashMap::new();
    metadata.insert("xesam:url".to_string(), owned(Value::from("file:///m/a.flac")));
    let id = identity_from_metadata(&metadata).unwrap();
    assert_eq!(id.id, "file:///m/a.flac");

    let path = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/1").unwrap();
    metadata.insert("mpris:trackid".to_string(), owned(Value::from(path)));
    let id = identity_from_metadata(&metadata).unwrap();
    assert_eq!(id.id, "/org/mpris/MediaPlayer2/track/1");
    assert_eq!(id.url.as_deref(), Some("file:///m/a.flac"));
}

#[test]
fn empty_metadata_means_nothing_is_loaded() {
    assert!(matches!(
        identity_from_metadata(&HashMap::new()),
        Err(Error::NoMedia)
    ));
}

#[test]
fn pinned_player_wins_over_a_newcomer() {
    let prefix = "org.mpris.MediaPlayer2.";
    let names = ["org.mpris.MediaPlayer2.amarok", "org.mpris.MediaPlayer2.vlc"];
    assert_eq!(
        choose_player(Some("org.mpris.MediaPlayer2.vlc"), names, prefix, &[]).unwrap(),
        "org.mpris.MediaPlayer2.vlc"
    );
    assert_eq!(
        choose_player(None, names, prefix, &[]).unwrap(),
        "org.mpris.MediaPlayer2.amarok"
    );
}

#[test]
fn pinned_player_that_quit_has_no_media() {
    let names = ["org.mpris.MediaPlayer2.amarok"];
    assert!(matches!(
        choose_player(Some("org.mpris.MediaPlayer2.vlc"), names, "org.mpris.MediaPlayer2.", &[]),
        Err(Error::NoMedia)
    ));
    assert!(matches!(
        choose_player(None, ["org.freedesktop.DBus"], "org.mpris.MediaPlayer2.", &[]),
        Err(Error::ControlUnavailable(_))
    ));
}

#[test]
fn mpc_status_record_parses_position() {
    let out = "Boards of Canada\nRoygbiv\n[playing] #3/12   1:05/2:31 (43%)\nvolume: 80%   repeat: off\n";
    let r = parse_status(out).unwrap();
    assert_eq!(r.artist, "Boards of Canada");
    assert_eq!(r.title, "Roygbiv");
    assert_eq!(r.position, 65);
    assert!(!r.paused);

    let long = "A\nB\n[paused]  #1/1   1:02:03/1:10:00 (88%)\n";
    let r = parse_status(long).unwrap();
    assert_eq!(r.position, 3723);
    assert!(r.paused);
}

#[test]
fn mpc_status_when_stopped_has_no_media() {
    for out in ["", "volume: 80%   repeat: off   random: off   single: off   consume: off\n"] {
        assert!(matches!(parse_status(out), Err(Error::NoMedia)), "{out:?}");
    }
}

#[test]
fn mpc_status_rejects_anything_off_format() {
    for out in [
        "A\nB\n",
        "A\nB\nplaying #3/12 1:05/2:31\n",
        "A\nB\n[playing] 3/12 1:05/2:31\n",
        "A\nB\n[playing] #3/12 1:5x/2:31\n",
        "A\nB\n[playing] #3/12\n",
    ] {
        assert!(
            matches!(parse_status(out), Err(Error::ControlUnavailable(_))),
            "accepted {out:?}"
        );
    }
}
