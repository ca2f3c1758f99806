//! Diagnostics sink behaviour.

use std::fmt;

use glim::{Diagnostics, Error, Level, MESSAGE_MAX_LENGTH, Sink, recognize_into};

#[test]
fn custom_sink_receives_success_note() {
    #[derive(Default)]
    struct Recorder(Vec<(Level, String)>);

    impl Sink for Recorder {
        fn append(&mut self, level: Level, message: fmt::Arguments<'_>) -> Result<(), Error> {
            self.0.push((level, message.to_string()));
            Ok(())
        }
    }

    let mut recorder = Recorder::default();
    recognize_into("x => x", &mut recorder).unwrap();
    assert_eq!(recorder.0, vec![(Level::Note, "syntax is ok".to_string())]);
}

#[test]
fn sink_works_through_dyn_reference() {
    let mut diagnostics = Diagnostics::new().unwrap();
    let sink: &mut dyn Sink = &mut diagnostics;
    recognize_into("nil", sink).unwrap();
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn mixed_levels_render_in_order() {
    let mut diagnostics = Diagnostics::new().unwrap();
    diagnostics.error(format_args!("bad {}", 1)).unwrap();
    diagnostics.note(format_args!("fine")).unwrap();
    diagnostics.warning(format_args!("hmm")).unwrap();
    assert_eq!(
        diagnostics.to_string(),
        "ERROR: bad 1\nNOTE: fine\nWARNING: hmm\n"
    );
}

#[test]
fn duplicates_are_kept() {
    let mut diagnostics = Diagnostics::default();
    for _ in 0..3 {
        diagnostics.append(Level::Warning, format_args!("same")).unwrap();
    }
    assert_eq!(diagnostics.len(), 3);
    assert!((&diagnostics).into_iter().all(|m| m.text == "same"));
}

#[test]
fn oversized_message_is_truncated_not_rejected() {
    let mut diagnostics = Diagnostics::new().unwrap();
    let filler = "ab".repeat(600);
    diagnostics
        .append(Level::Note, format_args!("{filler}"))
        .unwrap();
    let text = &diagnostics.messages()[0].text;
    assert_eq!(text.len(), MESSAGE_MAX_LENGTH);
    assert!(filler.starts_with(text.as_str()));
}

#[test]
fn render_to_writer() {
    let mut diagnostics = Diagnostics::new().unwrap();
    recognize_into("[1, 2, 3]", &mut diagnostics).unwrap();
    let mut out = Vec::new();
    diagnostics.render(&mut out).unwrap();
    assert_eq!(out, b"NOTE: syntax is ok\n");
}
