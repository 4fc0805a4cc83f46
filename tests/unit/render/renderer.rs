use super::*;

fn fragment(file: &tempfile::NamedTempFile, length: f64) -> Fragment {
    Fragment::builder()
        .filename(file.path())
        .start(0.0)
        .length(length)
        .build()
        .unwrap()
}

#[test]
fn render_options_defaults() {
    let opts = RenderOptions::default();
    assert!(!opts.overwrite);
    assert_eq!(opts.bitrate, "128k");

    let parsed: RenderOptions = serde_json::from_str(r#"{"overwrite":true}"#).unwrap();
    assert!(parsed.overwrite);
    assert_eq!(parsed.bitrate, "128k");

    let built = RenderOptions::new().overwrite(true).bitrate("320k");
    assert!(built.overwrite);
    assert_eq!(built.bitrate, "320k");
}

#[test]
fn empty_tracks_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.wav");
    let opts = RenderOptions::default();

    let err = prepare_destination(&[], &dest, &opts).unwrap_err();
    assert!(matches!(err, TapeError::EmptyTimeline));

    let empty: &[Fragment] = &[];
    let err = prepare_destination(&[empty, empty], &dest, &opts).unwrap_err();
    assert!(matches!(err, TapeError::EmptyTimeline));

    let file = tempfile::NamedTempFile::new().unwrap();
    let silent = [fragment(&file, 0.0)];
    let err = prepare_destination(&[&silent], &dest, &opts).unwrap_err();
    assert!(matches!(err, TapeError::EmptyTimeline));
}

#[test]
fn existing_destination_requires_overwrite() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let track = [fragment(&file, 1.0)];
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.wav");
    std::fs::write(&dest, b"old").unwrap();

    let err = prepare_destination(&[&track], &dest, &RenderOptions::default()).unwrap_err();
    match err {
        TapeError::DestinationExists(p) => assert_eq!(p, dest),
        other => panic!("unexpected error: {other}"),
    }
    assert!(dest.exists());

    prepare_destination(&[&track], &dest, &RenderOptions::new().overwrite(true)).unwrap();
    assert!(!dest.exists());
}

#[test]
fn missing_parent_directories_are_created() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let track = [fragment(&file, 1.0)];
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("a").join("b").join("out.mp3");

    prepare_destination(&[&track], &dest, &RenderOptions::default()).unwrap();
    assert!(dest.parent().unwrap().is_dir());
}

#[test]
fn recording_renderer_records_tracks() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let a = [fragment(&file, 1.0), fragment(&file, 2.0)];
    let b = [fragment(&file, 0.5)];
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("mix.wav");
    let renderer = RecordingRenderer::new();

    renderer
        .render(&[&a, &b], &dest, &RenderOptions::default())
        .unwrap();
    assert!(dest.is_file());

    let renders = renderer.renders();
    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].destination, dest);
    assert_eq!(renders[0].tracks, vec![a.to_vec(), b.to_vec()]);

    let err = renderer
        .render(&[&a], &dest, &RenderOptions::default())
        .unwrap_err();
    assert!(matches!(err, TapeError::DestinationExists(_)));
    assert_eq!(renderer.renders().len(), 1);
}

#[test]
fn recording_silence_is_owned_and_cleaned_up() {
    let renderer = RecordingRenderer::new();
    assert!(renderer.silence(0.0).unwrap().is_empty());

    let silence = renderer.silence(2.5).unwrap();
    assert_eq!(silence.duration(), 2.5);
    let path = silence.fragments()[0].filename().to_path_buf();
    assert!(path.exists());

    let kept = silence.slice(0.5, 1.0);
    drop(silence);
    assert!(path.exists());
    drop(kept);
    assert!(!path.exists());
}
