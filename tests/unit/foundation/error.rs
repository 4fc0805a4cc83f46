use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TapeError::construction("x")
            .to_string()
            .contains("construction error:")
    );
    assert!(TapeError::probe("x").to_string().contains("probe error:"));
    assert!(TapeError::fetch("x").to_string().contains("fetch error:"));
    assert!(
        TapeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert_eq!(TapeError::EmptyTimeline.to_string(), "empty timeline");
    assert!(
        TapeError::TooLong("x".to_string())
            .to_string()
            .starts_with("timeline too long:")
    );
}

#[test]
fn command_failed_carries_command_and_stderr() {
    let err = TapeError::command_failed("ffmpeg -i a.wav b.mp3", "no such file");
    let msg = err.to_string();
    assert!(msg.contains("ffmpeg -i a.wav b.mp3"));
    assert!(msg.contains("no such file"));
}

#[test]
fn destination_exists_names_the_path() {
    let err = TapeError::DestinationExists(PathBuf::from("/tmp/out.wav"));
    assert!(err.to_string().contains("/tmp/out.wav"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TapeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
