use super::*;

#[test]
fn command_line_quotes_whitespace() {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-i", "my file.wav", "-y"]);
    assert_eq!(command_line(&cmd), "ffmpeg -i \"my file.wav\" -y");
}

#[test]
fn missing_program_is_command_not_found() {
    let tool = Tool::new("tapecut-definitely-not-installed");
    let err = tool.ensure_available().unwrap_err();
    assert!(matches!(err, TapeError::CommandNotFound(_)));
    assert!(err.to_string().contains("tapecut-definitely-not-installed"));

    let err = tool.run(["-version"]).unwrap_err();
    assert!(matches!(err, TapeError::CommandNotFound(_)));
}

#[cfg(unix)]
#[test]
fn run_captures_stdout() {
    let out = Tool::new("sh").run(["-c", "printf hello"]).unwrap();
    assert_eq!(out, b"hello");
}

#[cfg(unix)]
#[test]
fn nonzero_exit_is_command_failed() {
    let err = Tool::new("sh")
        .run(["-c", "echo broken >&2; exit 3"])
        .unwrap_err();
    match err {
        TapeError::CommandFailed { command, stderr } => {
            assert!(command.starts_with("sh -c"));
            assert!(stderr.contains("broken"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
