use super::*;

fn sizes(batches: &[MixBatch]) -> Vec<(usize, bool)> {
    batches
        .iter()
        .map(|b| (b.inputs.len(), b.carries_partial))
        .collect()
}

#[test]
fn no_inputs_no_batches() {
    assert!(plan_batches(0, DEFAULT_MAX_INPUTS_PER_MIX).is_empty());
}

#[test]
fn inputs_within_limit_use_one_batch() {
    let batches = plan_batches(28, 28);
    assert_eq!(sizes(&batches), vec![(28, false)]);
    assert_eq!(batches[0].inputs, (0..28).collect::<Vec<_>>());
}

#[test]
fn long_tracks_chain_partial_mixes() {
    let batches = plan_batches(60, 28);
    assert_eq!(sizes(&batches), vec![(28, false), (27, true), (5, true)]);
    assert_eq!(batches[1].inputs.first(), Some(&28));
    assert_eq!(batches[2].inputs, (55..60).collect::<Vec<_>>());
}

#[test]
fn every_input_is_planned_once() {
    for count in [1, 2, 3, 29, 57, 200] {
        for max in [2, 3, 28] {
            let batches = plan_batches(count, max);
            let flat: Vec<usize> = batches.iter().flat_map(|b| b.inputs.clone()).collect();
            assert_eq!(flat, (0..count).collect::<Vec<_>>());
            for b in &batches {
                assert!(b.inputs.len() + usize::from(b.carries_partial) <= max);
                assert!(!b.inputs.is_empty());
            }
        }
    }
}

#[test]
fn limit_below_two_is_raised() {
    let batches = plan_batches(3, 0);
    assert_eq!(sizes(&batches), vec![(2, false), (1, true)]);
}

#[test]
fn renderer_opts_defaults() {
    let opts = FfmpegRendererOpts::default();
    assert_eq!(opts.ffmpeg, PathBuf::from("ffmpeg"));
    assert_eq!(opts.ffprobe, PathBuf::from("ffprobe"));
    assert_eq!(opts.sample_rate, 44_100);
    assert_eq!(opts.channels, 2);
    assert_eq!(opts.max_inputs_per_mix, 28);

    let parsed: FfmpegRendererOpts = serde_json::from_str(r#"{"sample_rate":48000}"#).unwrap();
    assert_eq!(parsed.sample_rate, 48_000);
    assert_eq!(parsed.max_inputs_per_mix, 28);
}

#[test]
fn missing_ffmpeg_fails_construction() {
    let opts = FfmpegRendererOpts {
        ffmpeg: PathBuf::from("tapecut-no-such-ffmpeg"),
        ..FfmpegRendererOpts::default()
    };
    let err = FfmpegRenderer::new(opts).unwrap_err();
    assert!(matches!(
        err,
        crate::foundation::error::TapeError::CommandNotFound(_)
    ));
}
