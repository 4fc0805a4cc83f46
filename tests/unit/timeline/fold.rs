use super::*;

fn fragments(lengths: &[f64]) -> (tempfile::NamedTempFile, Vec<Fragment>) {
    let file = tempfile::NamedTempFile::new().unwrap();
    let fragments = lengths
        .iter()
        .map(|&length| {
            Fragment::builder()
                .filename(file.path())
                .start(0.0)
                .length(length)
                .build()
                .unwrap()
        })
        .collect();
    (file, fragments)
}

#[test]
fn accumulator_push_and_concat_preserve_order() {
    let (_file, fs) = fragments(&[1.0, 2.0, 3.0]);
    let tail = Timeline::from_iter(fs[1..].iter().cloned());

    let mut acc = Accumulator::new();
    acc.push(fs[0].clone()).concat(&tail);
    assert_eq!(acc.duration(), 6.0);

    let t = acc.finish();
    assert_eq!(t.fragments(), fs.as_slice());
}

#[test]
fn carve_over_whole_timeline_consumes_everything() {
    let (_file, fs) = fragments(&[2.0, 3.0, 4.5]);
    let total: f64 = fs.iter().map(Fragment::duration).sum();

    let out = carve(&fs, 0.0, total);
    assert_eq!(out.cursor, 0.0);
    assert_eq!(out.remaining, 0.0);
    assert_eq!(out.timeline.fragments(), fs.as_slice());
}

#[test]
fn carve_stops_once_region_is_collected() {
    let (_file, fs) = fragments(&[2.0, 3.0, 4.0]);
    let out = carve(&fs, 1.0, 2.0);

    assert_eq!(out.timeline.len(), 2);
    assert_eq!(out.timeline.fragments()[0].start(), 1.0);
    assert_eq!(out.timeline.fragments()[0].length(), 1.0);
    assert_eq!(out.timeline.fragments()[1].start(), 0.0);
    assert_eq!(out.timeline.fragments()[1].length(), 1.0);
    assert_eq!(out.remaining, 0.0);
}

#[test]
fn carve_past_the_end_reports_leftover_cursor() {
    let (_file, fs) = fragments(&[2.0, 3.0]);
    let out = carve(&fs, 7.0, 1.0);
    assert!(out.timeline.is_empty());
    assert_eq!(out.cursor, 2.0);
    assert_eq!(out.remaining, 1.0);
}

#[test]
fn map_fragments_can_walk_backwards() {
    let (_file, fs) = fragments(&[1.0, 2.0, 3.0]);

    let forward = map_fragments(&fs, false, Fragment::clone);
    assert_eq!(forward.fragments(), fs.as_slice());

    let backward = map_fragments(&fs, true, Fragment::clone);
    let lengths: Vec<f64> = backward.fragments().iter().map(Fragment::length).collect();
    assert_eq!(lengths, vec![3.0, 2.0, 1.0]);
}
