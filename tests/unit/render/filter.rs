use super::*;

const SETTINGS: ChainSettings = ChainSettings {
    sample_rate: 44_100,
};

fn fragment(file: &tempfile::NamedTempFile) -> Fragment {
    Fragment::builder()
        .filename(file.path())
        .start(1.5)
        .length(2.0)
        .build()
        .unwrap()
}

#[test]
fn tempo_stages_stay_in_range() {
    assert_eq!(tempo_stages(1.25), vec![1.25]);
    assert_eq!(tempo_stages(5.0), vec![2.0, 2.0, 1.25]);
    assert_eq!(tempo_stages(0.2), vec![0.5, 0.5, 0.8]);
    for factor in [0.1, 0.33, 0.5, 1.0, 2.0, 3.7, 9.0] {
        let stages = tempo_stages(factor);
        assert!(stages.iter().all(|s| (0.5..=2.0).contains(s)));
        let product: f64 = stages.iter().product();
        assert!((product - factor).abs() < 1e-9);
    }
}

#[test]
fn pan_gains_follow_position() {
    assert_eq!(pan_gains(50.0), (1.0, 1.0));
    assert_eq!(pan_gains(0.0), (1.0, 0.0));
    assert_eq!(pan_gains(100.0), (0.0, 1.0));
    assert_eq!(pan_gains(75.0), (0.5, 1.0));
}

#[test]
fn identity_fades_produce_no_filter() {
    let env = FadeEnvelope::default();
    assert_eq!(fade_in_filter(&env), None);
    assert_eq!(fade_out_filter(&env, 3.0), None);
}

#[test]
fn fade_in_filter_ramps_then_holds() {
    let env = FadeEnvelope {
        start_ratio: 0.0,
        end_ratio: 0.5,
        duration: 2.0,
    };
    assert_eq!(
        fade_in_filter(&env).unwrap(),
        "volume='if(lt(t,2.000000),0.000000+(0.500000-0.000000)*t/2.000000,0.500000)':eval=frame"
    );
}

#[test]
fn fade_out_filter_starts_at_onset() {
    let env = FadeEnvelope {
        start_ratio: 1.0,
        end_ratio: 0.0,
        duration: 1.0,
    };
    assert_eq!(
        fade_out_filter(&env, 4.0).unwrap(),
        "volume='if(gt(t,3.000000),1.000000+(0.000000-1.000000)*(t-3.000000)/1.000000,1.000000)':eval=frame"
    );
}

#[test]
fn zero_duration_fade_is_a_constant_gain() {
    let env = FadeEnvelope {
        start_ratio: 0.5,
        end_ratio: 0.25,
        duration: 0.0,
    };
    assert_eq!(fade_in_filter(&env).unwrap(), "volume=0.250000");
    assert_eq!(fade_out_filter(&env, 1.0).unwrap(), "volume=0.500000");
}

#[test]
fn plain_fragment_chain() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let chain = fragment_chain(&fragment(&file), 0.0, SETTINGS);
    assert_eq!(
        chain,
        "atrim=start=1.500000:duration=2.000000,asetpts=PTS-STARTPTS,\
         aformat=sample_fmts=fltp:sample_rates=44100:channel_layouts=stereo"
    );
}

#[test]
fn chain_applies_transforms_in_order() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let f = fragment(&file)
        .to_builder()
        .reverse(true)
        .pitch(200.0)
        .volume(50.0)
        .pan(0.0)
        .build()
        .unwrap();
    let chain = fragment_chain(&f, 2.5, SETTINGS);
    let filters: Vec<&str> = chain.split(',').collect();

    assert_eq!(filters[3], "areverse");
    assert_eq!(filters[4], "asetrate=88200");
    assert_eq!(filters[5], "aresample=44100");
    assert_eq!(filters[6], "volume=0.500000");
    assert_eq!(filters[7], "pan=stereo|c0=1.000000*c0|c1=0.000000*c1");
    assert_eq!(filters[8], "adelay=2500|2500");
}

#[test]
fn stretched_pitch_uses_atempo() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let f = fragment(&file)
        .to_builder()
        .pitch(400.0)
        .stretch(true)
        .build()
        .unwrap();
    let chain = fragment_chain(&f, 0.0, SETTINGS);
    assert!(chain.ends_with("atempo=2.000000,atempo=2.000000"));
    assert!(!chain.contains("asetrate"));
}

#[test]
fn mix_graph_single_input() {
    let graph = mix_graph(&["anull".to_string()], false);
    assert_eq!(graph, "[0:a]anull[f0];[f0]anull[out]");
}

#[test]
fn mix_graph_with_carried_partial() {
    let chains = vec!["volume=0.5".to_string(), "areverse".to_string()];
    let graph = mix_graph(&chains, true);
    assert_eq!(
        graph,
        "[0:a]anull[p];[1:a]volume=0.5[f1];[2:a]areverse[f2];\
         [p][f1][f2]amix=inputs=3:duration=longest:dropout_transition=0:normalize=0[out]"
    );
}
