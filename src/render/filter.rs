use crate::foundation::math::{clamp01, percent_to_factor};
use crate::fragment::{FadeEnvelope, Fragment};

/// Settings shared by every per-fragment filter chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainSettings {
    /// Working sample rate in Hz.
    pub sample_rate: u32,
}

/// Split a tempo factor into `atempo` stages that each stay within `[0.5, 2.0]`.
pub fn tempo_stages(factor: f64) -> Vec<f64> {
    let mut stages = Vec::new();
    let mut rest = factor;
    while rest > 2.0 {
        stages.push(2.0);
        rest /= 2.0;
    }
    while rest < 0.5 {
        stages.push(0.5);
        rest /= 0.5;
    }
    stages.push(rest);
    stages
}

/// Left/right channel gains for a pan percentage (0 = left, 50 = centre, 100 = right).
pub fn pan_gains(pan: f64) -> (f64, f64) {
    (clamp01((100.0 - pan) / 50.0), clamp01(pan / 50.0))
}

/// `volume` filter realizing a fade-in envelope: ramp over the first `duration` seconds, then
/// hold the end ratio.
pub fn fade_in_filter(env: &FadeEnvelope) -> Option<String> {
    if env.is_identity() {
        return None;
    }
    if env.duration <= 0.0 {
        return Some(format!("volume={:.6}", env.end_ratio));
    }
    Some(format!(
        "volume='if(lt(t,{d:.6}),{s:.6}+({e:.6}-{s:.6})*t/{d:.6},{e:.6})':eval=frame",
        d = env.duration,
        s = env.start_ratio,
        e = env.end_ratio,
    ))
}

/// `volume` filter realizing a fade-out envelope over the last `duration` seconds of a span
/// lasting `span` seconds. Before the ramp the start ratio holds.
pub fn fade_out_filter(env: &FadeEnvelope, span: f64) -> Option<String> {
    if env.is_identity() {
        return None;
    }
    if env.duration <= 0.0 {
        return Some(format!("volume={:.6}", env.start_ratio));
    }
    let onset = (span - env.duration).max(0.0);
    Some(format!(
        "volume='if(gt(t,{o:.6}),{s:.6}+({e:.6}-{s:.6})*(t-{o:.6})/{d:.6},{s:.6})':eval=frame",
        o = onset,
        d = env.duration,
        s = env.start_ratio,
        e = env.end_ratio,
    ))
}

/// Comma-separated filter chain turning one source input into the fragment as heard, delayed
/// to `position` seconds on the track.
pub fn fragment_chain(fragment: &Fragment, position: f64, settings: ChainSettings) -> String {
    let sr = settings.sample_rate;
    let mut filters = vec![
        format!(
            "atrim=start={:.6}:duration={:.6}",
            fragment.start(),
            fragment.length()
        ),
        "asetpts=PTS-STARTPTS".to_string(),
        format!("aformat=sample_fmts=fltp:sample_rates={sr}:channel_layouts=stereo"),
    ];

    if fragment.is_reversed() {
        filters.push("areverse".to_string());
    }

    if fragment.pitch() != 100.0 {
        let rate = percent_to_factor(fragment.pitch());
        if fragment.is_stretched() {
            filters.extend(
                tempo_stages(rate)
                    .into_iter()
                    .map(|s| format!("atempo={s:.6}")),
            );
        } else {
            let shifted = (f64::from(sr) * rate).round().max(1.0) as u64;
            filters.push(format!("asetrate={shifted}"));
            filters.push(format!("aresample={sr}"));
        }
    }

    if fragment.volume() != 100.0 {
        filters.push(format!(
            "volume={:.6}",
            percent_to_factor(fragment.volume())
        ));
    }

    let (left, right) = pan_gains(fragment.pan());
    if left != 1.0 || right != 1.0 {
        filters.push(format!("pan=stereo|c0={left:.6}*c0|c1={right:.6}*c1"));
    }

    if let Some(f) = fade_in_filter(&fragment.fade_in()) {
        filters.push(f);
    }
    if let Some(f) = fade_out_filter(&fragment.fade_out(), fragment.duration()) {
        filters.push(f);
    }

    let delay_ms = (position * 1000.0).round().max(0.0) as u64;
    if delay_ms > 0 {
        filters.push(format!("adelay={delay_ms}|{delay_ms}"));
    }

    filters.join(",")
}

/// Full `-filter_complex` graph mixing `chains.len()` labelled inputs (plus an optional already
/// mixed partial at input 0) into `[out]`.
///
/// `chains[i]` is applied to input `i + offset`, where `offset` is 1 when a partial is carried.
pub fn mix_graph(chains: &[String], carry_partial: bool) -> String {
    let offset = usize::from(carry_partial);
    let mut graph = Vec::with_capacity(chains.len() + 2);
    let mut labels = String::new();

    if carry_partial {
        graph.push("[0:a]anull[p]".to_string());
        labels.push_str("[p]");
    }
    for (i, chain) in chains.iter().enumerate() {
        let input = i + offset;
        graph.push(format!("[{input}:a]{chain}[f{input}]"));
        labels.push_str(&format!("[f{input}]"));
    }

    let inputs = chains.len() + offset;
    if inputs == 1 {
        graph.push(format!("{labels}anull[out]"));
    } else {
        graph.push(format!(
            "{labels}amix=inputs={inputs}:duration=longest:dropout_transition=0:normalize=0[out]"
        ));
    }
    graph.join(";")
}

#[cfg(test)]
#[path = "../../tests/unit/render/filter.rs"]
mod tests;
