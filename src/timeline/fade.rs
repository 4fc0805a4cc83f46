use crate::foundation::math::clamp01;
use crate::fragment::Fragment;
use crate::timeline::Timeline;
use crate::timeline::fold::map_fragments;

impl Timeline {
    /// Linear 0 → 1 fade over the first `fade` seconds.
    ///
    /// The ramp is split across however many leading fragments the window covers. Each touched
    /// fragment gets the ramp's ratios at its own entry and at the end of the portion it consumes
    /// multiplied into its fade-in envelope, and that portion as its fade-in duration. The
    /// portions add up to `fade` (or to the whole timeline when it is shorter).
    pub fn fade_in(&self, fade: f64) -> Self {
        if fade <= 0.0 || fade.is_nan() {
            return self.clone();
        }
        let ratio_at = |pos: f64| (pos / fade).min(1.0);

        let mut position = 0.0;
        let mut budget = fade;
        map_fragments(&self.fragments, false, |f| {
            let at = position;
            position += f.duration();
            if at >= fade {
                return f.clone();
            }

            let consumed = f.duration().min(budget);
            budget -= consumed;
            Fragment {
                fade_in: f
                    .fade_in
                    .compound(ratio_at(at), ratio_at(at + consumed), consumed),
                ..f.clone()
            }
        })
    }

    /// Linear 1 → 0 fade over the last `fade` seconds.
    ///
    /// Mirror of [`Timeline::fade_in`]: every fragment whose end lies past `duration() - fade`
    /// is touched, and its fade-out duration is the part of it inside the window.
    pub fn fade_out(&self, fade: f64) -> Self {
        if fade <= 0.0 || fade.is_nan() {
            return self.clone();
        }
        let window = self.duration() - fade;
        let ratio_at = |pos: f64| 1.0 - clamp01((pos - window) / fade);

        let mut position = 0.0;
        let mut budget = fade;
        map_fragments(&self.fragments, false, |f| {
            let at = position;
            let end = at + f.duration();
            position = end;
            if end <= window {
                return f.clone();
            }

            let consumed = (end - at.max(window)).min(budget);
            budget -= consumed;
            Fragment {
                fade_out: f
                    .fade_out
                    .compound(ratio_at(at), ratio_at(end), consumed),
                ..f.clone()
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/fade.rs"]
mod tests;
