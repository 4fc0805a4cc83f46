use crate::fragment::Fragment;
use crate::timeline::Timeline;

/// Largest fragment count a single timeline can hold.
pub(crate) const MAX_FRAGMENTS: usize =
    isize::MAX as usize / std::mem::size_of::<Fragment>();

/// Mutable accumulator used while assembling a [`Timeline`].
///
/// This is the only place fragments are appended in place; every public [`Timeline`] operation
/// is pure and builds its result through one of these.
#[derive(Debug, Default)]
pub struct Accumulator {
    fragments: Vec<Fragment>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fragments: Vec::with_capacity(capacity),
        }
    }

    /// Append one fragment.
    pub fn push(&mut self, fragment: Fragment) -> &mut Self {
        self.fragments.push(fragment);
        self
    }

    /// Append every fragment of `other`, in order.
    pub fn concat(&mut self, other: &Timeline) -> &mut Self {
        self.fragments.extend(other.fragments().iter().cloned());
        self
    }

    /// Effective duration accumulated so far.
    pub fn duration(&self) -> f64 {
        self.fragments.iter().map(Fragment::duration).sum()
    }

    pub fn finish(self) -> Timeline {
        Timeline {
            fragments: self.fragments,
        }
    }
}

/// Outcome of folding [`Fragment::create`] across a fragment sequence.
#[derive(Debug)]
pub(crate) struct Carve {
    pub(crate) timeline: Timeline,
    pub(crate) cursor: f64,
    pub(crate) remaining: f64,
}

/// Left-to-right fold threading `(cursor, remaining)` through [`Fragment::create`], stopping as
/// soon as nothing remains to collect.
pub(crate) fn carve(fragments: &[Fragment], cursor: f64, remaining: f64) -> Carve {
    let mut acc = Accumulator::new();
    let mut cursor = cursor;
    let mut remaining = remaining;

    for fragment in fragments {
        let cut = fragment.create(cursor, remaining);
        cursor = cut.cursor;
        remaining = cut.remaining;

        if let Some(f) = cut.fragment {
            acc.push(f);
        }
        if remaining == 0.0 {
            break;
        }
    }

    Carve {
        timeline: acc.finish(),
        cursor,
        remaining,
    }
}

/// Rebuild every fragment through `edit`, optionally walking them in reverse order.
pub(crate) fn map_fragments(
    fragments: &[Fragment],
    reverse: bool,
    mut edit: impl FnMut(&Fragment) -> Fragment,
) -> Timeline {
    let mut acc = Accumulator::with_capacity(fragments.len());
    if reverse {
        for f in fragments.iter().rev() {
            acc.push(edit(f));
        }
    } else {
        for f in fragments {
            acc.push(edit(f));
        }
    }
    acc.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/fold.rs"]
mod tests;
