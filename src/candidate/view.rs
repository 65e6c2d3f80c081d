//! Pure candidate-view layout geometry: a function of `(InputState,
//! LayoutType, toggles)`, with no window-system or drawing dependency.
//! Callers that want caching re-derive it only when the inputs change —
//! the function itself holds no state.

use crate::config::LayoutType;
use crate::session::InputState;

/// Accessibility floor from §4.4: a candidate window is never smaller than
/// this no matter how few candidates it holds.
const MIN_WIDTH: u32 = 100;
const MIN_HEIGHT: u32 = 30;

#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    pub layout: LayoutType,
    pub show_comment: bool,
    pub show_preedit: bool,
    pub item_width: u32,
    pub item_height: u32,
    pub preedit_height: u32,
    pub padding: u32,
    /// Gap between adjacent candidates in Horizontal layout.
    pub candidate_spacing: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            layout: LayoutType::Horizontal,
            show_comment: true,
            show_preedit: true,
            item_width: 80,
            item_height: 28,
            preedit_height: 24,
            padding: 6,
            candidate_spacing: 4,
        }
    }
}

/// Computed candidate window size and per-candidate bounding boxes, in the
/// same coordinate space the window placement algorithm consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLayout {
    pub width: u32,
    pub height: u32,
    pub candidate_rects: Vec<(u32, u32, u32, u32)>,
}

/// Computes layout for a non-expanded view: one row (horizontal) or one
/// column (vertical) of up to `state.page_size` candidates, plus an
/// optional preedit strip.
pub fn layout(state: &InputState, opts: &LayoutOptions) -> CandidateLayout {
    if state.is_expanded {
        return layout_expanded(state, opts);
    }

    let preedit_h = if opts.show_preedit && !state.preedit.is_empty() {
        opts.preedit_height
    } else {
        0
    };

    let n = state.candidates.len() as u32;
    let mut rects = Vec::with_capacity(n as usize);

    match opts.layout {
        LayoutType::Horizontal => {
            let mut x = opts.padding;
            for _ in 0..n {
                rects.push((x, opts.padding + preedit_h, opts.item_width, opts.item_height));
                x += opts.item_width + opts.candidate_spacing;
            }
            let width = opts.padding * 2
                + n.max(1) * opts.item_width
                + n.saturating_sub(1) * opts.candidate_spacing;
            let height = opts.padding * 2 + preedit_h + opts.item_height;
            CandidateLayout {
                width: width.max(MIN_WIDTH),
                height: height.max(MIN_HEIGHT),
                candidate_rects: rects,
            }
        }
        LayoutType::Vertical => {
            let mut y = opts.padding + preedit_h;
            for _ in 0..n {
                rects.push((opts.padding, y, opts.item_width, opts.item_height));
                y += opts.item_height;
            }
            let width = opts.padding * 2 + opts.item_width;
            let height = opts.padding * 2 + preedit_h + n.max(1) * opts.item_height;
            CandidateLayout {
                width: width.max(MIN_WIDTH),
                height: height.max(MIN_HEIGHT),
                candidate_rects: rects,
            }
        }
    }
}

/// Computes layout for the expanded grid view: Expanded-horizontal shows
/// `min(5, total_groups)` rows of `page_size` candidates each; Expanded-
/// vertical shows `min(5, total_groups)` columns of `page_size` candidates
/// each. `state.expanded_rows` carries the total group count regardless of
/// orientation (set by the session when entering expanded mode).
fn layout_expanded(state: &InputState, opts: &LayoutOptions) -> CandidateLayout {
    let page_size = state.page_size.max(1);
    let total_groups = state.expanded_rows.max(1);
    let visible_groups = total_groups.min(5);
    let n = state.candidates.len() as u32;

    let mut rects = Vec::with_capacity(n as usize);
    match opts.layout {
        LayoutType::Horizontal => {
            for i in 0..n {
                let row = i / page_size;
                let col = i % page_size;
                let x = opts.padding + col * (opts.item_width + opts.candidate_spacing);
                let y = opts.padding + row * opts.item_height;
                rects.push((x, y, opts.item_width, opts.item_height));
            }
            let width = opts.padding * 2
                + page_size * opts.item_width
                + page_size.saturating_sub(1) * opts.candidate_spacing;
            let height = opts.padding * 2 + visible_groups * opts.item_height;
            CandidateLayout {
                width: width.max(MIN_WIDTH),
                height: height.max(MIN_HEIGHT),
                candidate_rects: rects,
            }
        }
        LayoutType::Vertical => {
            for i in 0..n {
                let col = i / page_size;
                let row = i % page_size;
                let x = opts.padding + col * opts.item_width;
                let y = opts.padding + row * opts.item_height;
                rects.push((x, y, opts.item_width, opts.item_height));
            }
            let width = opts.padding * 2 + visible_groups * opts.item_width;
            let height = opts.padding * 2 + page_size * opts.item_height;
            CandidateLayout {
                width: width.max(MIN_WIDTH),
                height: height.max(MIN_HEIGHT),
                candidate_rects: rects,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::engine::Candidate;

    fn state_with(n: usize) -> InputState {
        InputState {
            candidates: (0..n)
                .map(|i| Candidate {
                    text: format!("c{i}"),
                    comment: String::new(),
                    index: i as u32,
                })
                .collect(),
            page_size: 9,
            ..Default::default()
        }
    }

    #[test]
    fn horizontal_layout_grows_with_candidate_count() {
        let opts = LayoutOptions::default();
        let a = layout(&state_with(1), &opts);
        let b = layout(&state_with(5), &opts);
        assert!(b.width > a.width);
        assert_eq!(a.height, b.height);
    }

    #[test]
    fn vertical_layout_stacks_rows() {
        let opts = LayoutOptions {
            layout: LayoutType::Vertical,
            ..Default::default()
        };
        let l = layout(&state_with(3), &opts);
        assert_eq!(l.candidate_rects.len(), 3);
        assert_eq!(l.candidate_rects[1].1 - l.candidate_rects[0].1, opts.item_height);
    }

    #[test]
    fn expanded_horizontal_layout_wraps_a_row_per_page() {
        let mut state = state_with(9);
        state.page_size = 3;
        state.is_expanded = true;
        state.expanded_rows = 3; // 3 groups of page_size 3 => 3 rows
        let l = layout(&state, &LayoutOptions::default());
        assert_eq!(l.candidate_rects[3].1 - l.candidate_rects[0].1, 28); // next row down
        assert_eq!(l.candidate_rects[1].1, l.candidate_rects[0].1); // same row
    }

    #[test]
    fn expanded_view_shows_at_most_five_groups() {
        let mut state = state_with(9);
        state.page_size = 3;
        state.is_expanded = true;
        state.expanded_rows = 20; // far more groups than the 5-row window
        let l = layout(&state, &LayoutOptions::default());
        assert_eq!(l.height, LayoutOptions::default().padding * 2 + 5 * 28);
    }

    #[test]
    fn expanded_vertical_layout_stacks_a_column_per_page() {
        let mut state = state_with(6);
        state.page_size = 3;
        state.is_expanded = true;
        state.expanded_rows = 2;
        let opts = LayoutOptions {
            layout: LayoutType::Vertical,
            ..Default::default()
        };
        let l = layout(&state, &opts);
        assert_eq!(l.candidate_rects[3].0 - l.candidate_rects[0].0, opts.item_width);
    }

    #[test]
    fn layout_never_shrinks_below_the_accessibility_floor() {
        let l = layout(&state_with(0), &LayoutOptions::default());
        assert!(l.width >= MIN_WIDTH);
        assert!(l.height >= MIN_HEIGHT);
    }

    #[test]
    fn layout_is_pure_same_input_same_output() {
        let state = state_with(4);
        let opts = LayoutOptions::default();
        assert_eq!(layout(&state, &opts), layout(&state, &opts));
    }
}
