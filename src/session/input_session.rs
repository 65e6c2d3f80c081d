//! Per-client input state machine: Chinese / English / temporary-English
//! modes, expanded candidate-view navigation, and commit handling.

use super::engine::{EngineSession, InputState, Mode};
use crate::candidate::CaretRect;
use crate::config::LayoutType;
use crate::input::{is_character_key, keysym, KeyEvent, Modifiers};

/// Drives one [`EngineSession`] through mode transitions the engine itself
/// knows nothing about. English-mode and the temporary-English excursion
/// (triggered by Shift while composing, per the original engine) never
/// reach the engine at all; only Chinese-mode keys do.
pub struct InputSession {
    engine: Box<dyn EngineSession>,
    mode: Mode,
    active: bool,
    temp_english_buffer: String,
    last_committed_char: Option<char>,
    expanded: ExpandedNav,
    caret: CaretRect,
    /// Text already decided on by a key that bypasses the engine (a bare
    /// digit, digit-follow punctuation, or the buffer from an exited
    /// temporary-English excursion). Drained by the next [`Self::commit`].
    pending_commit: Option<String>,
    /// Which physical arrow keys are the "expand" / "move-within-group"
    /// axes for the expanded candidate view. Set from config by the host.
    layout: LayoutType,
}

/// The two arrow-key axes of the expanded candidate view, resolved from
/// [`LayoutType`]: the "group" axis (next/previous group, i.e. row in
/// Horizontal layout, column in Vertical) and the "within-group" axis.
struct ExpandedAxes {
    group_prev: u32,
    group_next: u32,
    within_prev: u32,
    within_next: u32,
}

fn expanded_axes(layout: LayoutType) -> ExpandedAxes {
    match layout {
        LayoutType::Horizontal => ExpandedAxes {
            group_prev: keysym::XK_Up,
            group_next: keysym::XK_Down,
            within_prev: keysym::XK_Left,
            within_next: keysym::XK_Right,
        },
        LayoutType::Vertical => ExpandedAxes {
            group_prev: keysym::XK_Left,
            group_next: keysym::XK_Right,
            within_prev: keysym::XK_Up,
            within_next: keysym::XK_Down,
        },
    }
}

/// The arrow key that expands the candidate view from its un-expanded
/// state, per layout (§4.3.1: Down in Horizontal, Right in Vertical).
fn expand_trigger(layout: LayoutType) -> u32 {
    expanded_axes(layout).group_next
}

#[derive(Default, Clone, Copy)]
struct ExpandedNav {
    is_expanded: bool,
    rows: u32,
    current_row: u32,
    current_col: u32,
}

impl InputSession {
    pub fn new(engine: Box<dyn EngineSession>) -> Self {
        Self {
            engine,
            mode: Mode::Chinese,
            active: true,
            temp_english_buffer: String::new(),
            last_committed_char: None,
            expanded: ExpandedNav::default(),
            caret: CaretRect::default(),
            pending_commit: None,
            layout: LayoutType::Horizontal,
        }
    }

    /// Tracks the host's candidate-layout orientation, so the expanded
    /// view's arrow-key axes (expand trigger, group vs. within-group
    /// movement) stay consistent with what the candidate window renders.
    pub fn set_layout(&mut self, layout: LayoutType) {
        self.layout = layout;
    }

    /// Records the caret position reported by the platform shim
    /// (`IPC_UPDATE_POSITION`). Stored as a zero-size rect at that point;
    /// the candidate window clamps against it the same way it would a
    /// wider rect from a real text-range query.
    pub fn set_caret_position(&mut self, x: i32, y: i32) {
        self.caret = CaretRect { left: x, top: y, right: x, bottom: y };
    }

    pub fn caret(&self) -> CaretRect {
        self.caret
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == Mode::TempEnglish && mode != Mode::TempEnglish {
            self.exit_temp_english_mode(false);
        }
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(match self.mode {
            Mode::Chinese => Mode::English,
            Mode::English | Mode::TempEnglish => Mode::Chinese,
        });
    }

    /// Focus/activation transitions independent of caret focus: selecting
    /// this IME as the active input method vs. merely having caret focus.
    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.engine.reset();
        self.reset_expanded_state();
    }

    pub fn is_composing(&self) -> bool {
        self.engine.is_composing() || !self.temp_english_buffer.is_empty()
    }

    /// Returns `true` if the key was consumed (should not reach the
    /// application) and the caller should re-fetch [`Self::state`].
    pub fn process_key(&mut self, key: KeyEvent) -> bool {
        if !self.active {
            return false;
        }
        match self.mode {
            Mode::English => self.handle_english_mode(key),
            Mode::TempEnglish => self.handle_temp_english_mode(key),
            Mode::Chinese => self.handle_chinese_mode(key),
        }
    }

    fn handle_english_mode(&mut self, _key: KeyEvent) -> bool {
        // English mode never intercepts keys; the application's own text
        // field handles them.
        false
    }

    fn handle_temp_english_mode(&mut self, key: KeyEvent) -> bool {
        if key.keysym == keysym::XK_Return || key.keysym == keysym::XK_Space {
            self.exit_temp_english_mode(true);
            return true;
        }
        if key.keysym == keysym::XK_Escape {
            self.exit_temp_english_mode(false);
            return true;
        }
        if key.keysym == keysym::XK_BackSpace {
            if self.temp_english_buffer.pop().is_none() {
                self.exit_temp_english_mode(false);
            }
            return true;
        }
        if is_character_key(key.keysym) {
            if let Some(c) = char::from_u32(key.keysym) {
                self.temp_english_buffer.push(c);
            }
            return true;
        }
        // Any other key commits the buffer and re-dispatches in CH.
        self.exit_temp_english_mode(true);
        self.handle_chinese_mode(key)
    }

    fn handle_chinese_mode(&mut self, key: KeyEvent) -> bool {
        if !self.engine.is_composing() {
            if key.modifiers.contains(Modifiers::SHIFT) && is_character_key(key.keysym) {
                self.mode = Mode::TempEnglish;
                if let Some(c) = char::from_u32(key.keysym) {
                    self.temp_english_buffer.push(c);
                }
                return true;
            }
            if !key.modifiers.contains(Modifiers::SHIFT) {
                if let Some(c) = bare_digit(key.keysym) {
                    self.synthesize_commit(c);
                    return true;
                }
            }
            if self.last_committed_char.is_some_and(|c| c.is_ascii_digit()) {
                if let Some(c) = digit_follow_punctuation(key.keysym) {
                    self.synthesize_commit(c);
                    return true;
                }
            }
            if self.should_enter_temp_english(key) {
                self.mode = Mode::TempEnglish;
                return self.handle_temp_english_mode(key);
            }
        }

        if self.handle_arrow_keys(key) {
            return true;
        }

        if self.expanded.is_expanded && self.engine.is_composing() {
            if key.keysym == keysym::XK_Space || key.keysym == keysym::XK_Return {
                return self.commit_expanded_highlight();
            }
            if key.keysym == keysym::XK_Escape {
                self.reset_expanded_state();
                return true;
            }
            if !is_arrow_key(key.keysym) {
                self.reset_expanded_state();
            }
        }

        if key.keysym == keysym::XK_BackSpace || is_alpha_key(key.keysym) {
            self.reset_expanded_state();
        }

        let consumed = self.engine.process_key(key);
        if consumed && is_character_key(key.keysym) {
            if let Some(c) = char::from_u32(key.keysym) {
                self.last_committed_char = Some(c);
            }
        }
        consumed
    }

    /// Shift-on-first-character is the common case (handled above); the
    /// engine may additionally signal (via an empty non-composing state
    /// after a key it didn't consume) that the caller should fall through
    /// to temporary English, e.g. for keys the dictionary never matches.
    fn should_enter_temp_english(&self, _key: KeyEvent) -> bool {
        false
    }

    fn exit_temp_english_mode(&mut self, commit: bool) {
        if commit {
            let text = self.commit_temp_english_buffer();
            self.pending_commit = Some(text);
        } else {
            self.temp_english_buffer.clear();
        }
        self.mode = Mode::Chinese;
    }

    /// Records a commit decided by a key that never reaches the engine (a
    /// bare digit or digit-follow punctuation); `commit()` drains it on the
    /// caller's next request.
    fn synthesize_commit(&mut self, c: char) {
        self.last_committed_char = Some(c);
        self.pending_commit = Some(c.to_string());
    }

    fn commit_temp_english_buffer(&mut self) -> String {
        std::mem::take(&mut self.temp_english_buffer)
    }

    fn handle_arrow_keys(&mut self, key: KeyEvent) -> bool {
        if !self.engine.is_composing() {
            return false;
        }
        if !self.expanded.is_expanded {
            return self.try_enter_expanded_view(key);
        }

        let page_size = self.engine.state().page_size.max(1);
        let axes = expanded_axes(self.layout);

        if key.keysym == axes.within_prev && self.expanded.current_col > 0 {
            self.expanded.current_col -= 1;
            return true;
        }
        if key.keysym == axes.within_next && self.expanded.current_col + 1 < page_size {
            self.expanded.current_col += 1;
            return true;
        }
        if key.keysym == axes.group_prev && self.expanded.current_row > 0 {
            self.expanded.current_row -= 1;
            return true;
        }
        if key.keysym == axes.group_next {
            if self.expanded.current_row + 1 >= self.expanded.rows {
                let target = (self.expanded.rows + 1) * page_size;
                self.expanded.rows = self.load_group_count(target).max(self.expanded.rows);
            }
            if self.expanded.current_row + 1 < self.expanded.rows {
                self.expanded.current_row += 1;
                return true;
            }
        }
        false
    }

    /// First press of the expand arrow (§4.3.1's "Not yet expanded"): loads
    /// groups from the engine and enters expanded mode at group 0, column 0.
    /// A no-op while composing hasn't produced any candidates yet, and the
    /// "contract" direction (the other axis's arrows) falls through
    /// unchanged since it isn't `expand_trigger`.
    fn try_enter_expanded_view(&mut self, key: KeyEvent) -> bool {
        if key.keysym != expand_trigger(self.layout) {
            return false;
        }
        let page_size = self.engine.state().page_size.max(1);
        let rows = self.load_group_count(5 * page_size);
        if rows == 0 {
            return false;
        }
        self.expanded = ExpandedNav {
            is_expanded: true,
            rows,
            current_row: 0,
            current_col: 0,
        };
        true
    }

    /// Pages the engine forward, accumulating candidates, until at least
    /// `min_candidates` are cached or the engine reports no more pages,
    /// then rewinds to where it started. Returns the number of pages
    /// (groups) seen along the way.
    fn load_group_count(&mut self, min_candidates: u32) -> u32 {
        let mut loaded = self.engine.state().candidates.len() as u32;
        let mut groups = if loaded > 0 { 1 } else { 0 };
        let mut advanced = 0u32;
        while loaded < min_candidates && self.engine.page_down() {
            advanced += 1;
            groups += 1;
            loaded += self.engine.state().candidates.len() as u32;
        }
        for _ in 0..advanced {
            self.engine.page_up();
        }
        groups
    }

    /// Rewinds the engine to page 0, pages forward to the group's page, and
    /// selects the in-page index, per §4.3.1's "rewind, page forward, select"
    /// commit sequence. Leaves expanded view either way.
    fn commit_expanded_highlight(&mut self) -> bool {
        let page_size = self.engine.state().page_size.max(1);
        let absolute_index = self.expanded.current_row * page_size + self.expanded.current_col;
        let target_page = absolute_index / page_size;
        let in_page_index = absolute_index % page_size;
        while self.engine.page_up() {}
        for _ in 0..target_page {
            if !self.engine.page_down() {
                break;
            }
        }
        let ok = self.engine.select_candidate(in_page_index);
        self.reset_expanded_state();
        ok
    }

    pub fn select_candidate(&mut self, index: u32) -> bool {
        let ok = self.engine.select_candidate(index);
        if ok {
            self.reset_expanded_state();
        }
        ok
    }

    pub fn page_up(&mut self) -> bool {
        self.engine.page_up()
    }

    pub fn page_down(&mut self) -> bool {
        self.engine.page_down()
    }

    pub fn set_expanded(&mut self, expanded: bool, rows: u32) {
        self.expanded = ExpandedNav {
            is_expanded: expanded,
            rows,
            current_row: 0,
            current_col: 0,
        };
    }

    fn reset_expanded_state(&mut self) {
        self.expanded = ExpandedNav::default();
    }

    pub fn state(&self) -> InputState {
        let mut state = if self.mode == Mode::TempEnglish {
            InputState {
                preedit: self.temp_english_buffer.clone(),
                raw_input: self.temp_english_buffer.clone(),
                is_composing: true,
                ..Default::default()
            }
        } else {
            self.engine.state()
        };
        state.is_expanded = self.expanded.is_expanded;
        state.expanded_rows = self.expanded.rows;
        state.current_row = self.expanded.current_row;
        state.current_col = self.expanded.current_col;
        state.total_candidates = state.candidates.len() as u32;
        state
    }

    pub fn commit(&mut self) -> String {
        self.reset_expanded_state();
        if let Some(text) = self.pending_commit.take() {
            return text;
        }
        if self.mode == Mode::TempEnglish {
            self.commit_temp_english_buffer()
        } else {
            self.engine.commit()
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.temp_english_buffer.clear();
        self.pending_commit = None;
        self.reset_expanded_state();
    }

    /// Mirrors [`Self::process_key`]'s verdict without mutating session or
    /// engine state, so `TEST_KEY` stays consistent with the `PROCESS_KEY`
    /// that follows it (testable property 7).
    pub fn would_consume(&self, key: KeyEvent) -> bool {
        if !self.active {
            return false;
        }
        match self.mode {
            Mode::English => false,
            Mode::TempEnglish => self.would_consume_temp_english(key),
            Mode::Chinese => self.would_consume_chinese(key),
        }
    }

    fn would_consume_temp_english(&self, key: KeyEvent) -> bool {
        if key.keysym == keysym::XK_Return
            || key.keysym == keysym::XK_Space
            || key.keysym == keysym::XK_Escape
            || key.keysym == keysym::XK_BackSpace
        {
            return true;
        }
        if is_character_key(key.keysym) {
            return true;
        }
        // Any other key commits the buffer and would re-dispatch in CH.
        self.would_consume_chinese(key)
    }

    fn would_consume_chinese(&self, key: KeyEvent) -> bool {
        if !self.engine.is_composing() {
            if key.modifiers.contains(Modifiers::SHIFT) && is_character_key(key.keysym) {
                return true;
            }
            if !key.modifiers.contains(Modifiers::SHIFT) && bare_digit(key.keysym).is_some() {
                return true;
            }
            if self.last_committed_char.is_some_and(|c| c.is_ascii_digit())
                && digit_follow_punctuation(key.keysym).is_some()
            {
                return true;
            }
            if self.should_enter_temp_english(key) {
                return true;
            }
        }

        if self.would_consume_arrow_key(key) {
            return true;
        }

        if self.expanded.is_expanded
            && self.engine.is_composing()
            && (key.keysym == keysym::XK_Space
                || key.keysym == keysym::XK_Return
                || key.keysym == keysym::XK_Escape)
        {
            return true;
        }

        self.engine.would_consume(key)
    }

    /// Read-only mirror of [`Self::handle_arrow_keys`]'s verdict: whether
    /// the key would move the expanded view or trigger it, without paging
    /// the engine or touching `self.expanded`.
    fn would_consume_arrow_key(&self, key: KeyEvent) -> bool {
        if !self.engine.is_composing() {
            return false;
        }
        if !self.expanded.is_expanded {
            return key.keysym == expand_trigger(self.layout);
        }
        let page_size = self.engine.state().page_size.max(1);
        let axes = expanded_axes(self.layout);
        if key.keysym == axes.within_prev {
            return self.expanded.current_col > 0;
        }
        if key.keysym == axes.within_next {
            return self.expanded.current_col + 1 < page_size;
        }
        if key.keysym == axes.group_prev {
            return self.expanded.current_row > 0;
        }
        if key.keysym == axes.group_next {
            return self.expanded.current_row + 1 < self.expanded.rows
                || self.engine.state().has_more_pages;
        }
        false
    }
}

fn is_alpha_key(sym: u32) -> bool {
    (keysym::XK_a..=keysym::XK_z).contains(&sym) || (keysym::XK_A..=keysym::XK_Z).contains(&sym)
}

fn is_arrow_key(sym: u32) -> bool {
    matches!(
        sym,
        keysym::XK_Left | keysym::XK_Right | keysym::XK_Up | keysym::XK_Down
    )
}

/// A digit keysym pressed with no modifiers while nothing is composing:
/// committed immediately rather than handed to the engine.
fn bare_digit(sym: u32) -> Option<char> {
    if (keysym::XK_0..=keysym::XK_9).contains(&sym) {
        char::from_u32(sym)
    } else {
        None
    }
}

/// `.`, `,`, `;` (unshifted) and `:` (shift+`;`, already resolved by the key
/// codec) immediately following a committed digit: converted to their ASCII
/// equivalents instead of reaching the engine.
fn digit_follow_punctuation(sym: u32) -> Option<char> {
    match sym {
        k if k == keysym::XK_Period => Some('.'),
        k if k == keysym::XK_Comma => Some(','),
        k if k == keysym::XK_Semicolon => Some(';'),
        k if k == keysym::XK_Colon => Some(':'),
        _ => None,
    }
}
