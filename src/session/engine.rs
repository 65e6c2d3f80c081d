//! The composition engine boundary.
//!
//! The engine (candidate lookup, ranking, pronunciation handling) lives
//! outside this repository's scope; this trait is the narrow seam the
//! session state machine drives it through. Production code backs it with
//! a RIME session; tests back it with an in-memory fake.

use crate::input::KeyEvent;

/// Input mode, mirroring the original engine's three-way split between
/// composing Chinese, plain English, and a transient English excursion
/// triggered mid-composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chinese,
    English,
    TempEnglish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub comment: String,
    pub index: u32,
}

/// A full snapshot of engine-visible composition state, handed to the
/// candidate view on every change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputState {
    pub preedit: String,
    pub raw_input: String,
    pub candidates: Vec<Candidate>,
    pub highlighted_index: i32,
    pub page_index: u32,
    pub page_size: u32,
    pub has_more_pages: bool,
    pub is_composing: bool,
    pub is_expanded: bool,
    pub expanded_rows: u32,
    pub current_row: u32,
    pub current_col: u32,
    /// Derived purely from `candidates`/pagination state; never set
    /// independently.
    pub total_candidates: u32,
}

/// Narrow seam to the composition engine. One instance per [`super::InputSession`].
pub trait EngineSession: Send {
    fn process_key(&mut self, key: KeyEvent) -> bool;
    fn select_candidate(&mut self, index: u32) -> bool;
    fn page_up(&mut self) -> bool;
    fn page_down(&mut self) -> bool;
    fn state(&self) -> InputState;
    fn reset(&mut self);
    /// Commits the current composition, returning the committed text (empty
    /// if nothing was composing).
    fn commit(&mut self) -> String;
    fn is_composing(&self) -> bool;

    /// Reports whether [`Self::process_key`] would return `true` for this
    /// key, without mutating composition state. Backs `TEST_KEY`, which
    /// must agree with the `PROCESS_KEY` that follows it.
    fn would_consume(&self, key: KeyEvent) -> bool;

    /// Frequency learning is owned entirely by the engine; these are
    /// pass-through toggles, never reimplemented here.
    fn set_frequency_learning_enabled(&mut self, _enabled: bool) {}
    fn set_min_frequency_for_sorting(&mut self, _min_count: u32) {}
}

/// Stand-in used until a real RIME session is linked in: accepts every key
/// without composing anything. Keeps the server runnable end-to-end (IPC,
/// session lifecycle, candidate geometry) before the FFI binding to the
/// actual engine exists.
#[derive(Default)]
pub struct NullEngine;

impl EngineSession for NullEngine {
    fn process_key(&mut self, _key: KeyEvent) -> bool {
        false
    }

    fn select_candidate(&mut self, _index: u32) -> bool {
        false
    }

    fn page_up(&mut self) -> bool {
        false
    }

    fn page_down(&mut self) -> bool {
        false
    }

    fn state(&self) -> InputState {
        InputState::default()
    }

    fn reset(&mut self) {}

    fn commit(&mut self) -> String {
        String::new()
    }

    fn is_composing(&self) -> bool {
        false
    }

    fn would_consume(&self, _key: KeyEvent) -> bool {
        false
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;

    /// Minimal in-memory engine double used by session and IPC tests: it
    /// composes pinyin-looking input into a single fixed candidate so
    /// behavior above the engine boundary can be exercised deterministically.
    #[derive(Default)]
    pub struct FakeEngine {
        pub raw: String,
        pub composing: bool,
    }

    impl EngineSession for FakeEngine {
        fn process_key(&mut self, key: KeyEvent) -> bool {
            if crate::input::is_character_key(key.keysym) {
                self.raw.push(char::from_u32(key.keysym).unwrap_or('?'));
                self.composing = true;
                true
            } else {
                false
            }
        }

        fn select_candidate(&mut self, _index: u32) -> bool {
            self.composing = false;
            true
        }

        fn page_up(&mut self) -> bool {
            false
        }

        fn page_down(&mut self) -> bool {
            false
        }

        fn state(&self) -> InputState {
            let candidates = if self.raw.is_empty() {
                vec![]
            } else {
                vec![Candidate {
                    text: self.raw.clone(),
                    comment: String::new(),
                    index: 0,
                }]
            };
            InputState {
                preedit: self.raw.clone(),
                raw_input: self.raw.clone(),
                total_candidates: candidates.len() as u32,
                candidates,
                highlighted_index: 0,
                page_index: 0,
                page_size: 9,
                has_more_pages: false,
                is_composing: self.composing,
                is_expanded: false,
                expanded_rows: 0,
                current_row: 0,
                current_col: 0,
            }
        }

        fn reset(&mut self) {
            self.raw.clear();
            self.composing = false;
        }

        fn commit(&mut self) -> String {
            let out = self.raw.clone();
            self.reset();
            out
        }

        fn is_composing(&self) -> bool {
            self.composing
        }

        fn would_consume(&self, key: KeyEvent) -> bool {
            crate::input::is_character_key(key.keysym)
        }
    }

    /// Like [`FakeEngine`], but composing gives `total_pages` worth of
    /// paged candidates instead of a single one, so callers can exercise
    /// multi-page navigation (expanded-view loading, page up/down).
    pub struct PagingFakeEngine {
        pub raw: String,
        pub composing: bool,
        pub page_size: u32,
        pub total_pages: u32,
        pub page_index: u32,
    }

    impl Default for PagingFakeEngine {
        fn default() -> Self {
            Self {
                raw: String::new(),
                composing: false,
                page_size: 9,
                total_pages: 1,
                page_index: 0,
            }
        }
    }

    impl EngineSession for PagingFakeEngine {
        fn process_key(&mut self, key: KeyEvent) -> bool {
            if crate::input::is_character_key(key.keysym) {
                self.raw.push(char::from_u32(key.keysym).unwrap_or('?'));
                self.composing = true;
                self.page_index = 0;
                true
            } else {
                false
            }
        }

        fn select_candidate(&mut self, _index: u32) -> bool {
            self.composing = false;
            true
        }

        fn page_up(&mut self) -> bool {
            if self.page_index > 0 {
                self.page_index -= 1;
                true
            } else {
                false
            }
        }

        fn page_down(&mut self) -> bool {
            if self.page_index + 1 < self.total_pages {
                self.page_index += 1;
                true
            } else {
                false
            }
        }

        fn state(&self) -> InputState {
            let candidates = if self.raw.is_empty() {
                vec![]
            } else {
                (0..self.page_size)
                    .map(|i| Candidate {
                        text: format!("{}-{}-{}", self.raw, self.page_index, i),
                        comment: String::new(),
                        index: i,
                    })
                    .collect()
            };
            InputState {
                preedit: self.raw.clone(),
                raw_input: self.raw.clone(),
                total_candidates: candidates.len() as u32,
                candidates,
                highlighted_index: 0,
                page_index: self.page_index,
                page_size: self.page_size,
                has_more_pages: self.page_index + 1 < self.total_pages,
                is_composing: self.composing,
                is_expanded: false,
                expanded_rows: 0,
                current_row: 0,
                current_col: 0,
            }
        }

        fn reset(&mut self) {
            self.raw.clear();
            self.composing = false;
            self.page_index = 0;
        }

        fn commit(&mut self) -> String {
            let out = self.raw.clone();
            self.reset();
            out
        }

        fn is_composing(&self) -> bool {
            self.composing
        }

        fn would_consume(&self, key: KeyEvent) -> bool {
            crate::input::is_character_key(key.keysym)
        }
    }
}
