//! Caret location: a cascade of increasingly approximate strategies, each
//! tried in order until one reports a rectangle. Mirrors the original TSF
//! bridge's `CaretRect` type and its fallback chain (edit-session range
//! rect, then GUI thread info, then the last known cursor position).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl CaretRect {
    pub fn x(&self) -> i32 {
        self.left
    }

    pub fn y(&self) -> i32 {
        self.top
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }
}

/// One strategy in the cascade. Implementations query an increasingly
/// approximate source of truth (TSF range, GUI thread info, last cursor
/// position) and return `None` if that source can't answer right now.
pub trait CaretStrategy: Send + Sync {
    fn locate(&self) -> Option<CaretRect>;
    fn name(&self) -> &'static str;
}

/// Tries each strategy in order, returning the first hit. Falls back to
/// `(0, 0, 0, 0)` if every strategy misses, so the candidate window always
/// has *a* position to clamp against.
pub struct CaretLocator {
    strategies: Vec<Box<dyn CaretStrategy>>,
}

impl CaretLocator {
    pub fn new(strategies: Vec<Box<dyn CaretStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn locate(&self) -> CaretRect {
        for strategy in &self.strategies {
            if let Some(rect) = strategy.locate() {
                return normalize(rect);
            }
        }
        normalize(CaretRect::default())
    }
}

/// Enforces the cascade's return contract: `width >= 1`, `height >= 1`,
/// with height defaulting to 20 when a strategy reported a degenerate rect
/// (the wire protocol carries a point, not a range, so `UpdatePosition`
/// always produces one).
fn normalize(mut rect: CaretRect) -> CaretRect {
    if rect.width() == 0 {
        rect.right = rect.left + 1;
    }
    if rect.height() == 0 {
        rect.bottom = rect.top + 20;
    }
    rect
}

/// Reads the caret rect last reported by the platform shim over
/// `IPC_UPDATE_POSITION`. This is the primary strategy in the cascade: the
/// TSF client already queried the real edit session range before sending
/// it, so there is nothing cheaper or more accurate to ask for.
pub struct SessionCaretStrategy<F> {
    read: F,
}

impl<F> SessionCaretStrategy<F>
where
    F: Fn() -> Option<CaretRect> + Send + Sync,
{
    pub fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F> CaretStrategy for SessionCaretStrategy<F>
where
    F: Fn() -> Option<CaretRect> + Send + Sync,
{
    fn locate(&self) -> Option<CaretRect> {
        (self.read)()
    }

    fn name(&self) -> &'static str {
        "session_caret"
    }
}

#[cfg(windows)]
pub mod windows_gui_thread {
    //! Fallback used when no session has reported a position yet (e.g. the
    //! very first candidate paint after focus-in): asks the foreground
    //! thread's `GUITHREADINFO` for its caret rect, matching the original
    //! bridge's behavior when the TSF edit-session range query fails.
    use super::{CaretRect, CaretStrategy};
    use windows::Win32::Foundation::RECT;
    use windows::Win32::UI::WindowsAndMessaging::{
        GetForegroundWindow, GetGUIThreadInfo, GetWindowThreadProcessId, GUITHREADINFO,
    };

    pub struct GuiThreadInfoStrategy;

    impl CaretStrategy for GuiThreadInfoStrategy {
        fn locate(&self) -> Option<CaretRect> {
            // SAFETY: all three calls take no pointers we own past their
            // return; `info` is zero-initialized to the size the API
            // requires before being passed by mutable reference.
            unsafe {
                let hwnd = GetForegroundWindow();
                if hwnd.is_invalid() {
                    return None;
                }
                let thread_id = GetWindowThreadProcessId(hwnd, None);
                let mut info = GUITHREADINFO {
                    cbSize: std::mem::size_of::<GUITHREADINFO>() as u32,
                    ..Default::default()
                };
                GetGUIThreadInfo(thread_id, &mut info).ok()?;
                let RECT { left, top, right, bottom } = info.rcCaret;
                if left == 0 && top == 0 && right == 0 && bottom == 0 {
                    return None;
                }
                Some(CaretRect { left, top, right, bottom })
            }
        }

        fn name(&self) -> &'static str {
            "gui_thread_info"
        }
    }
}
