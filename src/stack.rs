//! Call-stack capture and coalescing.
//!
//! A [`Stack`] records the call frames at error-creation time. Capture is
//! cheap: symbols are resolved lazily, only when a trace is actually
//! rendered. When an error and its structured cause both carry a stack, the
//! two traces are merged at render time into a single trace without the
//! redundantly overlapping trailing frames (see
//! [`combine_traces`](crate::stack::combine_traces)).
//!
//! Capture can be disabled process-wide with [`set_capture_stacks`].

use backtrace::Backtrace;
use core::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Controls whether stacks are captured on error creation. Defaults to on.
static CAPTURE_STACKS: AtomicBool = AtomicBool::new(true);

/// Enables or disables stack capture for all subsequently created errors.
pub fn set_capture_stacks(enabled: bool) {
    CAPTURE_STACKS.store(enabled, Ordering::Relaxed);
}

/// Returns true if stacks are captured on error creation.
pub fn capture_stacks() -> bool {
    CAPTURE_STACKS.load(Ordering::Relaxed)
}

/// A single resolved call frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub(crate) symbol: usize,
    pub(crate) file: String,
    pub(crate) line: u32,
    pub(crate) function: String,
}

impl Frame {
    /// Two frames are equivalent if they share the same code entry point,
    /// source file, function and line. The raw instruction pointer is
    /// intentionally not part of the comparison: repeated calls on the same
    /// wrapping line produce different pointers but identical logical
    /// frames.
    pub(crate) fn equivalent(&self, other: &Frame) -> bool {
        self.symbol == other.symbol
            && self.line == other.line
            && self.file == other.file
            && self.function == other.function
    }

    fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

/// A captured call stack. Frames are resolved once, on first access, and
/// cached.
#[derive(Debug, Clone, Default)]
pub(crate) struct Stack {
    backtrace: Option<Backtrace>,
    skip: usize,
    frames: OnceLock<Vec<Frame>>,
}

impl Stack {
    /// Captures the current call stack without resolving symbols.
    pub(crate) fn capture() -> Self {
        Stack {
            backtrace: Some(Backtrace::new_unresolved()),
            skip: 0,
            frames: OnceLock::new(),
        }
    }

    /// Removes the top `n` frames, so that convenience wrappers calling the
    /// constructor internally can erase their own stack contribution. Does
    /// nothing if fewer than `n` frames remain.
    pub(crate) fn drop_frames(&mut self, n: usize) {
        self.skip += n;
        self.frames = OnceLock::new();
    }

    /// Resolves and returns the frames, innermost call first.
    pub(crate) fn frames(&self) -> &[Frame] {
        self.frames.get_or_init(|| self.resolve())
    }

    fn resolve(&self) -> Vec<Frame> {
        let Some(backtrace) = &self.backtrace else {
            return Vec::new();
        };
        let mut resolved = backtrace.clone();
        resolved.resolve();

        let mut frames = Vec::new();
        for frame in resolved.frames() {
            for symbol in frame.symbols() {
                frames.push(Frame {
                    symbol: frame.symbol_address() as usize,
                    file: symbol
                        .filename()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    line: symbol.lineno().unwrap_or(0),
                    function: symbol
                        .name()
                        .map(|n| strip_hash(&n.to_string()).to_owned())
                        .unwrap_or_default(),
                });
            }
        }

        // Drop the capture machinery itself so the trace starts at the
        // caller's call site.
        let start = frames
            .iter()
            .position(|f| !is_capture_frame(&f.function))
            .unwrap_or(frames.len());
        frames.drain(..start);

        while frames.last().is_some_and(|f| is_runtime_frame(&f.function)) {
            frames.pop();
        }

        if frames.len() > self.skip {
            frames.drain(..self.skip);
        }
        frames
    }
}

/// Strips the trailing `::h<hex>` disambiguator from a demangled symbol.
fn strip_hash(name: &str) -> &str {
    match name.rfind("::h") {
        Some(pos) if name[pos + 3..].chars().all(|c| c.is_ascii_hexdigit()) => &name[..pos],
        _ => name,
    }
}

fn is_capture_frame(function: &str) -> bool {
    function.starts_with("backtrace::")
        || function.contains("error_loom::stack::Stack::capture")
        || function.contains("error_loom::error::Error::new")
}

fn is_runtime_frame(function: &str) -> bool {
    function.is_empty()
        || function == "main"
        || function == "_start"
        || function.starts_with("std::")
        || function.starts_with("core::")
        || function.starts_with("test::")
        || function.starts_with("__")
}

/// Merges an error's trace with its cause's already-coalesced trace.
///
/// The common trailing run is established by walking inward from the oldest
/// frames while they are equivalent. The merged trace is the non-shared
/// leading frames of the inner (deeper) trace followed by the entire outer
/// trace, whose own trailing frames already are the shared run.
pub(crate) fn combine_traces(outer: &[Frame], inner: &[Frame]) -> Vec<Frame> {
    if outer.is_empty() {
        return inner.to_vec();
    }
    if inner.is_empty() {
        return outer.to_vec();
    }

    let mut shared = 0;
    while shared < outer.len() && shared < inner.len() {
        let o = &outer[outer.len() - 1 - shared];
        let i = &inner[inner.len() - 1 - shared];
        if !o.equivalent(i) {
            break;
        }
        shared += 1;
    }

    let mut merged = Vec::with_capacity(inner.len() - shared + outer.len());
    merged.extend_from_slice(&inner[..inner.len() - shared]);
    merged.extend_from_slice(outer);
    merged
}

/// Writes the trace top-to-bottom, innermost call first. The pretty layout
/// column-aligns the `file:line` locations to the longest one; the plain
/// layout separates location and function with a tab.
pub(crate) fn write_trace(frames: &[Frame], pretty: bool, out: &mut String) {
    if pretty {
        let locations: Vec<String> = frames.iter().map(Frame::location).collect();
        let width = locations.iter().map(String::len).max().unwrap_or(0);
        for (frame, location) in frames.iter().zip(&locations) {
            let _ = writeln!(out, "\t{location:<width$} {}()", frame.function);
        }
        return;
    }
    for frame in frames {
        let _ = writeln!(out, "\t{}\t{}()", frame.location(), frame.function);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(symbol: usize, file: &str, line: u32, function: &str) -> Frame {
        Frame {
            symbol,
            file: file.into(),
            line,
            function: function.into(),
        }
    }

    fn shared_tail() -> Vec<Frame> {
        vec![
            frame(0x30, "src/dispatch.rs", 12, "dispatch::route"),
            frame(0x20, "src/server.rs", 88, "server::handle"),
            frame(0x10, "src/main.rs", 5, "run"),
        ]
    }

    #[test]
    fn combine_merges_common_trailing_run() {
        let mut inner = vec![
            frame(0x50, "src/io.rs", 41, "io::read"),
            frame(0x40, "src/loader.rs", 7, "loader::load"),
        ];
        inner.extend(shared_tail());
        let mut outer = vec![frame(0x60, "src/loader.rs", 9, "loader::wrap")];
        outer.extend(shared_tail());

        let merged = combine_traces(&outer, &inner);
        // outer-unique + full inner trace, no duplicated trailing frames
        assert_eq!(merged.len(), (outer.len() - 3) + inner.len());
        assert_eq!(merged[0].function, "io::read");
        assert_eq!(merged[1].function, "loader::load");
        assert_eq!(merged[2].function, "loader::wrap");
        assert_eq!(merged[3].function, "dispatch::route");
        assert_eq!(merged.last().unwrap().function, "run");
    }

    #[test]
    fn combine_with_no_overlap_concatenates() {
        let outer = vec![frame(0x1, "a.rs", 1, "a")];
        let inner = vec![frame(0x2, "b.rs", 2, "b")];
        let merged = combine_traces(&outer, &inner);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].function, "b");
        assert_eq!(merged[1].function, "a");
    }

    #[test]
    fn combine_with_empty_side_returns_other() {
        let frames = shared_tail();
        assert_eq!(combine_traces(&frames, &[]), frames);
        assert_eq!(combine_traces(&[], &frames), frames);
    }

    #[test]
    fn equivalence_ignores_nothing_but_matches_all_identity_parts() {
        let a = frame(0x10, "src/a.rs", 3, "f");
        let mut b = a.clone();
        assert!(a.equivalent(&b));
        b.line = 4;
        assert!(!a.equivalent(&b));
    }

    #[test]
    fn identical_traces_collapse_to_one() {
        let frames = shared_tail();
        let merged = combine_traces(&frames, &frames);
        assert_eq!(merged, frames);
    }

    #[test]
    fn strip_hash_removes_disambiguator() {
        assert_eq!(strip_hash("app::load::h1f2e3d4c5b6a7988"), "app::load");
        assert_eq!(strip_hash("app::load"), "app::load");
        assert_eq!(strip_hash("app::http_client"), "app::http_client");
    }

    #[test]
    fn pretty_trace_aligns_locations() {
        let frames = vec![
            frame(0x1, "src/very/long/path.rs", 100, "deep"),
            frame(0x2, "src/a.rs", 1, "shallow"),
        ];
        let mut out = String::new();
        write_trace(&frames, true, &mut out);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\tsrc/very/long/path.rs:100 deep()"));
        assert!(lines[1].contains("src/a.rs:1"));
        // both function columns start at the same offset
        let col0 = lines[0].find(" deep()").unwrap();
        let col1 = lines[1].find(" shallow()").unwrap();
        assert_eq!(col0, col1);
    }

    #[test]
    fn plain_trace_is_tab_separated() {
        let frames = vec![frame(0x1, "src/a.rs", 1, "f")];
        let mut out = String::new();
        write_trace(&frames, false, &mut out);
        assert_eq!(out, "\tsrc/a.rs:1\tf()\n");
    }
}
