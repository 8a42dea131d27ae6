//! Scrollback: the bounded, paginated log of console output.
//!
//! Output is appended to an unbounded pending buffer and moved into bounded
//! pages by a tick-driven `flush`, never inline with the append. The append
//! path is the one place in the engine that tolerates concurrent writers:
//! log events may arrive from background threads, so the pending buffer
//! sits behind a mutex and is reachable through cloneable [`LogWriter`]
//! handles. The flush/read side stays single-threaded.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lantern_types::level::{LogFilter, LogLevel};

/// Character limits for the scrollback. All counts are in bytes of UTF-8;
/// splits always land on character boundaries.
#[derive(Debug, Clone, Copy)]
pub struct ScrollbackConfig {
    /// Hard character ceiling per page.
    pub max_page_chars: usize,
    /// Ceiling for a single pending slice; anything larger is split at a
    /// line break, then a word break, then a hard cut.
    pub max_entry_chars: usize,
    /// Characters moved out of the pending buffer per flush; the remainder
    /// waits for the next tick.
    pub max_process_per_tick: usize,
    /// Pages retained; the oldest page is evicted beyond this.
    pub max_pages: usize,
}

impl Default for ScrollbackConfig {
    fn default() -> Self {
        Self {
            max_page_chars: 10_000,
            max_entry_chars: 5_000,
            max_process_per_tick: 2_000,
            max_pages: 16,
        }
    }
}

/// One bounded chunk of concatenated log text.
#[derive(Debug, Default)]
pub struct LogPage {
    text: String,
}

impl LogPage {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Thread-safe handle feeding log events into the pending buffer.
///
/// Cheap to clone; hand one to each log source. The severity filter is read
/// lock-free so writers never block on engine state.
#[derive(Debug, Clone)]
pub struct LogWriter {
    pending: Arc<Mutex<String>>,
    filter: Arc<AtomicU32>,
}

impl LogWriter {
    /// Append one log event. Events whose severity is filtered out are
    /// dropped. Stack trace lines, when present, are indented under the
    /// message.
    pub fn write(&self, level: LogLevel, message: &str, stack_trace: Option<&str>) {
        let filter = LogFilter::from_bits_truncate(self.filter.load(Ordering::Relaxed));
        if !filter.contains(level.flag()) {
            return;
        }
        let mut line = format!("[{}] {message}\n", level.tag());
        if let Some(trace) = stack_trace {
            for l in trace.lines() {
                line.push_str("    ");
                line.push_str(l);
                line.push('\n');
            }
        }
        lock(&self.pending).push_str(&line);
    }
}

/// Append-only, character-budget-bounded log split across bounded pages.
#[derive(Debug)]
pub struct ScrollbackBuffer {
    config: ScrollbackConfig,
    pending: Arc<Mutex<String>>,
    filter: Arc<AtomicU32>,
    pages: VecDeque<LogPage>,
}

impl ScrollbackBuffer {
    pub fn new(config: ScrollbackConfig) -> Self {
        Self {
            config,
            pending: Arc::new(Mutex::new(String::new())),
            filter: Arc::new(AtomicU32::new(LogFilter::default().bits())),
            pages: VecDeque::new(),
        }
    }

    /// Queue text for the next flush. Never blocks on page bookkeeping.
    pub fn append(&self, text: &str) {
        lock(&self.pending).push_str(text);
    }

    /// Queue text plus a trailing newline.
    pub fn append_line(&self, text: &str) {
        let mut pending = lock(&self.pending);
        pending.push_str(text);
        pending.push('\n');
    }

    /// A cloneable handle for asynchronous log ingestion.
    pub fn writer(&self) -> LogWriter {
        LogWriter {
            pending: Arc::clone(&self.pending),
            filter: Arc::clone(&self.filter),
        }
    }

    /// Change which severities `LogWriter`s accept.
    pub fn set_filter(&self, filter: LogFilter) {
        self.filter.store(filter.bits(), Ordering::Relaxed);
    }

    /// Move pending text into pages, at most `max_process_per_tick`
    /// characters per call. Called once per tick by the engine.
    pub fn flush(&mut self) {
        let mut budget = self.config.max_process_per_tick;
        while budget > 0 {
            let mut chunk = {
                let mut pending = lock(&self.pending);
                if pending.is_empty() {
                    return;
                }
                std::mem::take(&mut *pending)
            };
            if chunk.len() > budget {
                let cut = floor_char_boundary(&chunk, budget);
                if cut == 0 {
                    lock(&self.pending).insert_str(0, &chunk);
                    return;
                }
                let tail = chunk.split_off(cut);
                lock(&self.pending).insert_str(0, &tail);
            }
            budget -= chunk.len();
            self.place(chunk);
        }
    }

    /// Drop all pages and any pending text.
    pub fn clear(&mut self) {
        self.pages.clear();
        lock(&self.pending).clear();
    }

    /// Pages oldest-first.
    pub fn pages(&self) -> impl Iterator<Item = &LogPage> {
        self.pages.iter()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Characters still waiting to be flushed.
    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn config(&self) -> &ScrollbackConfig {
        &self.config
    }

    /// Distribute a budget-limited chunk across pages.
    fn place(&mut self, mut text: String) {
        let limit = self.config.max_entry_chars.min(self.config.max_page_chars);
        while !text.is_empty() {
            let slice = if text.len() > limit {
                let cut = entry_split_point(&text, limit);
                let rest = text.split_off(cut);
                std::mem::replace(&mut text, rest)
            } else {
                std::mem::take(&mut text)
            };
            self.place_slice(slice);
        }
    }

    /// Place one slice (already within the entry ceiling) into the pages,
    /// preferring line-boundary splits at page edges.
    fn place_slice(&mut self, mut text: String) {
        loop {
            if self.pages.is_empty() {
                self.start_page();
            }
            let page_len = self.pages.back().map_or(0, LogPage::len);
            let remaining = self.config.max_page_chars.saturating_sub(page_len);

            if text.len() <= remaining {
                if let Some(page) = self.pages.back_mut() {
                    page.text.push_str(&text);
                }
                return;
            }

            if remaining > 0 {
                let window = floor_char_boundary(&text, remaining);
                if let Some(nl) = text[..window].rfind('\n') {
                    let rest = text.split_off(nl + 1);
                    if let Some(page) = self.pages.back_mut() {
                        page.text.push_str(&text);
                    }
                    text = rest;
                    self.start_page();
                    continue;
                }
            }

            if page_len > 0 {
                // No clean split fits the partially-filled page; seal it
                // and retry on a fresh one.
                self.start_page();
                continue;
            }

            // Oversized slice on a fresh page: hard-split to the page
            // ceiling.
            let cut = entry_split_point(&text, remaining);
            let rest = text.split_off(cut);
            if let Some(page) = self.pages.back_mut() {
                page.text.push_str(&text);
            }
            text = rest;
            self.start_page();
        }
    }

    /// Open a fresh page, evicting the oldest beyond the cap.
    fn start_page(&mut self) {
        self.pages.push_back(LogPage::default());
        while self.pages.len() > self.config.max_pages {
            self.pages.pop_front();
        }
    }
}

impl Default for ScrollbackBuffer {
    fn default() -> Self {
        Self::new(ScrollbackConfig::default())
    }
}

fn lock(pending: &Mutex<String>) -> MutexGuard<'_, String> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Largest character boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Split point for an oversized slice: the last line break within `limit`,
/// else the last word break, else a hard cut. Always makes progress.
fn entry_split_point(text: &str, limit: usize) -> usize {
    let window = floor_char_boundary(text, limit);
    if window == 0 {
        // A single character wider than the limit; take it anyway.
        return text
            .char_indices()
            .nth(1)
            .map_or(text.len(), |(i, _)| i);
    }
    if let Some(nl) = text[..window].rfind('\n') {
        return nl + 1;
    }
    if let Some(sp) = text[..window].rfind(' ') {
        return sp + 1;
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ScrollbackConfig {
        ScrollbackConfig {
            max_page_chars: 20,
            max_entry_chars: 10,
            max_process_per_tick: 100,
            max_pages: 3,
        }
    }

    fn drain(buf: &mut ScrollbackBuffer) {
        // Flush until the pending buffer is empty.
        for _ in 0..100 {
            if buf.pending_len() == 0 {
                break;
            }
            buf.flush();
        }
        assert_eq!(buf.pending_len(), 0, "flush failed to drain");
    }

    #[test]
    fn append_is_deferred_until_flush() {
        let mut buf = ScrollbackBuffer::new(small());
        buf.append_line("hello");
        assert_eq!(buf.page_count(), 0);
        buf.flush();
        assert_eq!(buf.page_count(), 1);
        assert_eq!(buf.pages().next().unwrap().text(), "hello\n");
    }

    #[test]
    fn no_page_exceeds_ceiling() {
        let mut buf = ScrollbackBuffer::new(small());
        for i in 0..20 {
            buf.append_line(&format!("line {i}"));
        }
        drain(&mut buf);
        for page in buf.pages() {
            assert!(page.len() <= 20, "page overflow: {}", page.len());
        }
    }

    #[test]
    fn oversized_single_append_is_distributed() {
        let mut buf = ScrollbackBuffer::new(small());
        // One append far beyond the entry ceiling, no newlines.
        buf.append(&"x".repeat(95));
        drain(&mut buf);
        let total: usize = buf.pages().map(LogPage::len).sum();
        // Page cap 20, 3 pages retained: older content was evicted, and
        // every retained page respects the ceiling.
        assert!(buf.page_count() <= 3);
        assert!(total <= 60);
        for page in buf.pages() {
            assert!(page.len() <= 20);
        }
    }

    #[test]
    fn splits_prefer_line_boundaries() {
        let mut buf = ScrollbackBuffer::new(ScrollbackConfig {
            max_page_chars: 20,
            max_entry_chars: 20,
            max_process_per_tick: 100,
            max_pages: 8,
        });
        buf.append("aaaa\nbbbb\ncccc\ndddd\neeee\n");
        drain(&mut buf);
        // Every page but the last ends exactly on a line break.
        let pages: Vec<&LogPage> = buf.pages().collect();
        for page in &pages[..pages.len() - 1] {
            assert!(page.text().ends_with('\n'), "page {:?}", page.text());
        }
    }

    #[test]
    fn word_boundary_fallback() {
        let cfg = ScrollbackConfig {
            max_page_chars: 30,
            max_entry_chars: 10,
            max_process_per_tick: 100,
            max_pages: 8,
        };
        assert_eq!(entry_split_point("alpha beta gamma", cfg.max_entry_chars), 6);
    }

    #[test]
    fn hard_cut_fallback() {
        assert_eq!(entry_split_point(&"y".repeat(30), 10), 10);
    }

    #[test]
    fn per_tick_budget_limits_movement() {
        let mut buf = ScrollbackBuffer::new(ScrollbackConfig {
            max_page_chars: 1000,
            max_entry_chars: 1000,
            max_process_per_tick: 10,
            max_pages: 4,
        });
        buf.append(&"z".repeat(25));
        buf.flush();
        assert_eq!(buf.pending_len(), 15);
        buf.flush();
        assert_eq!(buf.pending_len(), 5);
        buf.flush();
        assert_eq!(buf.pending_len(), 0);
    }

    #[test]
    fn page_cap_evicts_oldest_first() {
        let mut buf = ScrollbackBuffer::new(small());
        buf.append_line("first-marker");
        drain(&mut buf);
        for _ in 0..30 {
            buf.append_line("filler line");
            drain(&mut buf);
        }
        assert_eq!(buf.page_count(), 3);
        let all: String = buf.pages().map(LogPage::text).collect();
        assert!(!all.contains("first-marker"));
    }

    #[test]
    fn clear_drops_pages_and_pending() {
        let mut buf = ScrollbackBuffer::new(small());
        buf.append_line("text");
        buf.flush();
        buf.append_line("more");
        buf.clear();
        assert_eq!(buf.page_count(), 0);
        assert_eq!(buf.pending_len(), 0);
    }

    #[test]
    fn utf8_boundaries_are_respected() {
        let mut buf = ScrollbackBuffer::new(ScrollbackConfig {
            max_page_chars: 7,
            max_entry_chars: 7,
            max_process_per_tick: 100,
            max_pages: 10,
        });
        // Multi-byte characters with no newline or space to split at.
        buf.append(&"\u{00E9}".repeat(12));
        drain(&mut buf);
        for page in buf.pages() {
            assert!(page.text().chars().all(|c| c == '\u{00E9}'));
        }
    }

    #[test]
    fn writer_appends_from_background_thread() {
        let mut buf = ScrollbackBuffer::new(ScrollbackConfig {
            max_page_chars: 1000,
            max_entry_chars: 500,
            max_process_per_tick: 10_000,
            max_pages: 4,
        });
        let writer = buf.writer();
        let handle = std::thread::spawn(move || {
            for i in 0..10 {
                writer.write(LogLevel::Info, &format!("bg {i}"), None);
            }
        });
        handle.join().unwrap();
        drain(&mut buf);
        let all: String = buf.pages().map(LogPage::text).collect();
        assert_eq!(all.lines().count(), 10);
        assert!(all.contains("[info] bg 0"));
    }

    #[test]
    fn writer_respects_severity_filter() {
        let mut buf = ScrollbackBuffer::default();
        buf.set_filter(LogFilter::ERROR);
        let writer = buf.writer();
        writer.write(LogLevel::Info, "dropped", None);
        writer.write(LogLevel::Error, "kept", None);
        drain(&mut buf);
        let all: String = buf.pages().map(LogPage::text).collect();
        assert!(!all.contains("dropped"));
        assert!(all.contains("kept"));
    }

    #[test]
    fn writer_indents_stack_traces() {
        let mut buf = ScrollbackBuffer::default();
        let writer = buf.writer();
        writer.write(LogLevel::Error, "boom", Some("at foo\nat bar"));
        drain(&mut buf);
        let all: String = buf.pages().map(LogPage::text).collect();
        assert!(all.contains("[error] boom\n    at foo\n    at bar\n"));
    }
}
