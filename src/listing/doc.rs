// Tue Aug 25 2026 - Alex

/// One rendered line with its predicted byte range, inclusive on both
/// ends. Definition lines carry their symbol as the key.
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub text: String,
    pub key: Option<String>,
    pub from: usize,
    pub to: usize,
}

impl Line {
    pub fn contains(&self, addr: usize) -> bool {
        self.from <= addr && self.to >= addr
    }
}

/// An ordered block of the listing: optional header/footer pseudo-lines,
/// own lines, then child blocks, indented one level per `tab`.
#[derive(Debug, Clone, Default)]
pub struct Div {
    pub key: Option<String>,
    pub tab: usize,
    pub header: String,
    pub footer: String,
    pub lines: Vec<Line>,
    pub additional: Vec<Div>,
}

impl Div {
    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Default::default()
        }
    }

    fn push(&mut self, from: usize, size: usize, text: String, key: Option<String>) {
        let to = if size == 0 { from } else { from + size - 1 };
        self.lines.push(Line {
            text,
            key,
            from,
            to,
        });
    }

    pub fn new_line(&mut self, from: usize, size: usize, text: impl Into<String>) {
        self.push(from, size, text.into(), None);
    }

    pub fn new_keyed_line(
        &mut self,
        from: usize,
        size: usize,
        text: impl Into<String>,
        key: impl Into<String>,
    ) {
        self.push(from, size, text.into(), Some(key.into()));
    }

    /// Zero-width separator at the previous line's position.
    pub fn empty_line(&mut self) {
        let p = self.lines.last().map_or(0, |l| l.from);
        self.push(p, 0, String::new(), None);
    }

    pub fn empty_line_at(&mut self, p: usize) {
        self.push(p, 0, String::new(), None);
    }

    /// Attach a child block, pruning blocks with nothing to show.
    pub fn add_div(&mut self, d: Div) {
        if !d.is_empty() {
            self.additional.push(d);
        }
    }

    /// A block is empty iff it has no header/footer and every line and
    /// child is recursively empty.
    pub fn is_empty(&self) -> bool {
        if !self.header.is_empty() || !self.footer.is_empty() {
            return false;
        }
        if !self.lines.iter().all(|l| l.text.is_empty()) {
            return false;
        }
        self.additional.iter().all(Div::is_empty)
    }

    /// First occupied offset, in document order.
    pub fn start(&self) -> Option<usize> {
        if let Some(l) = self.lines.first() {
            return Some(l.from);
        }
        self.additional.iter().find_map(Div::start)
    }

    /// Last occupied offset, in document order.
    pub fn end(&self) -> Option<usize> {
        if let Some(res) = self.additional.iter().rev().find_map(Div::end) {
            return Some(res);
        }
        self.lines.last().map(|l| l.from)
    }

    /// Splat the tree into a single block of ordered lines: the header as
    /// a boundary line tagged with the block's key, own lines, children at
    /// one more level of indentation, then the footer. Embedded newlines
    /// split into separate lines sharing the same byte range.
    pub fn flatten(&self) -> Div {
        let already_flat = self.header.is_empty()
            && self.footer.is_empty()
            && self.additional.is_empty()
            && self.tab == 0;
        if already_flat {
            return self.clone();
        }

        let prev_tab = "\t".repeat(self.tab.saturating_sub(1));
        let cur_tab = "\t".repeat(self.tab);

        let mut lines = Vec::new();
        let add_line = |lines: &mut Vec<Line>, l: &Line, prefix: &str| {
            for seg in l.text.split('\n') {
                lines.push(Line {
                    text: format!("{prefix}{seg}"),
                    key: l.key.clone(),
                    from: l.from,
                    to: l.to,
                });
            }
        };

        if !self.header.is_empty() {
            let st = self.start().unwrap_or_default();
            let header = Line {
                text: self.header.clone(),
                key: self.key.clone(),
                from: st,
                to: st,
            };
            add_line(&mut lines, &header, &prev_tab);
        }
        for line in &self.lines {
            add_line(&mut lines, line, &cur_tab);
        }
        for child in &self.additional {
            for line in &child.flatten().lines {
                add_line(&mut lines, line, &cur_tab);
            }
        }
        if !self.footer.is_empty() {
            let en = self.end().unwrap_or_default();
            let footer = Line {
                text: self.footer.clone(),
                key: None,
                from: en,
                to: en,
            };
            add_line(&mut lines, &footer, &prev_tab);
        }

        Div {
            lines,
            ..Default::default()
        }
    }

    /// Rendered text, optionally prefixing every line with its offset in
    /// fixed-width hex.
    pub fn to_text(&self, show_offsets: bool) -> String {
        let flat = self.flatten();
        let mut out = Vec::with_capacity(flat.lines.len());
        for l in &flat.lines {
            if show_offsets {
                out.push(format!("{:08X}: {}", l.from, l.text));
            } else {
                out.push(l.text.clone());
            }
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Div {
        let mut child = Div::with_header(".section");
        child.new_line(4, 4, "first");
        child.new_keyed_line(8, 2, "second", "sym_0");

        let mut root = Div {
            tab: 1,
            header: "block do".into(),
            footer: "end".into(),
            key: Some("block".into()),
            ..Default::default()
        };
        root.add_div(child);
        root
    }

    #[test]
    fn test_line_ranges() {
        let mut d = Div::default();
        d.new_line(0, 4, "a");
        d.new_line(4, 0, "label:");
        assert_eq!(d.lines[0].to, 3);
        assert_eq!(d.lines[1].from, 4);
        assert_eq!(d.lines[1].to, 4);
        assert!(d.lines[0].contains(3));
        assert!(!d.lines[0].contains(4));
    }

    #[test]
    fn test_empty_pruning() {
        let mut root = Div::default();
        root.add_div(Div::default());

        let mut seps_only = Div::default();
        seps_only.empty_line_at(0);
        root.add_div(seps_only);
        assert!(root.additional.is_empty());
        assert!(root.is_empty());

        let mut with_header = Div::with_header(".x");
        assert!(!with_header.is_empty());
        with_header.new_line(0, 1, "y");
        root.add_div(with_header);
        assert_eq!(root.additional.len(), 1);
    }

    #[test]
    fn test_start_end() {
        let root = sample();
        assert_eq!(root.start(), Some(4));
        assert_eq!(root.end(), Some(8));
        assert_eq!(Div::default().start(), None);
        assert_eq!(Div::default().end(), None);
    }

    #[test]
    fn test_flatten_order_and_tags() {
        let flat = sample().flatten();
        let texts: Vec<_> = flat.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["block do", "\t.section", "\tfirst", "\tsecond", "end"]);

        // Header boundary line carries the div's key at its start offset.
        assert_eq!(flat.lines[0].key.as_deref(), Some("block"));
        assert_eq!(flat.lines[0].from, 4);
        assert_eq!(flat.lines[4].from, 8);

        // Offsets are non-decreasing through the flattened sequence.
        for w in flat.lines.windows(2) {
            assert!(w[0].from <= w[1].from);
        }
    }

    #[test]
    fn test_flatten_splits_embedded_newlines() {
        let mut d = Div::with_header("h");
        d.new_line(0, 6, "one\ntwo");
        let flat = d.flatten();
        assert_eq!(flat.lines.len(), 3);
        assert_eq!(flat.lines[1].text, "one");
        assert_eq!(flat.lines[2].text, "two");
        assert_eq!(flat.lines[1].from, flat.lines[2].from);
    }

    #[test]
    fn test_to_text_offsets() {
        let mut d = Div::default();
        d.new_line(0x10, 4, "x");
        assert_eq!(d.to_text(true), "00000010: x");
        assert_eq!(d.to_text(false), "x");
    }
}
