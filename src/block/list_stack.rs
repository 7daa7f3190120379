//! Nested list bookkeeping.
//!
//! The stack holds one entry per open list, with strictly increasing
//! marker indentation from bottom to top. Item text stays raw until its
//! list closes, so continuation lines can still be appended.

use smallvec::SmallVec;

use crate::document::{Block, List, ListItem, ListKind, TaskState};
use crate::inline::format_inline;
use crate::limits::MAX_LIST_NESTING;
use crate::Options;

#[derive(Debug)]
struct OpenItem {
    raw: String,
    task: TaskState,
    children: Vec<List>,
}

#[derive(Debug)]
struct OpenList {
    kind: ListKind,
    indent: usize,
    items: Vec<OpenItem>,
}

/// Stack of open lists, innermost on top.
#[derive(Debug, Default)]
pub(crate) struct ListStack {
    open: SmallVec<[OpenList; 4]>,
}

impl ListStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Marker indentation of the outermost open list.
    #[inline]
    pub(crate) fn base_indent(&self) -> Option<usize> {
        self.open.first().map(|list| list.indent)
    }

    /// Close every list whose marker sits deeper than `indent`.
    pub(crate) fn close_to_indent(&mut self, indent: usize, options: &Options, out: &mut Vec<Block>) {
        while self.open.last().is_some_and(|top| top.indent > indent) {
            self.pop(options, out);
        }
    }

    /// Close every open list.
    pub(crate) fn close_all(&mut self, options: &Options, out: &mut Vec<Block>) {
        while !self.is_empty() {
            self.pop(options, out);
        }
    }

    /// Make sure the top of the stack is a list of `kind` at `indent`.
    ///
    /// Deeper indentation nests, equal indentation with a different list
    /// type replaces the list at that level, equal indentation with the
    /// same type continues it. Call [`close_to_indent`](Self::close_to_indent)
    /// first so the top is never deeper than `indent`.
    pub(crate) fn ensure_list(&mut self, kind: ListKind, indent: usize, options: &Options, out: &mut Vec<Block>) {
        let top = self.open.last().map(|top| (top.kind, top.indent));
        match top {
            None => self.push(kind, indent),
            Some((_, top_indent)) if top_indent < indent => {
                if self.open.len() >= MAX_LIST_NESTING {
                    debug_event!(depth = self.open.len(), "list nesting cap reached");
                    return;
                }
                self.push(kind, indent);
            }
            Some((top_kind, _)) if !top_kind.same_type(kind) => {
                self.pop(options, out);
                self.push(kind, indent);
            }
            Some(_) => {}
        }
    }

    /// Add an item to the innermost list.
    pub(crate) fn push_item(&mut self, raw: &str, task: TaskState) {
        if let Some(top) = self.open.last_mut() {
            top.items.push(OpenItem {
                raw: raw.to_owned(),
                task,
                children: Vec::new(),
            });
        }
    }

    /// Append a continuation line to the last item of the innermost list.
    /// Returns `false` when there is no item to continue.
    pub(crate) fn append_to_last_item(&mut self, text: &str) -> bool {
        let Some(item) = self.open.last_mut().and_then(|top| top.items.last_mut()) else {
            return false;
        };
        if !item.raw.is_empty() {
            item.raw.push(' ');
        }
        item.raw.push_str(text);
        true
    }

    fn push(&mut self, kind: ListKind, indent: usize) {
        self.open.push(OpenList {
            kind,
            indent,
            items: Vec::new(),
        });
    }

    /// Close the innermost list. It nests under the last item of the list
    /// below it, or becomes a top-level block.
    fn pop(&mut self, options: &Options, out: &mut Vec<Block>) {
        let Some(open) = self.open.pop() else {
            return;
        };
        if open.items.is_empty() {
            return;
        }
        let list = List {
            kind: open.kind,
            items: open
                .items
                .into_iter()
                .map(|item| ListItem {
                    inline: format_inline(&item.raw, options),
                    task: item.task,
                    children: item.children,
                })
                .collect(),
        };

        match self.open.last_mut().and_then(|parent| parent.items.last_mut()) {
            Some(parent_item) => parent_item.children.push(list),
            None => out.push(Block::List(list)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UL: ListKind = ListKind::Unordered;
    const OL: ListKind = ListKind::Ordered { start: 1 };

    fn item(stack: &mut ListStack, kind: ListKind, indent: usize, text: &str, out: &mut Vec<Block>) {
        let options = Options::default();
        stack.close_to_indent(indent, &options, out);
        stack.ensure_list(kind, indent, &options, out);
        stack.push_item(text, TaskState::None);
    }

    fn only_list(out: &[Block]) -> &List {
        match out {
            [Block::List(list)] => list,
            other => panic!("expected one list, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_then_pop() {
        let mut stack = ListStack::new();
        let mut out = Vec::new();
        item(&mut stack, UL, 0, "a", &mut out);
        item(&mut stack, UL, 2, "b", &mut out);
        item(&mut stack, UL, 0, "c", &mut out);
        stack.close_all(&Options::default(), &mut out);

        let list = only_list(&out);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].inline, "a");
        assert_eq!(list.items[0].children[0].items[0].inline, "b");
        assert_eq!(list.items[1].inline, "c");
    }

    #[test]
    fn test_type_change_same_indent_replaces() {
        let mut stack = ListStack::new();
        let mut out = Vec::new();
        item(&mut stack, UL, 0, "a", &mut out);
        item(&mut stack, OL, 0, "b", &mut out);
        stack.close_all(&Options::default(), &mut out);

        assert_eq!(out.len(), 2);
        assert!(matches!(&out[0], Block::List(l) if !l.is_ordered()));
        assert!(matches!(&out[1], Block::List(l) if l.is_ordered()));
    }

    #[test]
    fn test_same_type_continues() {
        let mut stack = ListStack::new();
        let mut out = Vec::new();
        item(&mut stack, OL, 0, "a", &mut out);
        item(&mut stack, ListKind::Ordered { start: 2 }, 0, "b", &mut out);
        stack.close_all(&Options::default(), &mut out);
        let list = only_list(&out);
        assert_eq!(list.kind, OL);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_indent_stays_sorted() {
        let mut stack = ListStack::new();
        let mut out = Vec::new();
        for (indent, text) in [(0, "a"), (4, "b"), (2, "c"), (6, "d")] {
            item(&mut stack, UL, indent, text, &mut out);
            let indents: Vec<usize> = stack.open.iter().map(|l| l.indent).collect();
            assert!(indents.windows(2).all(|w| w[0] < w[1]), "{indents:?}");
        }
    }

    #[test]
    fn test_nesting_cap() {
        let mut stack = ListStack::new();
        let mut out = Vec::new();
        for depth in 0..MAX_LIST_NESTING + 4 {
            item(&mut stack, UL, depth * 2, "x", &mut out);
        }
        assert_eq!(stack.open.len(), MAX_LIST_NESTING);
    }

    #[test]
    fn test_continuation_appends() {
        let mut stack = ListStack::new();
        let mut out = Vec::new();
        item(&mut stack, UL, 0, "first", &mut out);
        assert!(stack.append_to_last_item("second"));
        stack.close_all(&Options::default(), &mut out);
        assert_eq!(only_list(&out).items[0].inline, "first second");
    }

    #[test]
    fn test_items_formatted_on_close() {
        let mut stack = ListStack::new();
        let mut out = Vec::new();
        item(&mut stack, UL, 0, "**b** <i>", &mut out);
        stack.close_all(&Options::default(), &mut out);
        assert_eq!(only_list(&out).items[0].inline, "<strong>b</strong> &lt;i&gt;");
    }
}
