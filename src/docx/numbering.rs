use std::collections::HashMap;

use crate::model::{DEFAULT_LIST_NUMBERING_STYLE, ListKind};
use crate::namespace::Namespaces;

/// Numbering format (`decimal`, `bullet`, `upperRoman`, ...) per list id and
/// indent level.
#[derive(Clone, Debug, Default)]
pub struct NumberingTable {
    formats: HashMap<String, HashMap<u32, String>>,
}

impl NumberingTable {
    /// Format declared for `(num_id, ilvl)`, if any.
    pub fn format(&self, num_id: &str, ilvl: u32) -> Option<&str> {
        self.formats
            .get(num_id)
            .and_then(|levels| levels.get(&ilvl))
            .map(String::as_str)
    }

    /// Like [`format`](Self::format), but unmapped combinations read as
    /// plain decimal numbering.
    pub fn format_or_default(&self, num_id: Option<&str>, ilvl: u32) -> &str {
        num_id
            .and_then(|id| self.format(id, ilvl))
            .unwrap_or(DEFAULT_LIST_NUMBERING_STYLE)
    }

    pub fn list_kind(&self, num_id: Option<&str>, ilvl: u32) -> ListKind {
        ListKind::from_num_fmt(self.format_or_default(num_id, ilvl))
    }

    pub fn insert(&mut self, num_id: &str, ilvl: u32, num_fmt: &str) {
        self.formats
            .entry(num_id.to_string())
            .or_default()
            .insert(ilvl, num_fmt.to_string());
    }
}

pub(crate) fn parse_numbering(xml: Option<&roxmltree::Document>) -> NumberingTable {
    let mut table = NumberingTable::default();
    let Some(xml) = xml else {
        return table;
    };
    let ns = Namespaces::from_document(xml);
    let root = xml.root_element();

    // Pass 1: which list ids use each abstract definition.
    let mut abstract_to_nums: HashMap<&str, Vec<&str>> = HashMap::new();
    for num in root.children().filter(|n| ns.is_w(*n, "num")) {
        let Some(num_id) = ns.attr(num, "w", "numId") else {
            continue;
        };
        let Some(abs_id) = ns.w_val(num, "abstractNumId") else {
            continue;
        };
        abstract_to_nums.entry(abs_id).or_default().push(num_id);
    }

    // Pass 2: level formats of every abstract definition still in use.
    for abs in root.children().filter(|n| ns.is_w(*n, "abstractNum")) {
        let Some(abs_id) = ns.attr(abs, "w", "abstractNumId") else {
            continue;
        };
        let Some(num_ids) = abstract_to_nums.get(abs_id) else {
            continue;
        };
        for lvl in abs.children().filter(|n| ns.is_w(*n, "lvl")) {
            let Some(ilvl) = ns
                .attr(lvl, "w", "ilvl")
                .and_then(|v| v.parse::<u32>().ok())
            else {
                continue;
            };
            let Some(num_fmt) = ns.w_val(lvl, "numFmt") else {
                continue;
            };
            for num_id in num_ids {
                table.insert(num_id, ilvl, num_fmt);
            }
        }
    }

    table
}
