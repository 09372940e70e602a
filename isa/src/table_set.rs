//! # Table Sets
//!
//! A [`TableSet`] owns every arena of one instruction set variant: dispatch
//! tables, template entries, variant chains, reserved spaces and the Opcode
//! Index. Once built (or loaded and validated) it is immutable, so it can be
//! shared freely between threads.
//!
//! ```text
//! TableSet
//! ├── roots    [guard ──► TableId] tried in order
//! ├── tables   DispatchTable { rule, slots }
//! ├── entries  TemplateEntry
//! ├── chains   VariantChain  [EntryId, ...]
//! ├── reserved ReservedEntry
//! └── index    IndexSlot per OperationId
//! ```

use crate::decode::DecodeContext;
use crate::error::BuildError;
use crate::operation::OperationId;
use crate::table::{
    ChainId, DispatchTable, EntryId, IndexSlot, MAX_CHAIN, MAX_DEPTH, ReservedEntry, Root, Slot,
    TableId, VariantChain,
};
use crate::template::{TemplateEntry, disjoint, strictly_inside};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSet {
    pub name: String,
    pub roots: Vec<Root>,
    pub tables: Vec<DispatchTable>,
    pub entries: Vec<TemplateEntry>,
    pub chains: Vec<VariantChain>,
    pub reserved: Vec<ReservedEntry>,
    /// One slot per [`OperationId`], in numbering order.
    pub index: Vec<IndexSlot>,
}

/// Size figures of a table set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub tables: usize,
    pub entries: usize,
    pub chains: usize,
    pub longest_chain: usize,
    pub reserved: usize,
    pub max_depth: usize,
    pub canonical: usize,
    pub decode_only: usize,
    pub unassigned: usize,
}

impl TableSet {
    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&TemplateEntry> {
        self.entries.get(id.index())
    }

    #[must_use]
    pub fn table(&self, id: TableId) -> Option<&DispatchTable> {
        self.tables.get(id.index())
    }

    #[must_use]
    pub fn chain(&self, id: ChainId) -> Option<&VariantChain> {
        self.chains.get(id.index())
    }

    #[must_use]
    pub fn index_slot(&self, op: OperationId) -> &IndexSlot {
        self.index.get(op.index()).unwrap_or(&IndexSlot::Unassigned)
    }

    /// All entries of `op`, canonical first.
    pub fn entries_of(&self, op: OperationId) -> impl Iterator<Item = &TemplateEntry> + '_ {
        let ids: Vec<EntryId> = match self.index_slot(op) {
            IndexSlot::Canonical(id) => std::iter::once(*id)
                .chain(self.entry(*id).into_iter().flat_map(|e| e.family.iter().copied()))
                .collect(),
            _ => self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.op == op)
                .map(|(i, _)| EntryId::from_index(i))
                .collect(),
        };
        ids.into_iter().filter_map(|id| self.entry(id))
    }

    /// Deepest table nesting reachable from any root.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.roots
            .iter()
            .map(|r| self.depth_from(r.table, 1))
            .max()
            .unwrap_or(0)
    }

    fn depth_from(&self, table: TableId, depth: usize) -> usize {
        // Guards against cycles in hand-edited sets.
        if depth > MAX_DEPTH + 1 {
            return depth;
        }
        self.table(table).map_or(depth, |t| {
            t.slots
                .iter()
                .filter_map(|slot| match slot {
                    Slot::Table(nested) => Some(self.depth_from(*nested, depth + 1)),
                    _ => None,
                })
                .max()
                .unwrap_or(depth)
        })
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        let count = |pred: fn(&IndexSlot) -> bool| self.index.iter().filter(|s| pred(s)).count();
        Stats {
            tables: self.tables.len(),
            entries: self.entries.len(),
            chains: self.chains.len(),
            longest_chain: self.chains.iter().map(|c| c.entries.len()).max().unwrap_or(0),
            reserved: self.reserved.len(),
            max_depth: self.max_depth(),
            canonical: count(|s| matches!(s, IndexSlot::Canonical(_))),
            decode_only: count(|s| matches!(s, IndexSlot::DecodeOnly(_))),
            unassigned: count(|s| matches!(s, IndexSlot::Unassigned)),
        }
    }

    /// Structural check for sets that did not come out of
    /// [`TableSet::build`], such as ones loaded from JSON.
    pub fn validate(&self) -> Result<(), BuildError> {
        let invalid = |msg: String| Err(BuildError::Invalid(format!("{}: {msg}", self.name)));

        if self.roots.is_empty() {
            return invalid("no roots".to_owned());
        }
        for root in &self.roots {
            if self.table(root.table).is_none() {
                return invalid(format!("root points at missing table {}", root.table.0));
            }
            if !root.guard.is_well_formed() {
                return invalid(format!("root guard {} sets bits outside its mask", root.guard));
            }
        }
        for reserved in &self.reserved {
            if !reserved.fixed.is_well_formed() {
                return invalid(format!("reserved `{}` sets bits outside its mask", reserved.name));
            }
        }

        for (i, table) in self.tables.iter().enumerate() {
            if !table.rule.is_well_formed() || table.rule.width() > 16 {
                return invalid(format!("table {i} has a malformed rule {}", table.rule));
            }
            if table.slots.len() != table.rule.slot_count() {
                return invalid(format!(
                    "table {i} has {} slots for rule {}",
                    table.slots.len(),
                    table.rule
                ));
            }
            for slot in &table.slots {
                let in_range = match *slot {
                    Slot::Empty => true,
                    Slot::Reserved(id) => id.index() < self.reserved.len(),
                    Slot::Entry(id) => id.index() < self.entries.len(),
                    Slot::Chain(id) => id.index() < self.chains.len(),
                    Slot::Table(id) => id.index() < self.tables.len(),
                };
                if !in_range {
                    return invalid(format!("table {i} has a dangling slot {slot:?}"));
                }
            }
        }

        for (i, chain) in self.chains.iter().enumerate() {
            self.validate_chain(i, chain).or_else(invalid)?;
        }

        for (i, entry) in self.entries.iter().enumerate() {
            validate_entry(entry)
                .map_err(|msg| format!("entry {i} (`{}`) {msg}", entry.op))
                .or_else(invalid)?;
            let dangling = entry
                .family
                .iter()
                .chain(&entry.shadowed_by)
                .any(|id| self.entry(*id).is_none());
            if dangling {
                return invalid(format!("entry {i} (`{}`) links a missing entry", entry.op));
            }
        }

        if self.index.len() != OperationId::COUNT {
            return invalid(format!(
                "index has {} slots, expected {}",
                self.index.len(),
                OperationId::COUNT
            ));
        }
        for (op, slot) in OperationId::ALL.iter().zip(&self.index) {
            match slot {
                IndexSlot::Sentinel if !op.is_sentinel() => {
                    return invalid(format!("`{op}` is marked as a sentinel"));
                }
                IndexSlot::Canonical(_) | IndexSlot::DecodeOnly(_) | IndexSlot::Unassigned
                    if op.is_sentinel() =>
                {
                    return invalid(format!("sentinel `{op}` has an index slot"));
                }
                IndexSlot::Canonical(id) => match self.entry(*id) {
                    Some(entry) if entry.op == *op => {}
                    _ => return invalid(format!("index slot of `{op}` points elsewhere")),
                },
                _ => {}
            }
        }

        let depth = self.max_depth();
        if depth > MAX_DEPTH {
            return invalid(format!("tables nest {depth} deep"));
        }
        Ok(())
    }

    fn validate_chain(&self, i: usize, chain: &VariantChain) -> Result<(), String> {
        if chain.entries.is_empty() || chain.entries.len() > MAX_CHAIN {
            return Err(format!("chain {i} has {} entries", chain.entries.len()));
        }
        let mut members = Vec::with_capacity(chain.entries.len());
        for id in &chain.entries {
            let entry = self
                .entry(*id)
                .ok_or_else(|| format!("chain {i} links missing entry {}", id.0))?;
            if chain.entries.iter().filter(|other| *other == id).count() > 1 {
                return Err(format!("chain {i} repeats entry {}", id.0));
            }
            members.push(entry);
        }
        for (x, a) in members.iter().enumerate() {
            for b in &members[x + 1..] {
                let ordered = disjoint(a.fixed, &a.exclusions, b.fixed, &b.exclusions)
                    || strictly_inside(a.fixed, b.fixed);
                if !ordered {
                    return Err(format!(
                        "chain {i}: `{}` is not ahead of `{}` by specificity",
                        a.op, b.op
                    ));
                }
            }
        }
        Ok(())
    }

    /// Encodes every canonical entry with default operands and checks that
    /// the word decodes back to the same operation. Returns how many
    /// operations were checked.
    pub fn verify_index(&self) -> Result<usize, BuildError> {
        let ctx = DecodeContext::default();
        let mut failures = Vec::new();
        let mut checked = 0;

        for (op, slot) in OperationId::ALL.iter().zip(&self.index) {
            let IndexSlot::Canonical(id) = slot else {
                continue;
            };
            checked += 1;
            let Some(entry) = self.entry(*id) else {
                failures.push(format!("`{op}`: missing entry"));
                continue;
            };
            match self.encode_entry(entry, &[]) {
                Ok(word) => match self.decode(word, &ctx) {
                    Ok(decoded) if decoded.op == *op => {}
                    Ok(decoded) => {
                        failures.push(format!("`{op}`: {word:#010x} decodes as `{}`", decoded.op));
                    }
                    Err(e) => failures.push(format!("`{op}`: {e}")),
                },
                Err(e) => failures.push(format!("`{op}`: {e}")),
            }
        }

        if failures.is_empty() {
            Ok(checked)
        } else {
            for failure in &failures {
                tracing::warn!(set = %self.name, "{failure}");
            }
            Err(BuildError::Invalid(failures.join("; ")))
        }
    }
}

/// Checks that every pattern and field of `entry` can be applied to a
/// 32-bit word.
fn validate_entry(entry: &TemplateEntry) -> Result<(), String> {
    if !entry.fixed.is_well_formed() {
        return Err("sets fixed bits outside its mask".to_owned());
    }
    if let Some(exclusion) = entry.exclusions.iter().find(|e| !e.is_well_formed()) {
        return Err(format!("has a malformed exclusion {exclusion}"));
    }
    let mut claimed = entry.mask();
    for field in &entry.fields {
        if !field.bits.is_well_formed() || field.width() > 32 {
            return Err(format!("has a malformed `{}` field {}", field.role, field.bits));
        }
        if field.bits.mask() & claimed != 0 {
            return Err(format!("field `{}` overlaps other bits", field.role));
        }
        claimed |= field.bits.mask();
    }
    Ok(())
}
