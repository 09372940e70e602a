//! # Table Construction
//!
//! A [`TableSetDef`] is plain data: roots, refinement rules and records.
//! [`TableSet::build`] turns it into dispatch tables.
//!
//! ```text
//!  records ──► roots by guard ──► root table (root rule)
//!                                    │
//!              slot with 1 record ───┼──► Entry / Reserved
//!              slot with n records ──┼──► nested table on the first rule
//!                                    │    the records disagree on
//!              nothing separates ────┴──► variant chain (checked for
//!                                         ambiguity, most specific first)
//! ```
//!
//! A record lands in every slot its fixed bits allow, so a field bit under a
//! table's rule replicates the record across slots. Conflicts do not stop the
//! build: they are collected and reported together.

use crate::error::{BuildError, Conflict, ConflictKind, ConflictRecord};
use crate::operation::OperationId;
use crate::pattern::{BitPattern, Pattern};
use crate::rule::FieldRule;
use crate::table::{
    ChainId, DispatchTable, EntryId, IndexSlot, MAX_CHAIN, MAX_DEPTH, ReservedEntry, ReservedId,
    Root, Slot, TableId, VariantChain,
};
use crate::table_set::TableSet;
use crate::template::{Arch, EntryFlags, TemplateEntry, disjoint, strictly_inside};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// What a record produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Op(OperationId),
    Reserved(String),
}

/// One encoding in declarative form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub target: Target,
    pub pattern: String,
    pub exclusions: Vec<String>,
    pub since: Arch,
    pub flags: EntryFlags,
}

impl Record {
    pub fn op(op: OperationId, pattern: impl Into<String>) -> Self {
        Self {
            target: Target::Op(op),
            pattern: pattern.into(),
            exclusions: Vec::new(),
            since: Arch::V7,
            flags: EntryFlags::default(),
        }
    }

    pub fn reserved(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            target: Target::Reserved(name.into()),
            ..Self::op(OperationId::Invalid, pattern)
        }
    }

    #[must_use]
    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclusions.push(pattern.into());
        self
    }

    #[must_use]
    pub const fn v8(mut self) -> Self {
        self.since = Arch::V8;
        self
    }

    #[must_use]
    pub const fn decode_only(mut self) -> Self {
        self.flags.decode_only = true;
        self
    }

    #[must_use]
    pub const fn writes_flags(mut self) -> Self {
        self.flags.writes_flags = true;
        self
    }

    fn name(&self) -> String {
        match &self.target {
            Target::Op(op) => op.name().to_owned(),
            Target::Reserved(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDef {
    /// Pattern of `0`, `1` and `-`.
    pub guard: String,
    pub rule: FieldRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSetDef {
    pub name: String,
    /// Tried in order. The last one should accept every word.
    pub roots: Vec<RootDef>,
    /// Rules tried, in order, when a slot holds several records.
    pub refinements: Vec<FieldRule>,
    pub records: Vec<Record>,
    /// Operations with no encode-side template, and why.
    pub decode_only: Vec<(OperationId, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Entry(EntryId),
    Reserved(ReservedId),
}

struct Item {
    leaf: Leaf,
    record: usize,
    fixed: BitPattern,
    exclusions: Vec<BitPattern>,
}

struct Builder<'d> {
    def: &'d TableSetDef,
    items: Vec<Item>,
    tables: Vec<DispatchTable>,
    entries: Vec<TemplateEntry>,
    chains: Vec<VariantChain>,
    chain_ids: HashMap<Vec<EntryId>, ChainId>,
    reserved: Vec<ReservedEntry>,
    conflicts: Vec<Conflict>,
    reported: HashSet<(usize, usize)>,
}

impl TableSet {
    /// Builds the dispatch tables, the Opcode Index and the shadow lists for
    /// one definition.
    pub fn build(def: &TableSetDef) -> Result<Self, BuildError> {
        let mut builder = Builder::new(def)?;

        let guards = def
            .roots
            .iter()
            .map(|r| BitPattern::parse(&r.guard))
            .collect::<Result<Vec<_>, _>>()?;
        if guards.is_empty() {
            return Err(BuildError::Invalid(format!("`{}` has no roots", def.name)));
        }

        let mut members = vec![Vec::new(); guards.len()];
        for (i, item) in builder.items.iter().enumerate() {
            let root = guards
                .iter()
                .position(|g| g.determined_by(item.fixed))
                .unwrap_or(guards.len() - 1);
            members[root].push(i);
        }

        let mut roots = Vec::with_capacity(guards.len());
        for ((root_def, guard), members) in def.roots.iter().zip(&guards).zip(&members) {
            let table = builder.build_table(members, &root_def.rule, *guard, 1);
            roots.push(Root {
                guard: *guard,
                table,
            });
        }

        for members in &members {
            builder.compute_shadows(members);
        }

        if !builder.conflicts.is_empty() {
            for conflict in &builder.conflicts {
                tracing::warn!("{conflict}");
            }
            return Err(BuildError::Conflicts(builder.conflicts));
        }

        let index = builder.build_index();
        builder.link_families(&index);

        let set = Self {
            name: def.name.clone(),
            roots,
            tables: builder.tables,
            entries: builder.entries,
            chains: builder.chains,
            reserved: builder.reserved,
            index,
        };
        tracing::debug!(
            set = %set.name,
            tables = set.tables.len(),
            entries = set.entries.len(),
            chains = set.chains.len(),
            reserved = set.reserved.len(),
            "built table set"
        );
        Ok(set)
    }
}

impl<'d> Builder<'d> {
    fn new(def: &'d TableSetDef) -> Result<Self, BuildError> {
        let mut builder = Self {
            def,
            items: Vec::with_capacity(def.records.len()),
            tables: Vec::new(),
            entries: Vec::new(),
            chains: Vec::new(),
            chain_ids: HashMap::new(),
            reserved: Vec::new(),
            conflicts: Vec::new(),
            reported: HashSet::new(),
        };

        for (record_idx, record) in def.records.iter().enumerate() {
            let pattern = Pattern::parse(&record.pattern)?;
            let exclusions = record
                .exclusions
                .iter()
                .map(|e| BitPattern::parse(e))
                .collect::<Result<Vec<_>, _>>()?;

            let leaf = match &record.target {
                Target::Op(op) => {
                    if op.is_sentinel() {
                        return Err(BuildError::BadPattern {
                            pattern: record.pattern.clone(),
                            reason: format!("sentinel `{op}` cannot own an encoding"),
                        });
                    }
                    let id = EntryId::from_index(builder.entries.len());
                    builder.entries.push(TemplateEntry {
                        op: *op,
                        pattern: record.pattern.clone(),
                        fixed: pattern.fixed,
                        exclusions: exclusions.clone(),
                        fields: pattern.fields,
                        since: record.since,
                        flags: record.flags,
                        family: Vec::new(),
                        shadowed_by: Vec::new(),
                    });
                    Leaf::Entry(id)
                }
                Target::Reserved(name) => {
                    let id = ReservedId::from_index(builder.reserved.len());
                    builder.reserved.push(ReservedEntry {
                        name: name.clone(),
                        pattern: record.pattern.clone(),
                        fixed: pattern.fixed,
                    });
                    Leaf::Reserved(id)
                }
            };

            builder.items.push(Item {
                leaf,
                record: record_idx,
                fixed: pattern.fixed,
                exclusions,
            });
        }

        Ok(builder)
    }

    /// Can a word with the `known` bits still match item `i`?
    fn compatible(&self, i: usize, known: BitPattern) -> bool {
        let item = &self.items[i];
        !item.fixed.contradicts(known) && !item.exclusions.iter().any(|e| e.determined_by(known))
    }

    fn build_table(
        &mut self,
        members: &[usize],
        rule: &FieldRule,
        known: BitPattern,
        depth: usize,
    ) -> TableId {
        let id = TableId::from_index(self.tables.len());
        self.tables.push(DispatchTable {
            rule: rule.clone(),
            slots: Vec::new(),
        });

        let mut slots = Vec::with_capacity(rule.slot_count());
        for v in 0..rule.slot_count() {
            #[allow(clippy::cast_possible_truncation)]
            let selector = BitPattern::new(rule.mask(), rule.deposit(0, v as u32));
            if selector.contradicts(known) {
                slots.push(Slot::Empty);
                continue;
            }
            let slot_known = known.merge(selector);
            let here: Vec<usize> = members
                .iter()
                .copied()
                .filter(|&i| self.compatible(i, slot_known))
                .collect();
            let slot = self.build_slot(&here, slot_known, depth);
            slots.push(slot);
        }

        self.tables[id.index()].slots = slots;
        id
    }

    fn build_slot(&mut self, here: &[usize], known: BitPattern, depth: usize) -> Slot {
        match here {
            [] => Slot::Empty,
            [only] => match self.items[*only].leaf {
                Leaf::Entry(id) => Slot::Entry(id),
                Leaf::Reserved(id) => Slot::Reserved(id),
            },
            [first, second, ..] => match self.split_rule(here) {
                Some(_) if depth >= MAX_DEPTH => {
                    self.report(*first, *second, ConflictKind::TooDeep);
                    Slot::Empty
                }
                Some(rule) => Slot::Table(self.build_table(here, &rule, known, depth + 1)),
                None => self.chain_slot(here),
            },
        }
    }

    /// Bits on which two records in `here` are both fixed but different.
    fn disagreement(&self, here: &[usize]) -> u32 {
        let mut bits = 0;
        for (x, &a) in here.iter().enumerate() {
            for &b in &here[x + 1..] {
                let (a, b) = (self.items[a].fixed, self.items[b].fixed);
                bits |= a.mask & b.mask & (a.value ^ b.value);
            }
        }
        bits
    }

    fn split_rule(&self, here: &[usize]) -> Option<FieldRule> {
        let bits = self.disagreement(here);
        if bits == 0 {
            return None;
        }
        if let Some(rule) = self
            .def
            .refinements
            .iter()
            .find(|rule| rule.mask() & bits != 0)
        {
            return Some(rule.clone());
        }
        let highest: Vec<u8> = (0..32_u8)
            .rev()
            .filter(|&b| bits & (1 << b) != 0)
            .take(4)
            .collect();
        Some(FieldRule::from_bits(&highest))
    }

    fn chain_slot(&mut self, here: &[usize]) -> Slot {
        let mut order = here.to_vec();
        order.sort_by_key(|&i| Reverse(self.items[i].fixed.mask.count_ones()));

        for (x, &a) in order.iter().enumerate() {
            for &b in &order[x + 1..] {
                let (ia, ib) = (&self.items[a], &self.items[b]);
                if ia.fixed == ib.fixed {
                    self.report(a, b, ConflictKind::Identical);
                } else if disjoint(ia.fixed, &ia.exclusions, ib.fixed, &ib.exclusions) {
                    continue;
                } else if !strictly_inside(ia.fixed, ib.fixed) {
                    self.report(a, b, ConflictKind::Ambiguous);
                }
            }
        }
        if order.len() > MAX_CHAIN {
            self.report(order[0], order[order.len() - 1], ConflictKind::ChainTooLong);
        }

        let mut entries = Vec::with_capacity(order.len());
        for &i in &order {
            match self.items[i].leaf {
                Leaf::Entry(id) => entries.push(id),
                // A reserved space has to own its slot outright.
                Leaf::Reserved(_) => {
                    let other = order.iter().copied().find(|&o| o != i).unwrap_or(i);
                    self.report(i, other, ConflictKind::Ambiguous);
                }
            }
        }

        if let Some(id) = self.chain_ids.get(&entries) {
            return Slot::Chain(*id);
        }
        let id = ChainId::from_index(self.chains.len());
        self.chains.push(VariantChain {
            entries: entries.clone(),
        });
        self.chain_ids.insert(entries, id);
        Slot::Chain(id)
    }

    fn report(&mut self, a: usize, b: usize, kind: ConflictKind) {
        let (ra, rb) = (self.items[a].record, self.items[b].record);
        if !self.reported.insert((ra.min(rb), ra.max(rb))) {
            return;
        }
        let side = |r: usize| {
            let record = &self.def.records[r];
            ConflictRecord {
                name: record.name(),
                pattern: record.pattern.clone(),
            }
        };
        let conflict = Conflict {
            set: self.def.name.clone(),
            kind,
            first: side(ra),
            second: side(rb),
        };
        self.conflicts.push(conflict);
    }

    /// Records, for every entry of one root, the more specific entries of the
    /// same root that overlap it.
    fn compute_shadows(&mut self, members: &[usize]) {
        let entries: Vec<&Item> = members
            .iter()
            .map(|&i| &self.items[i])
            .filter(|item| matches!(item.leaf, Leaf::Entry(_)))
            .collect();

        let mut shadows: Vec<(EntryId, EntryId)> = Vec::new();
        for outer in &entries {
            for inner in &entries {
                let (Leaf::Entry(outer_id), Leaf::Entry(inner_id)) = (outer.leaf, inner.leaf)
                else {
                    continue;
                };
                if strictly_inside(inner.fixed, outer.fixed)
                    && !disjoint(inner.fixed, &inner.exclusions, outer.fixed, &outer.exclusions)
                {
                    shadows.push((outer_id, inner_id));
                }
            }
        }

        for (outer, inner) in shadows {
            self.entries[outer.index()].shadowed_by.push(inner);
        }
    }

    fn build_index(&self) -> Vec<IndexSlot> {
        let mut index = vec![IndexSlot::Unassigned; OperationId::COUNT];
        for op in OperationId::ALL.iter().filter(|op| op.is_sentinel()) {
            index[op.index()] = IndexSlot::Sentinel;
        }
        for (op, reason) in &self.def.decode_only {
            index[op.index()] = IndexSlot::DecodeOnly(reason.clone());
        }
        for (i, entry) in self.entries.iter().enumerate() {
            let slot = &mut index[entry.op.index()];
            if !entry.flags.decode_only && *slot == IndexSlot::Unassigned {
                *slot = IndexSlot::Canonical(EntryId::from_index(i));
            }
        }
        for op in OperationId::operations() {
            if index[op.index()] == IndexSlot::Unassigned {
                tracing::warn!(set = %self.def.name, "no encoding defines `{op}`");
            }
        }
        index
    }

    fn link_families(&mut self, index: &[IndexSlot]) {
        let mut families: HashMap<OperationId, Vec<EntryId>> = HashMap::new();
        for (i, entry) in self.entries.iter().enumerate() {
            families
                .entry(entry.op)
                .or_default()
                .push(EntryId::from_index(i));
        }

        for (op, mut family) in families {
            if let IndexSlot::Canonical(canonical) = index[op.index()] {
                family.retain(|&id| id != canonical);
                family.insert(0, canonical);
            }
            for &id in &family {
                self.entries[id.index()].family =
                    family.iter().copied().filter(|&other| other != id).collect();
            }
        }
    }
}
