//! Per-species unlock tree and the counter that decides which axes can cycle

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dex::DexEntry;
use crate::species::Species;
use crate::variant::Variant;

/// Cosmetic axes, outermost first. Tree levels always follow this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum UnlockAxis {
    Shiny,
    Form,
    Gender,
}

impl UnlockAxis {
    pub fn next(self) -> Option<UnlockAxis> {
        match self {
            UnlockAxis::Shiny => Some(UnlockAxis::Form),
            UnlockAxis::Form => Some(UnlockAxis::Gender),
            UnlockAxis::Gender => None,
        }
    }

    /// Branch key for this axis in `variant`.
    pub fn key(self, variant: Variant) -> u8 {
        match self {
            UnlockAxis::Shiny => variant.shiny as u8,
            UnlockAxis::Form => variant.form_index,
            UnlockAxis::Gender => variant.female as u8,
        }
    }

    fn with_key(self, mut variant: Variant, key: u8) -> Variant {
        match self {
            UnlockAxis::Shiny => variant.shiny = key != 0,
            UnlockAxis::Form => variant.form_index = key,
            UnlockAxis::Gender => variant.female = key != 0,
        }
        variant
    }

    /// Keys present at this level for `species`. Formless and genderless
    /// species collapse their level to the single key 0.
    fn keys(self, species: &Species) -> std::ops::Range<u8> {
        match self {
            UnlockAxis::Shiny => 0..2,
            UnlockAxis::Form => 0..species.form_count().min(u8::MAX as usize) as u8,
            UnlockAxis::Gender if species.is_genderless() => 0..1,
            UnlockAxis::Gender => 0..2,
        }
    }
}

impl fmt::Display for UnlockAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnlockAxis::Shiny => "shiny variant",
            UnlockAxis::Form => "form",
            UnlockAxis::Gender => "gender",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DexUnlockTree {
    Leaf(DexEntry),
    Branch {
        axis: UnlockAxis,
        children: BTreeMap<u8, DexUnlockTree>,
    },
}

impl DexUnlockTree {
    /// Builds the full shiny → form → gender tree, asking `lookup` for the
    /// entry at every leaf.
    pub fn build(species: &Species, mut lookup: impl FnMut(Variant) -> DexEntry) -> Self {
        Self::build_level(Some(UnlockAxis::Shiny), species, Variant::default(), &mut lookup)
    }

    fn build_level(
        axis: Option<UnlockAxis>,
        species: &Species,
        partial: Variant,
        lookup: &mut impl FnMut(Variant) -> DexEntry,
    ) -> Self {
        let Some(axis) = axis else {
            return DexUnlockTree::Leaf(lookup(partial));
        };
        let children = axis
            .keys(species)
            .map(|key| {
                let child = Self::build_level(
                    axis.next(),
                    species,
                    axis.with_key(partial, key),
                    lookup,
                );
                (key, child)
            })
            .collect();
        DexUnlockTree::Branch { axis, children }
    }

    pub fn axis(&self) -> Option<UnlockAxis> {
        match self {
            DexUnlockTree::Leaf(_) => None,
            DexUnlockTree::Branch { axis, .. } => Some(*axis),
        }
    }

    /// Child at `key` if this node branches on `axis`.
    pub fn child(&self, axis: UnlockAxis, key: u8) -> Option<&DexUnlockTree> {
        match self {
            DexUnlockTree::Branch {
                axis: branch_axis,
                children,
            } if *branch_axis == axis => children.get(&key),
            _ => None,
        }
    }

    /// Number of caught leaves below this node.
    pub fn unlocked_count(&self) -> usize {
        match self {
            DexUnlockTree::Leaf(entry) => usize::from(entry.caught),
            DexUnlockTree::Branch { children, .. } => {
                children.values().map(DexUnlockTree::unlocked_count).sum()
            }
        }
    }
}

/// Which cosmetic axes are worth offering for in-place cycling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CycleFlags {
    pub shiny: bool,
    pub form: bool,
    pub gender: bool,
}

impl CycleFlags {
    /// An axis cycles only if at least two unlocked leaves sit under it with
    /// the outer axes fixed at `variant`.
    pub fn at(tree: &DexUnlockTree, species: &Species, variant: Variant) -> Self {
        let shiny = tree.unlocked_count() > 1;

        let shiny_tree = tree.child(UnlockAxis::Shiny, UnlockAxis::Shiny.key(variant));
        let form = species.has_alternate_forms() && count(shiny_tree) > 1;

        let form_tree =
            shiny_tree.and_then(|node| node.child(UnlockAxis::Form, UnlockAxis::Form.key(variant)));
        let gender = !species.is_genderless() && count(form_tree) > 1;

        Self {
            shiny,
            form,
            gender,
        }
    }

    pub fn allows(&self, axis: UnlockAxis) -> bool {
        match axis {
            UnlockAxis::Shiny => self.shiny,
            UnlockAxis::Form => self.form,
            UnlockAxis::Gender => self.gender,
        }
    }
}

fn count(node: Option<&DexUnlockTree>) -> usize {
    node.map_or(0, DexUnlockTree::unlocked_count)
}
